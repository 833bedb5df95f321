//! Visual style, composition, and aspect ratio parameters.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use storyboard_error::ConfigError;
use strum::IntoEnumIterator;

/// Named visual style applied to a prompt.
///
/// Names parse from an English slug or the Korean label used by the
/// storyboard editor. Anything else becomes [`Style::Custom`] and is passed
/// through to the prompt unchanged.
///
/// # Examples
///
/// ```
/// use storyboard_core::Style;
///
/// let style: Style = "감성 멜로".parse().unwrap();
/// assert_eq!(style, Style::Melodrama);
///
/// let style: Style = "watercolor, muted palette".parse().unwrap();
/// assert_eq!(style, Style::Custom("watercolor, muted palette".to_string()));
/// assert_eq!(style.fragment(), "watercolor, muted palette");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumString,
    derive_more::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Style {
    /// Romantic, soft lighting
    #[strum(serialize = "melodrama", serialize = "감성 멜로")]
    #[display("melodrama")]
    Melodrama,
    /// Classic western film
    #[strum(serialize = "western", serialize = "서부극")]
    #[display("western")]
    Western,
    /// Suspenseful, dramatic shadows
    #[strum(serialize = "thriller", serialize = "공포 스릴러")]
    #[display("thriller")]
    Thriller,
    /// South Korean 1980s retro
    #[strum(serialize = "1980s", serialize = "1980년대")]
    #[display("1980s")]
    Eighties,
    /// South Korean 2000s Y2K
    #[strum(serialize = "2000s", serialize = "2000년대")]
    #[display("2000s")]
    TwoThousands,
    /// Neon-lit future city
    #[strum(serialize = "cyberpunk", serialize = "사이버펑크")]
    #[display("cyberpunk")]
    Cyberpunk,
    /// Magical, enchanted setting
    #[strum(serialize = "fantasy", serialize = "판타지")]
    #[display("fantasy")]
    Fantasy,
    /// Clean and simple
    #[strum(serialize = "minimal", serialize = "미니멀")]
    #[display("minimal")]
    Minimal,
    /// Aged film, nostalgic
    #[strum(serialize = "vintage", serialize = "빈티지")]
    #[display("vintage")]
    Vintage,
    /// Sleek contemporary look
    #[default]
    #[strum(serialize = "modern", serialize = "모던")]
    #[display("modern")]
    Modern,
    /// Cute animal characters instead of people
    #[strum(serialize = "animal", serialize = "동물")]
    #[display("animal")]
    Animal,
    /// Photographic realism
    #[strum(serialize = "photorealistic", serialize = "실사 극대화")]
    #[display("photorealistic")]
    Photorealistic,
    /// Anime illustration
    #[strum(serialize = "animation", serialize = "애니메이션")]
    #[display("animation")]
    Animation,
    /// Korean webtoon linework
    #[strum(serialize = "webtoon", serialize = "웹툰")]
    #[display("webtoon")]
    Webtoon,
    /// Food photography with a person eating
    #[strum(serialize = "mukbang", serialize = "먹방")]
    #[display("mukbang")]
    Mukbang,
    /// Pastel, heartwarming illustration
    #[strum(serialize = "cute", serialize = "귀여움")]
    #[display("cute")]
    Cute,
    /// Glowing circuitry concept art
    #[strum(serialize = "ai")]
    #[display("ai")]
    Ai,
    /// Surreal, uncanny
    #[strum(serialize = "surreal", serialize = "괴이함")]
    #[display("surreal")]
    Surreal,
    /// Imaginative, original composition
    #[strum(serialize = "creative", serialize = "창의적인")]
    #[display("creative")]
    Creative,
    /// Joseon dynasty, hanok backdrop
    #[strum(serialize = "joseon", serialize = "조선시대")]
    #[display("joseon")]
    Joseon,
    /// Raw style text passed through verbatim
    #[strum(default)]
    #[display("{}", _0)]
    Custom(String),
}

impl Style {
    /// Prompt fragment describing this style.
    pub fn fragment(&self) -> &str {
        match self {
            Self::Melodrama => {
                "romantic and emotional atmosphere, soft warm lighting, dreamy mood, tender expressions"
            }
            Self::Western => {
                "western film style, classic cowboy aesthetic, desert landscape, adventurous atmosphere"
            }
            Self::Thriller => {
                "mysterious cinematic atmosphere, dramatic lighting, intriguing suspenseful mood, artistic shadows"
            }
            Self::Eighties => {
                "South Korean 1980s retro style, vintage city street, traditional Korean architecture mixed with modernizing elements, people in 80s fashion, warm nostalgic tones, film grain"
            }
            Self::TwoThousands => {
                "South Korean 2000s Y2K aesthetic, early 2000s Seoul city street, flip phones, MP3 players, fashion trends of the era, vibrant but slightly muted colors"
            }
            Self::Cyberpunk => {
                "futuristic cyberpunk style, vibrant neon lights, advanced technology, modern urban environment"
            }
            Self::Fantasy => {
                "fantasy adventure style, magical enchanted atmosphere, mystical fantasy setting, imaginative world"
            }
            Self::Minimal => {
                "minimalist modern style, clean simple composition, elegant neutral tones, refined aesthetic"
            }
            Self::Vintage => {
                "vintage classic style, timeless aesthetic, nostalgic retro mood, aged film quality"
            }
            Self::Modern => {
                "modern contemporary style, sleek urban aesthetic, sophisticated clean look, current trends"
            }
            Self::Animal => {
                "cute friendly animal characters, adorable lovable pets, charming wildlife, wholesome animal atmosphere"
            }
            Self::Photorealistic => {
                "ultra-realistic style, professional photographic quality, highly detailed imagery, cinematic photography"
            }
            Self::Animation => {
                "animated cartoon style, vibrant cheerful colors, anime illustration aesthetic, stylized character design"
            }
            Self::Webtoon => {
                "Korean webtoon art style, clean lines, subtle shading, expressive faces, bold color palette"
            }
            Self::Mukbang => {
                "food photography with a person eating deliciously, close-up, expressive eating, vibrant colors, appetizing, professional food styling"
            }
            Self::Cute => {
                "cute and charming illustration, soft pastel colors, lovely character design, heartwarming, adorable aesthetic"
            }
            Self::Ai => {
                "artificial intelligence concept art, futuristic, glowing circuitry, abstract digital patterns, sleek and sophisticated"
            }
            Self::Surreal => {
                "surreal and bizarre art, uncanny atmosphere, dreamlike, abstract and distorted elements, strange and intriguing"
            }
            Self::Creative => {
                "creative and imaginative artwork, unique concept, innovative composition, vibrant and expressive, artistic and original"
            }
            Self::Joseon => {
                "vibrant and richly colored Joseon Dynasty scene, traditional Hanok background, warm and comforting atmosphere"
            }
            Self::Custom(text) => text.as_str(),
        }
    }

    /// True when subjects should be drawn as animals rather than people.
    pub fn is_animal(&self) -> bool {
        matches!(self, Self::Animal)
    }

    /// True for illustrated (non-photographic) styles.
    pub fn is_illustrated(&self) -> bool {
        matches!(
            self,
            Self::Animation | Self::Webtoon | Self::Cute | Self::Animal
        )
    }
}

/// Camera framing for persona portraits.
///
/// Unlike [`Style`], composition is a closed set: parsing an unknown name is
/// a configuration error.
///
/// # Examples
///
/// ```
/// use storyboard_core::Composition;
///
/// let composition: Composition = "클로즈업".parse().unwrap();
/// assert_eq!(composition, Composition::CloseUp);
/// assert!("diagonal".parse::<Composition>().is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Composition {
    /// Facing the camera
    #[default]
    #[display("front")]
    Front,
    /// Profile
    #[display("side")]
    Side,
    /// Slightly turned
    #[display("three-quarter")]
    ThreeQuarter,
    /// Camera above the subject
    #[display("high-angle")]
    HighAngle,
    /// Camera below the subject
    #[display("low-angle")]
    LowAngle,
    /// Entire body in frame
    #[display("full-body")]
    FullBody,
    /// Waist up
    #[display("upper-body")]
    UpperBody,
    /// Headshot
    #[display("close-up")]
    CloseUp,
}

impl Composition {
    /// Prompt fragment describing this framing.
    pub fn fragment(&self) -> &'static str {
        match self {
            Self::Front => "Front view, facing camera directly",
            Self::Side => "Side view, profile shot",
            Self::ThreeQuarter => "Three-quarter view, slightly turned",
            Self::HighAngle => "High angle shot, view from above",
            Self::LowAngle => "Low angle shot, view from below",
            Self::FullBody => "Full body shot, entire person visible",
            Self::UpperBody => "Upper body shot, waist up portrait",
            Self::CloseUp => "Close-up headshot, detailed facial features",
        }
    }

    /// Korean label shown in the storyboard editor.
    pub fn korean_label(&self) -> &'static str {
        match self {
            Self::Front => "정면",
            Self::Side => "측면",
            Self::ThreeQuarter => "반측면",
            Self::HighAngle => "위에서",
            Self::LowAngle => "아래에서",
            Self::FullBody => "전신",
            Self::UpperBody => "상반신",
            Self::CloseUp => "클로즈업",
        }
    }
}

impl FromStr for Composition {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Composition::iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(name) || c.korean_label() == name)
            .ok_or_else(|| {
                ConfigError::new(format!(
                    "Unknown composition '{}'. Expected one of: {}",
                    name,
                    Composition::iter()
                        .map(|c| c.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// Output aspect ratio.
///
/// # Examples
///
/// ```
/// use storyboard_core::AspectRatio;
///
/// let ratio: AspectRatio = "9:16".parse().unwrap();
/// assert_eq!(ratio.dimensions(), (1080, 1920));
/// assert_eq!(ratio.to_string(), "9:16");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum AspectRatio {
    /// Landscape
    #[default]
    #[serde(rename = "16:9")]
    #[strum(serialize = "16:9")]
    #[display("16:9")]
    Landscape,
    /// Portrait
    #[serde(rename = "9:16")]
    #[strum(serialize = "9:16")]
    #[display("9:16")]
    Portrait,
    /// Square
    #[serde(rename = "1:1")]
    #[strum(serialize = "1:1")]
    #[display("1:1")]
    Square,
}

impl AspectRatio {
    /// Target pixel dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Landscape => (1920, 1080),
            Self::Portrait => (1080, 1920),
            Self::Square => (1024, 1024),
        }
    }

    /// Human-readable orientation.
    pub fn orientation(&self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
            Self::Square => "square",
        }
    }
}

/// Style parameters shared by every item of a batch.
///
/// Never mutated during generation.
///
/// # Examples
///
/// ```
/// use storyboard_core::{AspectRatio, Composition, Style, StyleParams};
///
/// let params = StyleParams::builder()
///     .style(Style::Cyberpunk)
///     .composition(Composition::UpperBody)
///     .aspect_ratio(AspectRatio::Square)
///     .build()
///     .unwrap();
///
/// assert_eq!(params.style(), &Style::Cyberpunk);
/// assert!(params.custom_prompt_override().is_none());
/// assert!(*params.subtitles());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct StyleParams {
    /// Visual style
    #[builder(default)]
    #[serde(default)]
    style: Style,

    /// Framing for portraits
    #[builder(default)]
    #[serde(default)]
    composition: Composition,

    /// Output aspect ratio
    #[builder(default)]
    #[serde(default)]
    aspect_ratio: AspectRatio,

    /// Replaces the composed prompt when non-blank
    #[builder(default)]
    #[serde(default)]
    custom_prompt_override: Option<String>,

    /// Ask for Korean subtitles on scene images
    #[builder(default = "true")]
    #[serde(default = "default_subtitles")]
    subtitles: bool,
}

fn default_subtitles() -> bool {
    true
}

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            style: Style::default(),
            composition: Composition::default(),
            aspect_ratio: AspectRatio::default(),
            custom_prompt_override: None,
            subtitles: true,
        }
    }
}

impl StyleParams {
    /// Creates a new builder.
    pub fn builder() -> StyleParamsBuilder {
        StyleParamsBuilder::default()
    }

    /// The override prompt, if one is set and not blank.
    pub fn active_override(&self) -> Option<&str> {
        self.custom_prompt_override
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}
