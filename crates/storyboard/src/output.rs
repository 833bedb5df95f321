//! Output directory layout: one image file per item plus `manifest.json`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storyboard_core::{
    BatchOutcome, GeneratedItem, ImageData, ItemFailure, OutcomeSummary, WordReplacement,
};
use storyboard_error::{StorageError, StorageErrorKind, StoryboardResult};
use uuid::Uuid;

const MANIFEST_FILE: &str = "manifest.json";

/// One item as recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Item identifier
    pub id: Uuid,
    /// Zero-based position
    pub position: usize,
    /// Subject name
    pub subject_name: String,
    /// Character description or scene text
    pub description_or_scene: String,
    /// Image file name, relative to the manifest; `None` for placeholders
    pub file: Option<String>,
    /// MIME type of the image file
    pub mime_type: Option<String>,
    /// Prompt that produced the image
    pub prompt_used: String,
    /// Whether the fallback prompt produced the image
    pub used_fallback: bool,
    /// Words replaced to get past the content filter
    #[serde(default)]
    pub replacements: Vec<WordReplacement>,
}

/// Summary of a batch written next to its images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// What was generated ("personas", "scenes")
    pub label: String,
    /// Items requested
    pub requested: usize,
    /// Overall classification
    pub summary: OutcomeSummary,
    /// Human-readable status line
    pub status: String,
    /// Items in order
    pub items: Vec<ManifestEntry>,
    /// Failures in order
    pub failed: Vec<ItemFailure>,
}

/// A directory holding generated images and their manifest.
///
/// # Example Structure
///
/// ```text
/// out/personas/
/// ├── manifest.json
/// ├── 01-minji.png
/// └── 02-jisoo.png
/// ```
#[derive(Debug, Clone)]
pub struct OutputDirectory {
    path: PathBuf,
}

impl OutputDirectory {
    /// Open `path`, creating it if needed.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn create(path: impl AsRef<Path>) -> StoryboardResult<Self> {
        let path = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        Ok(Self { path })
    }

    /// Open an existing directory without creating it.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Write every image of `outcome` and a manifest describing it.
    ///
    /// Returns the manifest path.
    #[tracing::instrument(skip(self, outcome), fields(path = %self.path.display()))]
    pub fn write_outcome(&self, outcome: &BatchOutcome, label: &str) -> StoryboardResult<PathBuf> {
        let mut entries = Vec::with_capacity(outcome.items.len());

        for item in &outcome.items {
            let (file, mime_type) = match item.image_data.as_ref().filter(|i| !i.is_empty()) {
                Some(image) => {
                    let name = file_name(item, image);
                    self.write_file(&name, &image.bytes)?;
                    (Some(name), Some(image.mime_type.clone()))
                }
                None => (None, None),
            };
            entries.push(ManifestEntry {
                id: item.id,
                position: item.position,
                subject_name: item.subject_name.clone(),
                description_or_scene: item.description_or_scene.clone(),
                file,
                mime_type,
                prompt_used: item.prompt_used.clone(),
                used_fallback: item.used_fallback,
                replacements: item.replacements.clone(),
            });
        }

        let manifest = Manifest {
            label: label.to_string(),
            requested: outcome.requested,
            summary: outcome.summary,
            status: outcome.status_message(),
            items: entries,
            failed: outcome.failed.clone(),
        };
        let json = serde_json::to_vec_pretty(&manifest).map_err(|e| {
            StorageError::new(StorageErrorKind::Serialization(e.to_string()))
        })?;
        self.write_file(MANIFEST_FILE, &json)?;

        tracing::info!(images = outcome.succeeded_count(), "Wrote output directory");
        Ok(self.path.join(MANIFEST_FILE))
    }

    /// Read the manifest.
    pub fn read_manifest(&self) -> StoryboardResult<Manifest> {
        let bytes = self.read_file(MANIFEST_FILE)?;
        Ok(serde_json::from_slice(&bytes).map_err(|e| {
            StorageError::new(StorageErrorKind::Serialization(format!(
                "{}: {}",
                self.path.join(MANIFEST_FILE).display(),
                e
            )))
        })?)
    }

    /// Load previously written items with their images.
    ///
    /// Entries without an image file come back as placeholders.
    pub fn load_items(&self) -> StoryboardResult<Vec<GeneratedItem>> {
        let manifest = self.read_manifest()?;
        manifest
            .items
            .into_iter()
            .map(|entry| {
                let image_data = match (&entry.file, &entry.mime_type) {
                    (Some(file), mime_type) => {
                        let bytes = self.read_file(file)?;
                        let mime_type = mime_type.clone().unwrap_or_else(|| {
                            ImageData::mime_for_extension(extension(file)).to_string()
                        });
                        Some(ImageData::new(mime_type, bytes))
                    }
                    (None, _) => None,
                };
                Ok(GeneratedItem {
                    id: entry.id,
                    position: entry.position,
                    subject_name: entry.subject_name,
                    prompt_used: entry.prompt_used,
                    image_data,
                    description_or_scene: entry.description_or_scene,
                    used_fallback: entry.used_fallback,
                    replacements: entry.replacements,
                })
            })
            .collect()
    }

    fn write_file(&self, name: &str, bytes: &[u8]) -> StoryboardResult<()> {
        let path = self.path.join(name);
        std::fs::write(&path, bytes).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "Wrote file");
        Ok(())
    }

    fn read_file(&self, name: &str) -> StoryboardResult<Vec<u8>> {
        let path = self.path.join(name);
        Ok(std::fs::read(&path).map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?)
    }
}

fn extension(file: &str) -> &str {
    Path::new(file)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
}

/// `NN-slug.ext`, where the slug keeps letters and digits of any script.
fn file_name(item: &GeneratedItem, image: &ImageData) -> String {
    let slug: String = item
        .subject_name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let slug = if slug.is_empty() { "item".to_string() } else { slug };
    format!("{:02}-{}.{}", item.position + 1, slug, image.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyboard_core::{GenerationRequest, StyleParams, SubjectKind};

    fn item(name: &str) -> GeneratedItem {
        let request = GenerationRequest {
            subject_id: "id".to_string(),
            subject_name: name.to_string(),
            prompt_seed: "seed".to_string(),
            kind: SubjectKind::Persona,
            style_params: StyleParams::default(),
            references: vec![],
            reference_note: None,
        };
        GeneratedItem::success(4, &request, "prompt", ImageData::new("image/jpeg", vec![1]))
    }

    #[test]
    fn file_names_are_numbered_slugs() {
        let jpeg = ImageData::new("image/jpeg", vec![1]);
        assert_eq!(file_name(&item("Kim Min-ji"), &jpeg), "05-kim-min-ji.jpg");
        assert_eq!(file_name(&item("민지"), &jpeg), "05-민지.jpg");
        assert_eq!(file_name(&item("???"), &jpeg), "05-item.jpg");
    }
}
