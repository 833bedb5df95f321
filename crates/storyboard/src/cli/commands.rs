//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Storyboard - persona and scene images from a script
#[derive(Parser, Debug)]
#[command(name = "storyboard")]
#[command(about = "Generate persona portraits and storyboard scenes from a script", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file (defaults to ./storyboard.toml and ~/.config/storyboard/)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one portrait per character in the script
    Personas {
        /// Path to the script file
        #[arg(long)]
        script: PathBuf,

        /// Output directory
        #[arg(long)]
        out: PathBuf,

        /// Face to reproduce in every portrait
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Camera framing (front, side, close-up, ... or the Korean label)
        #[arg(long, default_value = "front")]
        composition: String,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Generate one image per scene of the script
    Scenes {
        /// Path to the script file
        #[arg(long)]
        script: PathBuf,

        /// Number of scenes
        #[arg(long, default_value = "8")]
        count: usize,

        /// Output directory
        #[arg(long)]
        out: PathBuf,

        /// Directory written by `personas`, used for character consistency
        #[arg(long)]
        personas: Option<PathBuf>,

        /// Image whose look every scene should match
        #[arg(long)]
        style_reference: Option<PathBuf>,

        /// Ask for images without Korean subtitles
        #[arg(long)]
        no_subtitles: bool,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Print the effective configuration as JSON
    Config,
}

/// Style options shared by both generation commands
#[derive(Args, Debug, Clone)]
pub struct StyleArgs {
    /// Visual style name (English or Korean), or free-form style text
    #[arg(long, default_value = "modern")]
    pub style: String,

    /// Aspect ratio: 16:9, 9:16 or 1:1
    #[arg(long, default_value = "16:9")]
    pub aspect_ratio: String,

    /// Use this prompt instead of the composed one
    #[arg(long)]
    pub prompt: Option<String>,
}
