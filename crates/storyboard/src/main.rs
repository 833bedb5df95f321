//! Storyboard CLI binary.
//!
//! - `personas`: analyze a script and write one portrait per character
//! - `scenes`: split a script into scenes and write one image per scene
//! - `config`: print the effective configuration

use clap::Parser;
use storyboard::observability::{ObservabilityConfig, init_observability_with_config};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, load_config, run_personas, run_scenes};

    // GEMINI_API_KEY may live in .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut observability = ObservabilityConfig::default().with_json_logs(cli.json_logs);
    if cli.verbose {
        observability = observability.with_log_level("debug");
    }
    init_observability_with_config(observability)?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Personas {
            script,
            out,
            reference,
            composition,
            style,
        } => {
            run_personas(
                config,
                &script,
                &out,
                reference.as_deref(),
                &composition,
                &style,
            )
            .await?;
        }

        Commands::Scenes {
            script,
            count,
            out,
            personas,
            style_reference,
            no_subtitles,
            style,
        } => {
            run_scenes(
                config,
                &script,
                count,
                &out,
                personas.as_deref(),
                style_reference.as_deref(),
                !no_subtitles,
                &style,
            )
            .await?;
        }

        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
