use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::AsyncReadExt;
use tracing::debug;

use geoassist::cli::{Args, Command};
use geoassist::{Assistant, AssistantConfig, AssistantError, extractor, logging};

async fn read_source(source: &str) -> Result<String> {
    if source != "-" {
        return Ok(source.to_string());
    }
    let mut buffer = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buffer)
        .await
        .context("Failed to read map source from stdin")?;
    Ok(buffer)
}

async fn run(args: Args) -> Result<()> {
    let config = AssistantConfig::load_from_path(args.config.clone())?;
    logging::init_logging(&config.logging, args.verbose)?;
    debug!("Loaded configuration: {:?}", config);

    let source = read_source(args.command.source()).await?;

    let assistant = Assistant::from_config(config)?;
    match &args.command {
        Command::Locate { .. } => {
            let point = extractor::locate(&source)
                .ok_or_else(|| AssistantError::validation("No coordinates found"))?;
            println!("{}", point.format_coordinates());
        }
        Command::Circle {
            radius,
            output,
            seed,
            ..
        } => {
            let output = output.as_deref();
            match seed {
                Some(seed) => assistant.show_answer_circle(
                    &source,
                    *radius,
                    output,
                    &mut StdRng::seed_from_u64(*seed),
                )?,
                None => assistant.show_answer_circle(&source, *radius, output, &mut rand::rng())?,
            };
        }
        Command::Continent { .. } => {
            assistant.show_continent(&source).await;
        }
        Command::Country { .. } => {
            assistant.show_country(&source).await;
        }
        Command::Region { .. } => {
            assistant.show_country_region(&source).await;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = e
                .downcast_ref::<AssistantError>()
                .map_or_else(|| format!("{e:#}"), AssistantError::user_message);
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}
