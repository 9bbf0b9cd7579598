//! jasper - command-line client for the Jasper text-processing backend
//!
//! # Examples
//!
//! ```bash
//! # Is the backend up?
//! jasper health
//!
//! # Summarize a file
//! jasper summarize --file notes.txt --max-length 200 --pretty
//!
//! # Pipe text through the hybrid detector
//! cat essay.md | jasper detect hybrid
//!
//! # Pull the text out of a PDF
//! jasper extract --file thesis.pdf
//! ```

mod cli;
mod commands;
mod detect_commands;

use crate::{cli::Cli, commands::Commands, detect_commands::DetectCommands};

use jasper_client::{ApiClient, ParaphraseOptions, RetryPolicy, SummarizeOptions};
use jasper_config::Config;

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use serde_json::Value;

type CliResult = Result<Value, Box<dyn Error>>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Backend URL: explicit flag > config file / JASPER_* env > default
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let client = match cli.server {
        Some(url) => ApiClient::with_policy(&url, RetryPolicy::from(&config.retry)),
        None => ApiClient::from_config(&config),
    };

    match run(&client, cli.command).await {
        Ok(value) => {
            let output = if cli.pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            };

            match output {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error serializing response: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &ApiClient, command: Commands) -> CliResult {
    match command {
        Commands::Health => to_json(client.health().await?),
        Commands::Humanize { input } => to_json(client.humanize(&input.read()?).await?),
        Commands::Summarize {
            input,
            max_length,
            min_length,
        } => {
            let options = SummarizeOptions {
                max_length,
                min_length,
            };
            to_json(client.summarize(&input.read()?, options).await?)
        }
        Commands::Paraphrase { input, variations } => {
            let options = ParaphraseOptions { variations };
            to_json(client.paraphrase(&input.read()?, options).await?)
        }
        Commands::Grammar { input } => to_json(client.grammar(&input.read()?).await?),
        Commands::AiDetect { input } => to_json(client.ai_detect(&input.read()?).await?),
        Commands::Plagiarism { input } => to_json(client.plagiarism(&input.read()?).await?),
        Commands::Detect { engine } => match engine {
            DetectCommands::Plagiarism { input } => {
                to_json(client.detect_plagiarism(&input.read()?).await?)
            }
            DetectCommands::Ai { input } => to_json(client.detect_ai(&input.read()?).await?),
            DetectCommands::Hybrid { input } => {
                to_json(client.detect_hybrid(&input.read()?).await?)
            }
        },
        Commands::CorpusStats => to_json(client.corpus_stats().await?),
        Commands::Upload { file } => to_json(client.upload(&file).await?),
        Commands::Extract { file } => to_json(client.upload_extract(&file).await?),
    }
}

fn to_json<T: Serialize>(value: T) -> CliResult {
    Ok(serde_json::to_value(value)?)
}
