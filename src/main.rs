use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use coinmotion_report::api::{endpoint_url, HttpReportClient};
use coinmotion_report::app::App;
use coinmotion_report::config::Config;
use coinmotion_report::headless::{generate_report, GenerateOptions};
use coinmotion_report::logging;
use coinmotion_report::ui::install_panic_hook;
use coinmotion_report::wizard::{Step, SubmissionStatus, Wizard, WizardView};

#[derive(Parser)]
#[command(name = "coinmotion-report")]
#[command(about = "Generate PDF tax reports from a Coinmotion transaction export")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Report service base URL (overrides api.base_url)
    #[arg(long)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a report without the interactive wizard
    Generate {
        /// Coinmotion transaction export (CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Restrict the report to one tax year
        #[arg(short, long)]
        year: Option<String>,

        /// Accept the disclaimer non-interactively
        #[arg(long)]
        accept_disclaimer: bool,

        /// Directory to save the archive into (defaults to download.directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the final wizard state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved report endpoint
    Endpoint,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    let is_tui_mode = cli.command.is_none();
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::Generate {
            file,
            year,
            accept_disclaimer,
            output,
            json,
        }) => {
            let options = GenerateOptions {
                file,
                year,
                accept_disclaimer,
                output_dir: output.unwrap_or_else(|| config.download_path()),
            };
            cmd_generate(&config, options, json).await
        }
        Some(Commands::Endpoint) => {
            println!("{}", endpoint_url(&config.api.base_url));
            Ok(ExitCode::SUCCESS)
        }
        None => {
            run_tui(config, logging_handle.log_file_path).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_tui(config: Config, log_file_path: Option<PathBuf>) -> Result<()> {
    install_panic_hook();

    let client = Arc::new(HttpReportClient::from_config(&config.api)?);
    let mut app = App::new(config, client);
    let result = app.run().await;

    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

async fn cmd_generate(config: &Config, options: GenerateOptions, json: bool) -> Result<ExitCode> {
    let client = Arc::new(HttpReportClient::from_config(&config.api)?);
    let mut wizard = Wizard::new(client);

    let outcome = generate_report(&mut wizard, &options).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.view)?);
    } else {
        print_summary(&outcome.view, outcome.saved.as_deref());
    }

    if outcome.view.status == SubmissionStatus::Failed {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_summary(view: &WizardView, saved: Option<&Path>) {
    match (view.step, view.status) {
        (Step::Result, SubmissionStatus::Succeeded) => {
            println!("Your PDF zip has been generated.");
            if let Some(path) = saved {
                println!("Saved: {}", path.display());
            }
        }
        _ => {
            let message = view.error_message.as_deref().unwrap_or("Upload failed.");
            eprintln!("Error: {}", message);
        }
    }
}
