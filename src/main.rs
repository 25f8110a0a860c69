// Offline HTML bundler
//
// Inlines the scripts, stylesheets and stylesheet assets of one HTML page so
// the result opens without a network connection.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use kodegen_tools_offline_html::cli::Cli;
use kodegen_tools_offline_html::pipeline;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("❌ Build failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = cli.to_config()?;
    let report = pipeline::bundle(&config).await?;

    if cli.report {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{json}");
    }

    Ok(())
}
