use anyhow::Result;
use clap::Parser;

mod cli;
mod pipeline;

use subtrans::config;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    let cfg = config::Config::load(args.config.as_deref())?;
    config::init_tracing(&cfg.logging, args.log_level.as_deref())?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "subtrans starting");

    match args.command {
        cli::Command::Translate(cmd) => pipeline::run_translate(cmd, &cfg).await,
        cli::Command::Subtitles(cmd) => pipeline::run_subtitles(cmd, &cfg),
        cli::Command::Resolve(cmd) => pipeline::run_resolve(cmd),
        cli::Command::Languages => pipeline::run_languages(&cfg),
        cli::Command::PrintDefaultConfig => {
            let s = cfg.to_toml_pretty()?;
            print!("{s}");
            Ok(())
        }
    }
}
