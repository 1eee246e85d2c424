use std::path::PathBuf;

use clap::{Parser, Subcommand};

use subtrans::{formats::SubtitleFormat, language::Language};

#[derive(Debug, Parser)]
#[command(name = "subtrans")]
#[command(
    about = "Translate timestamped transcripts, align words across languages, and write SRT, VTT and Markdown subtitles."
)]
pub struct Args {
    /// Path to config TOML (defaults to ./config.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Translate a transcription result and write aligned JSON plus subtitles
    Translate(TranslateCmd),
    /// Write subtitles from an aligned transcript or a raw transcription
    Subtitles(SubtitlesCmd),
    /// Show what is active at a point in time
    Resolve(ResolveCmd),
    /// List supported languages and their romanization methods
    Languages,
    /// Print the effective default config as TOML and exit
    PrintDefaultConfig,
}

#[derive(Debug, Parser)]
pub struct OutputArgs {
    /// Output directory (defaults to the input file's directory)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Subtitle formats to write (defaults to the configured list)
    #[arg(long = "format", value_enum)]
    pub formats: Vec<SubtitleFormat>,

    /// Allow overwriting output files
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Debug, Parser)]
pub struct TranslateCmd {
    /// Transcription JSON path, or '-' for stdin
    pub input: String,

    /// Target language (repeatable); replaces the configured targets
    #[arg(short, long = "language")]
    pub languages: Vec<Language>,

    /// Only write the aligned transcript JSON
    #[arg(long)]
    pub no_subtitles: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Parser)]
pub struct SubtitlesCmd {
    /// Aligned transcript JSON or raw transcription JSON, or '-' for stdin
    pub input: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Parser)]
pub struct ResolveCmd {
    /// Aligned transcript JSON path, or '-' for stdin
    pub input: String,

    /// Time in seconds or HH:MM:SS.mmm
    #[arg(long)]
    pub at: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}
