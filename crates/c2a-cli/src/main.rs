mod cmd_convert;

use c2a_adium::{TranslateOptions, UnknownEventPolicy};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "colloquy2adium",
    version,
    about = "Convert Colloquy transcripts into Adium chatlogs"
)]
struct Cli {
    /// The directory containing the Colloquy transcripts
    /// [default: ~/Documents/Colloquy Transcripts]
    #[arg(short, long, value_name = "INPUT_DIR")]
    input: Option<PathBuf>,
    /// The directory to output Adium chatlogs
    /// [default: ~/Library/Application Support/Adium 2.0/Users/Default/Logs]
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    output: Option<PathBuf>,
    /// The account name to use (IRC nickname) when a transcript does not record one
    #[arg(short, long, value_name = "NICKNAME")]
    nickname: Option<String>,
    /// Write an empty status line for events that have no Adium equivalent
    #[arg(long)]
    keep_unknown_events: bool,
    /// Convert without writing; print where each chatlog would go
    #[arg(long)]
    dry_run: bool,
    /// Print the final report as JSON instead of progress lines
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let unknown_events = if cli.keep_unknown_events {
        UnknownEventPolicy::EmptyStatus
    } else {
        UnknownEventPolicy::Skip
    };

    let opts = cmd_convert::ConvertOptions {
        input: cli.input.unwrap_or_else(c2a_store::default_input_root),
        output: cli.output.unwrap_or_else(c2a_store::default_output_root),
        nickname: cli.nickname,
        translate: TranslateOptions { unknown_events },
        dry_run: cli.dry_run,
        json: cli.json,
    };

    cmd_convert::execute(&opts)?;
    Ok(())
}
