use c2a_adium::{render_chatlog, translate, TranslateOptions};
use c2a_core::ConvertError;
use c2a_transcript::{parse_transcript, resolve_nickname, scan_transcripts};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub struct ConvertOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Used when a transcript has no self sender.
    pub nickname: Option<String>,
    pub translate: TranslateOptions,
    pub dry_run: bool,
    pub json: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct ConvertReport {
    /// Destination of every converted transcript, in scan order.
    pub converted: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Parse, translate and store one transcript. Returns the chatlog path.
pub fn convert_one(path: &Path, opts: &ConvertOptions) -> Result<PathBuf, ConvertError> {
    let transcript = parse_transcript(path)?;
    let nickname = resolve_nickname(&transcript, opts.nickname.as_deref())?;
    let log = translate(&transcript, &nickname, &opts.translate);
    let bytes = render_chatlog(&log)?;
    let dest = c2a_store::chatlog_path(&opts.output, &nickname, path, transcript.began)?;
    if !opts.dry_run {
        c2a_store::write_chatlog(&dest, &bytes)?;
    }
    Ok(dest)
}

/// `colloquy2adium [-i DIR] [-o DIR] [-n NICK]`
///
/// Only an unusable input root is an error; per-transcript failures are
/// logged, recorded in the report and skipped.
pub fn execute(opts: &ConvertOptions) -> anyhow::Result<ConvertReport> {
    if !opts.json {
        println!("Reading Colloquy logs from {}", opts.input.display());
        println!("Outputting Adium logs to {}", opts.output.display());
        println!();
    }

    let transcripts = scan_transcripts(&opts.input)?;
    let mut report = ConvertReport::default();

    for path in transcripts {
        match convert_one(&path, opts) {
            Ok(dest) => {
                if !opts.json {
                    if opts.dry_run {
                        println!("Would write {}", dest.display());
                    } else {
                        let name = dest.file_name().unwrap_or_default().to_string_lossy();
                        println!("Processed {name}");
                    }
                }
                report.converted.push(dest);
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping transcript");
                report.skipped.push(SkippedFile {
                    path,
                    reason: err.to_string(),
                });
            }
        }
    }

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        println!(
            "{} converted, {} skipped",
            report.converted.len(),
            report.skipped.len()
        );
        println!("Completed!");
    }

    Ok(report)
}
