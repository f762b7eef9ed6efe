use std::io::Write;
use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::DateTime;
use clap::{Parser, ValueEnum};

use crate::codec::read_archive;
use crate::ingest::ingest_all;
use crate::models::{Post, PostHistory, find_simultaneous_posts};
use crate::validator::Validator;

#[derive(Parser)]
#[command(name = "postwash")]
#[command(version = "0.1.0")]
#[command(about = "Clean and consolidate posts exported from Facebook", long_about = None)]
pub struct Cli {
    /// The archive files to ingest, e.g. your_posts_1.json
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format for the consolidated timeline
    #[arg(short, long, value_enum, default_value_t = Format::Ndjson)]
    pub format: Format,

    /// Emit the timeline even if some posts were defective
    #[arg(long)]
    pub partial: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One JSON array holding all posts
    Json,
    /// One JSON object per line (newline-delimited JSON)
    Ndjson,
    /// A pretty-printed JSON array
    Pretty,
    /// No timeline output, diagnostics only
    None,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut history = PostHistory::new();
    let mut error_count = 0;

    for file in &cli.files {
        let filename = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());

        let value = match read_archive(file) {
            Ok(value) => value,
            Err(err) => {
                eprintln!("error: {err:#}");
                error_count += 1;
                continue;
            }
        };

        let before = history.len();
        let errors = ingest_all(&Validator::new(&value, &filename), &mut history);
        for err in &errors {
            eprintln!("error: {err}");
        }
        error_count += errors.len();
        eprintln!("{}: {} new posts, {} errors", filename, history.len() - before, errors.len());
    }

    let timeline = history.timeline();
    report_simultaneous(&timeline);

    eprintln!("{} unique posts, {} errors across {} files", timeline.len(), error_count, cli.files.len());

    if error_count > 0 && !cli.partial {
        bail!("refusing to write timeline after {error_count} errors (use --partial to override)");
    }

    write_timeline(&timeline, cli.format)?;
    Ok(())
}

fn report_simultaneous(timeline: &[Post]) {
    for run in find_simultaneous_posts(timeline) {
        let timestamp = timeline[run.start].timestamp;
        let when = DateTime::from_timestamp(timestamp, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| timestamp.to_string());
        eprintln!("warning: {} distinct posts at {}", run.len(), when);
    }
}

fn write_timeline(timeline: &[Post], format: Format) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        Format::Json => {
            serde_json::to_writer(&mut out, timeline)?;
            writeln!(out)?;
        }
        Format::Ndjson => {
            for post in timeline {
                serde_json::to_writer(&mut out, post)?;
                writeln!(out)?;
            }
        }
        Format::Pretty => {
            serde_json::to_writer_pretty(&mut out, timeline)?;
            writeln!(out)?;
        }
        Format::None => {}
    }
    Ok(())
}
