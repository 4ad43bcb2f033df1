//! `studyflow` command-line entry point.
//!
//! # Responsibility
//! - Read provider-shaped JSON (or plain text) from files, run one core
//!   operation and print the result as JSON on stdout, or as a numbered
//!   summary for agenda commands given `--text`.
//! - Keep all domain behavior in `studyflow_core`.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use studyflow_core::{
    chunk_words, core_version, init_logging, normalize, normalize_emails, normalize_events, rank,
    render_emails, render_events, render_tasks, CoreConfig, EmbeddingRecord, MetadataFilter,
    RawEmail, RawEvent, RawOccurrenceSource, TimeWindow,
};

#[derive(Parser, Debug)]
#[command(name = "studyflow", version, about, long_about = None)]
struct Args {
    /// Write rolling logs into this absolute directory.
    #[clap(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize provider tasks into dated occurrences.
    Tasks {
        /// JSON array of raw task records
        #[clap(short, long)]
        input: PathBuf,

        /// First day of the window (YYYY-MM-DD), defaults to today
        #[clap(long)]
        today: Option<NaiveDate>,

        /// Lookahead length in days
        #[clap(long)]
        days: Option<u32>,

        /// Print a numbered summary instead of JSON
        #[clap(long)]
        text: bool,
    },
    /// Normalize provider calendar events.
    Events {
        /// JSON array of raw event records
        #[clap(short, long)]
        input: PathBuf,

        /// Fallback date for undated events (YYYY-MM-DD)
        #[clap(long)]
        today: Option<NaiveDate>,

        /// Print a numbered summary instead of JSON
        #[clap(long)]
        text: bool,
    },
    /// Normalize provider mail messages (full format).
    Emails {
        /// JSON array of raw message records
        #[clap(short, long)]
        input: PathBuf,

        /// Print a numbered summary instead of JSON
        #[clap(long)]
        text: bool,
    },
    /// Rank stored embeddings against a query vector.
    Rank {
        /// JSON array of floats
        #[clap(short, long)]
        query: PathBuf,

        /// JSON array of `{id, metadata, content?, embedding}` rows
        #[clap(short, long)]
        candidates: PathBuf,

        /// Number of matches to keep
        #[clap(short, long)]
        k: Option<usize>,

        /// Metadata key to filter on
        #[clap(long, requires = "filter", default_value = "file_name")]
        filter_key: String,

        /// Case-insensitive substring the metadata value must contain
        #[clap(long)]
        filter: Option<String>,
    },
    /// Split a text file into overlapping word windows.
    Chunk {
        /// Plain-text input
        #[clap(short, long)]
        input: PathBuf,

        /// Words per chunk
        #[clap(long)]
        size: Option<usize>,

        /// Words shared by consecutive chunks
        #[clap(long)]
        overlap: Option<usize>,
    },
    /// Print the core version.
    Version,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = CoreConfig::from_env().context("invalid STUDYFLOW_* environment")?;

    if let Some(log_dir) = &args.log_dir {
        init_logging(&config.log_level, log_dir).context("failed to start logging")?;
    }

    match args.command {
        Command::Tasks {
            input,
            today,
            days,
            text,
        } => {
            let sources: Vec<RawOccurrenceSource> = read_json(&input)?;
            let today = today.unwrap_or_else(|| config.zone.today());
            let window = TimeWindow::lookahead(today, days.unwrap_or(config.lookahead_days))?;
            let occurrences = normalize(&sources, &window, &config.zone);
            info!(
                "event=cli_tasks module=cli status=ok occurrences={}",
                occurrences.len()
            );
            if text {
                print_text(&render_tasks(&occurrences))
            } else {
                print_json(&occurrences)
            }
        }
        Command::Events { input, today, text } => {
            let events: Vec<RawEvent> = read_json(&input)?;
            let today = today.unwrap_or_else(|| config.zone.today());
            let events = normalize_events(&events, &config.zone, today);
            if text {
                print_text(&render_events(&events))
            } else {
                print_json(&events)
            }
        }
        Command::Emails { input, text } => {
            let messages: Vec<RawEmail> = read_json(&input)?;
            let emails = normalize_emails(&messages);
            info!(
                "event=cli_emails module=cli status=ok emails={}",
                emails.len()
            );
            if text {
                print_text(&render_emails(&emails))
            } else {
                print_json(&emails)
            }
        }
        Command::Rank {
            query,
            candidates,
            k,
            filter_key,
            filter,
        } => {
            let query: Vec<f32> = read_json(&query)?;
            let candidates: Vec<EmbeddingRecord> = read_json(&candidates)?;
            let filter = filter.map(|value| MetadataFilter::new(filter_key, value));
            let outcome = rank(
                &query,
                &candidates,
                k.unwrap_or(config.top_k),
                filter.as_ref(),
            );
            info!(
                "event=cli_rank module=cli status=ok returned={} rejected={}",
                outcome.matches.len(),
                outcome.rejected.len()
            );
            print_json(&outcome)
        }
        Command::Chunk {
            input,
            size,
            overlap,
        } => {
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read `{}`", input.display()))?;
            let chunks = chunk_words(
                &text,
                size.unwrap_or(config.chunk_size),
                overlap.unwrap_or(config.chunk_overlap),
            )?;
            print_json(&chunks)
        }
        Command::Version => {
            println!("studyflow_core version={}", core_version());
            Ok(())
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("`{}` is not valid input JSON", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_text(text: &str) -> Result<()> {
    println!("{}", text.trim_end());
    Ok(())
}
