//! Tutor Core CLI
//!
//! Replays transcripts through the scaffolding ladder and audits stored
//! message history into session metrics. Handy for manual QA and as living
//! documentation of the collaborator contracts.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tutor_core::{compute_audit, LadderPolicy, Move, RawMessage};

#[derive(Parser)]
#[command(name = "tutor_cli")]
#[command(about = "Drive the reading-tutor decision core from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute session metrics from stored conversation messages
    Audit {
        /// Input messages JSON file (array of {sender, content, created_at, meta})
        #[arg(long)]
        r#in: PathBuf,

        /// Pretty-print the metrics JSON
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Replay a transcript through the ladder policy and print the self-audit
    Replay {
        /// Input transcript JSON file (array of {role: "child"|"assistant", content})
        #[arg(long)]
        r#in: PathBuf,
    },
}

/// One line of a replay transcript.
#[derive(Debug, Deserialize)]
struct TranscriptEntry {
    role: String,
    content: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Audit { r#in, pretty } => run_audit(&r#in, pretty),
        Commands::Replay { r#in } => run_replay(&r#in),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn run_audit(path: &Path, pretty: bool) -> Result<()> {
    let messages: Vec<RawMessage> = read_json(path)?;
    let metrics = compute_audit(&messages);
    let out = if pretty {
        serde_json::to_string_pretty(&metrics)?
    } else {
        serde_json::to_string(&metrics)?
    };
    println!("{out}");
    Ok(())
}

fn run_replay(path: &Path) -> Result<()> {
    let transcript: Vec<TranscriptEntry> = read_json(path)?;

    let mut policy = LadderPolicy::default();
    let mut planned: Option<Move> = None;

    for entry in &transcript {
        match entry.role.as_str() {
            "child" => {
                let chosen = policy.plan(&entry.content);
                println!("child: {:?}", entry.content);
                println!("  -> next move: {}", chosen.name());
                planned = Some(chosen);
            }
            "assistant" => {
                let chosen = planned.take().unwrap_or_default();
                policy.log_assistant(
                    chosen,
                    &entry.content,
                    "replayed from transcript",
                    serde_json::Map::new(),
                );
            }
            other => {
                eprintln!("skipping turn with unknown role: {other}");
            }
        }
    }

    let report = policy.validate();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
