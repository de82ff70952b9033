//! CLI module
//!
//! The binary front-end owns the session: it loads configuration, wires the
//! collaborators and keeps the transcript for the turns it runs.

pub mod ask;

use clap::{Parser, Subcommand};

/// Adaptive RAG - answers questions from a knowledge index or live web search
#[derive(Parser)]
#[command(name = "adaptive-rag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Answer one question through the adaptive pipeline
    Ask(ask::AskArgs),
}
