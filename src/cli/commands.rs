use clap::{Parser, Subcommand};

/// `DeepDraft` - Web-grounded research drafting assistant.
#[derive(Parser, Debug)]
#[command(name = "deepdraft")]
#[command(version = "0.1.0")]
#[command(
    about = "Research a question on the live web, then draft a grounded answer.",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Retrieve snippets for a question and draft an answer
    Research {
        /// The research question (omit to enter the interactive loop)
        query: Option<String>,

        /// Number of snippets to retrieve, 3-10 (default from config)
        #[arg(short, long)]
        results: Option<u8>,

        /// Draft creativity knob, 0.0-1.0 (default from config)
        #[arg(short, long)]
        temperature: Option<f32>,

        /// Write the drafted answer to a file
        #[arg(
            long,
            value_name = "PATH",
            num_args = 0..=1,
            default_missing_value = "drafted_answer.txt"
        )]
        save: Option<String>,
    },

    /// Start the HTTP gateway exposing research over JSON
    Gateway {
        /// Port to listen on (use 0 for a random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Show resolved configuration and provider readiness
    Status,
}
