use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "callscope")]
#[command(about = "Summarize support calls and classify customer sentiment", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Bind address (default from config: 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Port (default from config: 5000)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Analyze a single transcript
    Analyze {
        /// Transcript text; read from stdin when neither this nor --file is given
        text: Option<String>,

        /// Read the transcript from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },

    /// Show persisted analyses
    History {
        /// Only show the most recent N rows
        #[arg(long)]
        limit: Option<usize>,
    },
}
