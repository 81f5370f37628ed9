use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "faqbot")]
#[command(
    author,
    version,
    about = "FAQ chatbot REST API backed by a hosted LLM",
    long_about = None
)]
pub struct Cli {
    /// Path to a TOML config file (default: config/$CONFIG_ENV.toml when present)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<String>,

    /// SQLite database file, overrides `database.path`
    #[arg(long, global = true)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Bind address, overrides `server.host`
        #[arg(long)]
        host: Option<String>,

        /// Port, overrides `server.port`
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Add a training Q&A pair directly to the database
    Train { question: String, answer: String },

    /// Print conversation log and training pair counts
    Stats,
}
