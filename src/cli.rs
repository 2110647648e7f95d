use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// ask-sql - Query a SQLite database in plain English via an LLM
#[derive(Parser, Debug)]
#[command(name = "ask-sql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a question into SQL and run it against the database
    Ask {
        /// Natural-language question to answer
        question: String,

        /// Path to the SQLite database file
        #[arg(short, long)]
        db: Option<PathBuf>,

        /// LLM provider to use (falls back to config, then Gemini)
        #[arg(short, long, value_enum)]
        provider: Option<Provider>,

        /// API key for Gemini, OpenAI or Anthropic
        #[arg(short, long, env = "LLM_API_KEY")]
        api_key: Option<String>,

        /// Model name
        #[arg(short, long)]
        model: Option<String>,

        /// Ollama base URL
        #[arg(long, default_value = "http://localhost:11434")]
        ollama_url: String,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Reject generated statements that are not read-only
        #[arg(long)]
        read_only: bool,

        /// Verify the live database matches the declared schema before asking
        #[arg(long)]
        check_schema: bool,

        /// Show the prompt that would be sent without making an API call
        #[arg(long)]
        dry_run: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    },

    /// Run a SQL statement directly, bypassing the LLM
    Query {
        /// SQL statement to execute
        sql: String,

        /// Path to the SQLite database file
        #[arg(short, long)]
        db: Option<PathBuf>,

        /// Reject statements that are not read-only
        #[arg(long)]
        read_only: bool,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    },

    /// Create the demo tables and insert the sample rows
    ///
    /// Table creation is idempotent; row insertion is not, so running seed
    /// twice duplicates the sample data.
    Seed {
        /// Path to the SQLite database file
        #[arg(short, long)]
        db: Option<PathBuf>
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Provider {
    Gemini,
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    Ollama
}

impl Provider {
    /// Get default model for provider
    pub fn default_model(&self) -> &str {
        match self {
            Self::Gemini => "gemini-1.5-flash",
            Self::OpenAI => "gpt-4o-mini",
            Self::Anthropic => "claude-sonnet-4-20250514",
            Self::Ollama => "llama3.2"
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
