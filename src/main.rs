//! # ask-sql
//!
//! Query a local SQLite database in plain English.
//!
//! `ask-sql` translates a natural-language business question into a SQL
//! statement via a hosted language model, executes that statement against a
//! small fixed schema, and renders the result as a table.
//!
//! # Architecture
//!
//! One request flows through two components, used sequentially with no
//! feedback loop:
//!
//! 1. **Synthesizer** - concatenates the fixed schema description with the
//!    verbatim question, requests a single-shot completion from the
//!    configured provider (Gemini, OpenAI, Anthropic, or a local Ollama
//!    instance), and strips Markdown code fences from the reply. No SQL
//!    validation happens on this path.
//!
//! 2. **Executor** - opens a fresh connection to the SQLite file, runs the
//!    statement exactly once, eagerly fetches all rows, and closes the
//!    connection on every path. Engine errors come back as data next to the
//!    generated SQL instead of aborting the request.
//!
//! # Quick Start
//!
//! ```bash
//! # Create and populate the demo database
//! ask-sql seed
//!
//! # Ask a question (Gemini by default)
//! export LLM_API_KEY="..."
//! ask-sql ask "Which products cost less than 100?"
//!
//! # Run SQL directly, bypassing the model
//! ask-sql query "SELECT name, price FROM products"
//!
//! # Refuse anything that is not a read-only statement
//! ask-sql ask "Delete all sales" --read-only
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded from (in order of precedence):
//!
//! 1. Command-line arguments
//! 2. Environment variables (`LLM_API_KEY`, `LLM_PROVIDER`, `ASK_SQL_DB`, etc.)
//! 3. `.ask-sql.toml` in current directory
//! 4. `~/.config/ask-sql/config.toml`
//!
//! ## Example Configuration
//!
//! ```toml
//! [llm]
//! provider = "gemini"
//! model = "gemini-1.5-flash"
//!
//! [retry]
//! max_retries = 0   # single-shot; raise to retry transient failures
//!
//! [database]
//! path = "mydb.sqlite3"
//! ```
//!
//! # Exit Codes
//!
//! - `0` - Success, including a query that matched zero rows
//! - `1` - Fatal error (config, model call, seeding)
//! - `2` - The generated SQL failed to execute; the SQL and the engine's
//!   error text are still printed
//!
//! # Modules
//!
//! - [`synth`] - prompt assembly and code-fence sanitization
//! - [`executor`] - single-statement execution and error normalization
//! - [`llm`] - LLM provider integrations
//! - [`schema`] - declared schema text and the drift check
//! - [`seed`] - demo table creation and sample data
//! - [`config`] - configuration loading and validation
//! - [`output`] - result rendering (text table, JSON, YAML)
//! - [`error`] - error types and constructors

mod app;
mod cli;
mod config;
mod error;
mod executor;
mod llm;
mod output;
mod schema;
mod seed;
mod synth;

use std::process;

use clap::Parser;
use tokio::main;

use crate::{
    app::{AskParams, QueryParams, run_ask, run_query, run_seed},
    cli::{Cli, Commands},
    config::Config,
    error::{AppResult, render_error}
};

#[main]
async fn main() {
    match run().await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", render_error(&e));
            process::exit(1);
        }
    }
}

async fn run() -> AppResult<i32> {
    let cli = Cli::parse();
    let config = Config::load()?;

    let result = match cli.command {
        Commands::Ask {
            question,
            db,
            provider,
            api_key,
            model,
            ollama_url,
            output_format,
            read_only,
            check_schema,
            dry_run,
            no_color
        } => {
            run_ask(
                AskParams {
                    question,
                    db,
                    provider,
                    api_key,
                    model,
                    ollama_url,
                    output_format,
                    read_only,
                    check_schema,
                    dry_run,
                    no_color
                },
                config
            )
            .await?
        }
        Commands::Query {
            sql,
            db,
            read_only,
            output_format,
            no_color
        } => run_query(
            QueryParams {
                sql,
                db,
                read_only,
                output_format,
                no_color
            },
            config
        ),
        Commands::Seed {
            db
        } => run_seed(db, config)?
    };

    println!("{}", result.output);
    Ok(result.exit_code)
}
