//! # ask-sql Library
//!
//! Natural-language-to-SQL bridge over a local SQLite store.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod llm;
pub mod output;
pub mod schema;
pub mod seed;
pub mod synth;
