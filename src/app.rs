//! Application logic for the ask-sql CLI.
//!
//! This module contains the command logic separated from the main entry
//! point to enable testing. Each `run_*` function takes explicit parameters
//! plus the loaded [`Config`] and returns the text to print along with an
//! exit code; `main` stays a thin wrapper.

use std::{path::PathBuf, time::Duration};

use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    cli::{Format, Provider},
    config::Config,
    error::{AppResult, config_error, db_error},
    executor::{ExecutionPolicy, QueryOutcome, execute},
    llm::{LlmClient, LlmProvider},
    output::{AskReport, OutputFormat, OutputOptions, format_report},
    schema,
    seed::seed,
    synth::Synthesizer
};

/// Parameters for the ask command
#[derive(Debug, Clone)]
pub struct AskParams {
    pub question:      String,
    pub db:            Option<PathBuf>,
    pub provider:      Option<Provider>,
    pub api_key:       Option<String>,
    pub model:         Option<String>,
    pub ollama_url:    String,
    pub output_format: Format,
    pub read_only:     bool,
    pub check_schema:  bool,
    pub dry_run:       bool,
    pub no_color:      bool
}

/// Parameters for the query command
#[derive(Debug, Clone)]
pub struct QueryParams {
    pub sql:           String,
    pub db:            Option<PathBuf>,
    pub read_only:     bool,
    pub output_format: Format,
    pub no_color:      bool
}

/// Output of a command run, ready for printing
#[derive(Debug, Clone)]
pub struct RunResult {
    pub exit_code: i32,
    pub output:    String
}

/// Convert CLI format to internal OutputFormat
pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml
    }
}

/// Create output options from parameters
pub fn create_output_options(format: Format, no_color: bool) -> OutputOptions {
    OutputOptions {
        format:  convert_format(format),
        colored: !no_color
    }
}

/// Resolve the database path from CLI argument or config
pub fn resolve_db_path(cli_db: Option<PathBuf>, config: &Config) -> PathBuf {
    cli_db.unwrap_or_else(|| config.database.path.clone())
}

/// Resolve the execution policy from the read-only flag
pub fn resolve_policy(read_only: bool) -> ExecutionPolicy {
    if read_only {
        ExecutionPolicy::ReadOnly
    } else {
        ExecutionPolicy::Unrestricted
    }
}

/// Get effective provider: CLI flag, then config file / `LLM_PROVIDER`,
/// then Gemini
pub fn get_effective_provider(
    provider: Option<Provider>,
    config_provider: Option<String>
) -> AppResult<Provider> {
    if let Some(provider) = provider {
        return Ok(provider);
    }
    match config_provider {
        Some(name) => Provider::from_str(&name, true).map_err(|_| {
            config_error(format!(
                "Unknown LLM provider '{}' (expected gemini, openai, anthropic or ollama)",
                name
            ))
        }),
        None => Ok(Provider::Gemini)
    }
}

/// Get effective model name
pub fn get_effective_model(
    model: Option<String>,
    config_model: Option<String>,
    provider: &Provider
) -> String {
    model
        .or(config_model)
        .unwrap_or_else(|| provider.default_model().to_string())
}

/// Get effective Ollama URL
pub fn get_effective_ollama_url(url: String, config_url: Option<String>) -> String {
    if url == "http://localhost:11434" {
        config_url.unwrap_or(url)
    } else {
        url
    }
}

/// Build LLM provider from parameters
///
/// Keyed providers fail here, before any network or database activity, when
/// no credential was supplied.
pub fn build_llm_provider(
    provider: Provider,
    api_key: Option<String>,
    model: String,
    ollama_url: String
) -> AppResult<LlmProvider> {
    match provider {
        Provider::Gemini => {
            let key = api_key.ok_or_else(|| {
                config_error("API key required for Gemini (use --api-key or LLM_API_KEY)")
            })?;
            Ok(LlmProvider::Gemini {
                api_key: key,
                model
            })
        }
        Provider::OpenAI => {
            let key = api_key.ok_or_else(|| {
                config_error("API key required for OpenAI (use --api-key or LLM_API_KEY)")
            })?;
            Ok(LlmProvider::OpenAI {
                api_key: key,
                model
            })
        }
        Provider::Anthropic => {
            let key = api_key.ok_or_else(|| {
                config_error("API key required for Anthropic (use --api-key or LLM_API_KEY)")
            })?;
            Ok(LlmProvider::Anthropic {
                api_key: key,
                model
            })
        }
        Provider::Ollama => Ok(LlmProvider::Ollama {
            base_url: ollama_url,
            model
        })
    }
}

/// Exit code for an execution outcome
///
/// Zero rows is still success; only an error outcome maps to a nonzero
/// code, and it stays distinguishable from fatal errors (exit 1 via main).
pub fn outcome_exit_code(outcome: &QueryOutcome) -> i32 {
    match outcome {
        QueryOutcome::Rows(_) => 0,
        QueryOutcome::Error(_) => 2
    }
}

/// Run the ask command
pub async fn run_ask(params: AskParams, config: Config) -> AppResult<RunResult> {
    let db_path = resolve_db_path(params.db, &config);
    let output_opts = create_output_options(params.output_format.clone(), params.no_color);

    if params.dry_run {
        return Ok(RunResult {
            exit_code: 0,
            output:    format!(
                "=== DRY RUN - Would send to LLM ===\n\n{}",
                Synthesizer::prompt_for(&params.question)
            )
        });
    }

    // Credential validation comes first: a missing key must fail before
    // anything touches the database
    let provider = get_effective_provider(params.provider, config.llm.provider.clone())?;
    let effective_api_key = params.api_key.or(config.llm.api_key.clone());
    let effective_ollama_url =
        get_effective_ollama_url(params.ollama_url, config.llm.ollama_url.clone());
    let model_name = get_effective_model(params.model, config.llm.model.clone(), &provider);
    let llm_provider = build_llm_provider(
        provider,
        effective_api_key,
        model_name,
        effective_ollama_url
    )?;

    if params.check_schema {
        let findings = schema::verify(&db_path)?;
        if !findings.is_empty() {
            return Err(db_error(format!(
                "Declared schema does not match the store:\n  {}",
                findings.join("\n  ")
            )));
        }
    }

    let show_spinner = matches!(output_opts.format, OutputFormat::Text);
    let pb = ProgressBar::new_spinner();
    if show_spinner {
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Generating SQL...");
        pb.enable_steady_tick(Duration::from_millis(100));
    }

    let client = LlmClient::with_retry_config(llm_provider, config.retry);
    let synthesizer = Synthesizer::new(client);
    let sql = synthesizer.synthesize(&params.question).await;

    if show_spinner {
        pb.finish_and_clear();
    }
    let sql = sql?;

    let outcome = execute(&db_path, &sql, resolve_policy(params.read_only));
    let exit_code = outcome_exit_code(&outcome);
    let report = AskReport::new(sql, outcome);
    Ok(RunResult {
        exit_code,
        output: format_report(&report, &output_opts)
    })
}

/// Run the query command: the executor without the model in front
pub fn run_query(params: QueryParams, config: Config) -> RunResult {
    let db_path = resolve_db_path(params.db, &config);
    let output_opts = create_output_options(params.output_format, params.no_color);
    let outcome = execute(&db_path, &params.sql, resolve_policy(params.read_only));
    let exit_code = outcome_exit_code(&outcome);
    let report = AskReport::new(params.sql, outcome);
    RunResult {
        exit_code,
        output: format_report(&report, &output_opts)
    }
}

/// Run the seed command
pub fn run_seed(db: Option<PathBuf>, config: Config) -> AppResult<RunResult> {
    let db_path = resolve_db_path(db, &config);
    seed(&db_path)?;
    Ok(RunResult {
        exit_code: 0,
        output:    format!(
            "Tables created and data inserted successfully into {}",
            db_path.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::render_error;

    #[test]
    fn test_convert_format_text() {
        assert!(matches!(convert_format(Format::Text), OutputFormat::Text));
    }

    #[test]
    fn test_convert_format_json() {
        assert!(matches!(convert_format(Format::Json), OutputFormat::Json));
    }

    #[test]
    fn test_convert_format_yaml() {
        assert!(matches!(convert_format(Format::Yaml), OutputFormat::Yaml));
    }

    #[test]
    fn test_resolve_db_path_cli_wins() {
        let config = Config::default();
        let path = resolve_db_path(Some(PathBuf::from("other.sqlite3")), &config);
        assert_eq!(path, PathBuf::from("other.sqlite3"));
    }

    #[test]
    fn test_resolve_db_path_config_default() {
        let config = Config::default();
        let path = resolve_db_path(None, &config);
        assert_eq!(path, PathBuf::from("mydb.sqlite3"));
    }

    #[test]
    fn test_resolve_policy() {
        assert_eq!(resolve_policy(true), ExecutionPolicy::ReadOnly);
        assert_eq!(resolve_policy(false), ExecutionPolicy::Unrestricted);
    }

    #[test]
    fn test_get_effective_provider_cli_wins() {
        let provider =
            get_effective_provider(Some(Provider::Ollama), Some("openai".to_string()));
        assert!(matches!(provider, Ok(Provider::Ollama)));
    }

    #[test]
    fn test_get_effective_provider_from_config() {
        let provider = get_effective_provider(None, Some("openai".to_string()));
        assert!(matches!(provider, Ok(Provider::OpenAI)));
    }

    #[test]
    fn test_get_effective_provider_default_gemini() {
        let provider = get_effective_provider(None, None);
        assert!(matches!(provider, Ok(Provider::Gemini)));
    }

    #[test]
    fn test_get_effective_provider_unknown_name() {
        let result = get_effective_provider(None, Some("bedrock".to_string()));
        assert!(result.is_err());
        let rendered = render_error(&result.unwrap_err());
        assert!(rendered.contains("Unknown LLM provider 'bedrock'"));
    }

    #[test]
    fn test_get_effective_model_explicit() {
        let model = get_effective_model(Some("gpt-4o".to_string()), None, &Provider::OpenAI);
        assert_eq!(model, "gpt-4o");
    }

    #[test]
    fn test_get_effective_model_from_config() {
        let model = get_effective_model(None, Some("claude-3".to_string()), &Provider::Anthropic);
        assert_eq!(model, "claude-3");
    }

    #[test]
    fn test_get_effective_model_default_gemini() {
        let model = get_effective_model(None, None, &Provider::Gemini);
        assert_eq!(model, "gemini-1.5-flash");
    }

    #[test]
    fn test_get_effective_ollama_url_explicit() {
        let url = get_effective_ollama_url(
            "http://custom:11434".to_string(),
            Some("http://other:11434".to_string())
        );
        assert_eq!(url, "http://custom:11434");
    }

    #[test]
    fn test_get_effective_ollama_url_from_config() {
        let url = get_effective_ollama_url(
            "http://localhost:11434".to_string(),
            Some("http://config:11434".to_string())
        );
        assert_eq!(url, "http://config:11434");
    }

    #[test]
    fn test_build_llm_provider_gemini_no_key() {
        let result = build_llm_provider(
            Provider::Gemini,
            None,
            "gemini-1.5-flash".to_string(),
            "http://localhost:11434".to_string()
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_build_llm_provider_gemini_with_key() {
        let provider = build_llm_provider(
            Provider::Gemini,
            Some("test-key".to_string()),
            "gemini-1.5-flash".to_string(),
            "http://localhost:11434".to_string()
        )
        .unwrap();
        assert!(matches!(provider, LlmProvider::Gemini { .. }));
    }

    #[test]
    fn test_build_llm_provider_openai_no_key() {
        let result = build_llm_provider(
            Provider::OpenAI,
            None,
            "gpt-4o-mini".to_string(),
            "http://localhost:11434".to_string()
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_build_llm_provider_ollama_needs_no_key() {
        let provider = build_llm_provider(
            Provider::Ollama,
            None,
            "llama3.2".to_string(),
            "http://localhost:11434".to_string()
        )
        .unwrap();
        assert!(matches!(provider, LlmProvider::Ollama { .. }));
    }

    #[test]
    fn test_outcome_exit_code_rows() {
        let outcome = QueryOutcome::Rows(crate::executor::ResultSet {
            columns: vec![],
            rows:    vec![]
        });
        assert_eq!(outcome_exit_code(&outcome), 0);
    }

    #[test]
    fn test_outcome_exit_code_error() {
        let outcome = QueryOutcome::Error("no such table".to_string());
        assert_eq!(outcome_exit_code(&outcome), 2);
    }
}
