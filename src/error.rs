pub use masterror::{AppError, AppResult};

/// Render an error for terminal output
///
/// `AppError`'s own `Display` prints the kind taxonomy only ("Bad request",
/// "Service"); the attached message carries the part the user needs. This
/// renders the message when present and falls back to the kind otherwise.
pub fn render_error(err: &AppError) -> String {
    match err.message.as_deref() {
        Some(message) => message.to_string(),
        None => err.to_string()
    }
}

/// Create LLM API error
pub fn llm_api_error(message: impl Into<String>) -> AppError {
    AppError::service(message.into())
}

/// Create HTTP error
pub fn http_error(err: reqwest::Error) -> AppError {
    let msg = if err.is_timeout() {
        format!("Request timeout: {}", err)
    } else if err.is_connect() {
        format!("Connection failed: {}", err)
    } else if err.is_status() {
        format!("HTTP error {}: {}", err.status().unwrap_or_default(), err)
    } else {
        err.to_string()
    };
    AppError::service(msg)
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create database error for failures outside the executor contract
///
/// The executor never returns these: engine errors on the execute path
/// become `QueryOutcome::Error` data instead. This constructor is for
/// collaborators that must fail loudly, such as the seeder.
pub fn db_error(message: impl Into<String>) -> AppError {
    AppError::internal(message.into())
}
