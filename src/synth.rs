//! Query synthesis: natural-language question in, SQL string out.
//!
//! The synthesizer concatenates the fixed schema instruction with the
//! user's question, requests a single-shot completion, and strips Markdown
//! code fences from whatever comes back. That is the entire contract: the
//! output is *intended* to be one valid SQL statement but is never parsed
//! or validated here. Multiple statements, leftover prose, or destructive
//! statements all pass through untouched and fail (or run) in the executor.

use std::sync::LazyLock;

use regex::Regex;

use crate::{error::AppResult, llm::LlmClient, schema::SCHEMA_PROMPT};

/// Regex for literal fence delimiters.
/// Longest alternative first so the language tag is consumed with its fence.
static FENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```sql|```").expect("valid regex"));

/// Turns a question into a SQL string via one LLM completion.
///
/// Construction requires an already-validated [`LlmClient`]; credential
/// checks happen when the provider value is built, not here and never via
/// ambient process state.
pub struct Synthesizer {
    client: LlmClient
}

impl Synthesizer {
    /// Create a synthesizer backed by the given client
    pub fn new(client: LlmClient) -> Self {
        Self {
            client
        }
    }

    /// Build the exact prompt that would be sent for `question`
    pub fn prompt_for(question: &str) -> String {
        format!("{}\n\n{}", SCHEMA_PROMPT, question)
    }

    /// Synthesize a SQL statement answering `question`
    ///
    /// # Errors
    ///
    /// Returns error if the model call fails (network, auth, rate limit).
    /// Empty or malformed completions are not detected here; they surface
    /// as execution errors downstream.
    pub async fn synthesize(&self, question: &str) -> AppResult<String> {
        let completion = self.client.complete(&Self::prompt_for(question)).await?;
        Ok(strip_code_fences(&completion))
    }
}

/// Remove Markdown code-fence delimiters and trim surrounding whitespace.
///
/// This is a literal textual removal of the ```` ```sql ```` and
/// ```` ``` ```` delimiter substrings, not syntax handling. Applying it
/// twice gives the same result as applying it once.
pub fn strip_code_fences(completion: &str) -> String {
    FENCE_REGEX.replace_all(completion, "").trim().to_string()
}
