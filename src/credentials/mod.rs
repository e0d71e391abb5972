pub mod prompt;

pub use prompt::prompt_for_token;

use anyhow::Result;

/// Environment variable name for providing a GitHub token non-interactively
pub const ENV_TOKEN_VAR: &str = "PR_PULSE_GH_TOKEN";

/// Check for a GitHub token in the PR_PULSE_GH_TOKEN environment variable.
/// Returns Some(token) if the env var is set and non-empty, None otherwise.
pub fn get_token_from_env() -> Option<String> {
    match std::env::var(ENV_TOKEN_VAR) {
        Ok(val) => {
            let trimmed = val.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

/// Resolve the bearer credential: `--token` flag, then environment, then
/// an interactive prompt. The token is only ever held in memory and passed
/// to the API client; nothing is persisted.
pub fn resolve_token(flag: Option<String>) -> Result<String> {
    if let Some(token) = flag {
        let trimmed = token.trim().to_string();
        if !trimmed.is_empty() {
            return Ok(trimmed);
        }
    }
    if let Some(token) = get_token_from_env() {
        return Ok(token);
    }
    prompt_for_token()
}
