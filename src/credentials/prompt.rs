use anyhow::{Context, Result};

/// Prompts user to enter GitHub personal access token
pub fn prompt_for_token() -> Result<String> {
    println!("GitHub personal access token required.");
    println!("Create one at: https://github.com/settings/tokens");
    println!("Required scopes: repo (for private repos) or public_repo (for public only)");
    println!(
        "Tip: set {} to skip this prompt.",
        super::ENV_TOKEN_VAR
    );
    println!();

    let token =
        rpassword::prompt_password("Enter token: ").context("Failed to read token from stdin")?;

    let token = token.trim();

    if token.is_empty() {
        anyhow::bail!("Token cannot be empty");
    }

    Ok(token.to_string())
}
