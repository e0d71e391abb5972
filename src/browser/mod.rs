use anyhow::{Context, Result};

/// Open a pull request URL in the user's default browser
///
/// # Errors
/// Returns error if no browser can be launched
pub fn open_url(url: &str) -> Result<()> {
    webbrowser::open(url).with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}
