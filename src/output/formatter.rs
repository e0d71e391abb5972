use chrono::{Duration, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::github::types::{PrState, PrStats, PullRequest};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Serialize any payload as pretty JSON for machine consumption
pub fn format_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

/// Format the aggregate counts as a one-per-line summary.
/// "closed" means closed without merging; total is the sum of the three.
pub fn format_stats(stats: &PrStats, use_colors: bool) -> String {
    if use_colors {
        format!(
            "Open:   {}\nClosed: {}\nMerged: {}\nTotal:  {}",
            stats.open.green(),
            stats.closed.red(),
            stats.merged.magenta(),
            stats.total.bold()
        )
    } else {
        format!(
            "Open:   {}\nClosed: {}\nMerged: {}\nTotal:  {}",
            stats.open, stats.closed, stats.merged, stats.total
        )
    }
}

/// Disposition label for one PR: merged trumps the raw issue state
fn disposition(pr: &PullRequest) -> &'static str {
    if pr.merged {
        "merged"
    } else {
        match pr.state {
            PrState::Open => "open",
            PrState::Closed => "closed",
        }
    }
}

/// Short reference like "octo/widgets#42", derived from the web URL.
/// Falls back to "#42" when the URL has an unexpected shape.
fn short_ref(pr: &PullRequest) -> String {
    if let Ok(url) = url::Url::parse(&pr.url) {
        let parts: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();
        if parts.len() >= 2 {
            return format!("{}/{}#{}", parts[0], parts[1], pr.number);
        }
    }
    format!("#{}", pr.number)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate title to fit available width, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_width {
        title.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}

/// Format PRs as a table with columns: index, disposition, age, title, ref.
/// Rows keep the provider's descending last-updated order.
pub fn format_pr_table(prs: &[PullRequest], use_colors: bool) -> String {
    if prs.is_empty() {
        return "No pull requests found.".to_string();
    }

    let term_width = get_terminal_width();

    // index: 3 chars ("99."), disposition: 6 chars ("merged"), age: 4 chars
    let index_width = 3;
    let disposition_width = 6;
    let age_width = 4;
    let separator = "  ";

    prs.iter()
        .enumerate()
        .map(|(idx, pr)| {
            let index_str = format!("{:>2}.", idx + 1);
            let disposition_str = format!("{:<width$}", disposition(pr), width = disposition_width);
            let age_str = format!(
                "{:>width$}",
                format_age(Utc::now() - pr.created_at),
                width = age_width
            );

            let pr_ref = short_ref(pr);
            let fixed_width = index_width
                + 1
                + disposition_width
                + age_width
                + separator.len() * 3
                + pr_ref.len();

            let title = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_title(&pr.title, width - fixed_width)
                } else {
                    truncate_title(&pr.title, 20)
                }
            } else {
                // No terminal (pipe), don't truncate
                pr.title.clone()
            };

            if use_colors {
                let disposition_colored = if pr.merged {
                    disposition_str.magenta().to_string()
                } else if pr.state == PrState::Open {
                    disposition_str.green().to_string()
                } else {
                    disposition_str.red().to_string()
                };
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    disposition_colored,
                    separator,
                    age_str,
                    separator,
                    title,
                    separator,
                    pr_ref.underline()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, disposition_str, separator, age_str, separator, title, separator,
                    pr_ref
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format PRs as tab-separated values for scripting
/// Columns: disposition, number, title, author, url (no headers, no colors)
pub fn format_tsv(prs: &[PullRequest]) -> String {
    if prs.is_empty() {
        return String::new();
    }

    prs.iter()
        .map(|pr| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                disposition(pr),
                pr.number,
                pr.title,
                pr.author.login,
                pr.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
