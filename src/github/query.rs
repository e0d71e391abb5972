use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Caller-supplied constraint limiting listings to open, closed, or all
/// pull requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl StateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateFilter::All => "all",
            StateFilter::Open => "open",
            StateFilter::Closed => "closed",
        }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StateFilter::All),
            "open" => Ok(StateFilter::Open),
            "closed" => Ok(StateFilter::Closed),
            other => Err(format!(
                "invalid state filter '{}' (expected all, open, or closed)",
                other
            )),
        }
    }
}

fn push_repo_clause(query: &mut String, repo: Option<&str>) {
    if let Some(repo) = repo {
        query.push_str(" repo:");
        query.push_str(repo);
    }
}

/// Build the three count-only queries used for stats aggregation:
/// open, closed-without-merging, and merged, in that order.
pub fn stats_queries(username: &str, repo: Option<&str>) -> [String; 3] {
    let mut open = format!("is:pr is:open author:{}", username);
    let mut closed = format!("is:pr is:closed is:unmerged author:{}", username);
    let mut merged = format!("is:pr is:merged author:{}", username);
    push_repo_clause(&mut open, repo);
    push_repo_clause(&mut closed, repo);
    push_repo_clause(&mut merged, repo);
    [open, closed, merged]
}

/// Build the listing query. The state clause is omitted for `All` so the
/// search spans both open and closed pull requests.
pub fn list_query(username: &str, repo: Option<&str>, state: StateFilter) -> String {
    let mut query = format!("is:pr author:{}", username);
    push_repo_clause(&mut query, repo);
    match state {
        StateFilter::All => {}
        StateFilter::Open => query.push_str(" is:open"),
        StateFilter::Closed => query.push_str(" is:closed"),
    }
    query
}
