// Aggregated output types.
// These are what the projects panel and commit log render, and what gets cached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::github::{CommitItem, Repository};

/// How a repository is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Fork,
}

impl Visibility {
    /// Private takes precedence over fork.
    pub fn of(repo: &Repository) -> Self {
        if repo.private {
            Visibility::Private
        } else if repo.fork {
            Visibility::Fork
        } else {
            Visibility::Public
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Fork => "fork",
        }
    }
}

/// One entry of the projects panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySummary {
    pub name: String,
    pub description: Option<String>,
    /// Up to four languages, largest first.
    pub tech_stack: Vec<String>,
    pub visibility: Visibility,
    pub star_count: u64,
    pub fork_count: u64,
    /// Best-effort estimate.
    pub commit_count: u64,
    pub updated_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub url: String,
}

impl RepositorySummary {
    pub fn from_repo(repo: &Repository, tech_stack: Vec<String>, commit_count: u64) -> Self {
        Self {
            name: repo.name.clone(),
            description: repo.description.clone(),
            tech_stack,
            visibility: Visibility::of(repo),
            star_count: repo.stargazers_count,
            fork_count: repo.forks_count,
            commit_count,
            updated_at: repo.updated_at,
            pushed_at: repo.pushed_at,
            created_at: repo.created_at,
            url: repo.html_url.clone(),
        }
    }
}

/// One line of the recent-commits log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitLogEntry {
    pub repo: String,
    /// Abbreviated to seven characters.
    pub sha: String,
    /// First line of the commit message.
    pub message: String,
    pub author: String,
    pub date: DateTime<Utc>,
    pub url: String,
}

impl CommitLogEntry {
    /// Commits without an author date cannot be ordered and are skipped.
    pub fn from_item(repo: &str, item: &CommitItem) -> Option<Self> {
        let author = item.commit.author.as_ref()?;
        let date = author.date?;

        Some(Self {
            repo: repo.to_string(),
            sha: item.sha.chars().take(7).collect(),
            message: item
                .commit
                .message
                .lines()
                .next()
                .unwrap_or_default()
                .to_string(),
            author: author.name.clone().unwrap_or_else(|| "unknown".to_string()),
            date,
            url: item.html_url.clone(),
        })
    }
}
