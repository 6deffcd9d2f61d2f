// Static commit log shown when the API cannot be reached at all.

use chrono::DateTime;

use super::types::CommitLogEntry;

/// (repo, sha, message, unix seconds)
const FALLBACK_COMMITS: &[(&str, &str, &str, i64)] = &[
    ("portfolio", "a1b2c3d", "Refine terminal window animations", 1_717_236_000),
    ("portfolio", "e4f5a6b", "Add projects panel with live GitHub data", 1_717_149_600),
    ("portfolio", "c7d8e9f", "Cache repository data in local storage", 1_717_063_200),
    ("portfolio", "0a1b2c3", "Wire contact form to email relay", 1_716_976_800),
    ("portfolio", "d4e5f6a", "Initial commit", 1_716_890_400),
];

/// The built-in commit log, newest first.
pub fn fallback_commits() -> Vec<CommitLogEntry> {
    FALLBACK_COMMITS
        .iter()
        .filter_map(|&(repo, sha, message, secs)| {
            Some(CommitLogEntry {
                repo: repo.to_string(),
                sha: sha.to_string(),
                message: message.to_string(),
                author: "portfolio".to_string(),
                date: DateTime::from_timestamp(secs, 0)?,
                url: String::new(),
            })
        })
        .collect()
}
