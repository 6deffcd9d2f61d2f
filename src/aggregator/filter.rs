// Repository exclusion rules.
// Drops curated-list style repositories and forks that look starred rather than authored.

use crate::github::Repository;

/// Substrings that mark a repository as a link collection rather than a project.
pub const DEFAULT_NOISE_KEYWORDS: &[&str] = &[
    "awesome-",
    "curated",
    "list-",
    "collection of",
    "awesome list",
    "list of",
    "resources",
];

/// Case-insensitive keyword filter over repository names and descriptions.
#[derive(Debug, Clone)]
pub struct RepoFilter {
    keywords: Vec<String>,
}

impl Default for RepoFilter {
    fn default() -> Self {
        Self::new(DEFAULT_NOISE_KEYWORDS.iter().copied())
    }
}

impl RepoFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Name or description contains a noise keyword.
    pub fn is_noise(&self, repo: &Repository) -> bool {
        let name = repo.name.to_lowercase();
        let description = repo
            .description
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();

        self.keywords
            .iter()
            .any(|k| name.contains(k.as_str()) || description.contains(k.as_str()))
    }

    /// Empty public fork: most likely bookmarked, not authored.
    pub fn is_bookmarked(repo: &Repository) -> bool {
        repo.size == 0 && !repo.private && repo.fork
    }

    /// Full rule set used before enrichment.
    pub fn excludes(&self, repo: &Repository) -> bool {
        self.is_noise(repo) || Self::is_bookmarked(repo)
    }

    /// Rule set of the unauthenticated fallback path: noise keywords, and
    /// nothing empty.
    pub fn excludes_relaxed(&self, repo: &Repository) -> bool {
        self.is_noise(repo) || repo.size == 0
    }
}
