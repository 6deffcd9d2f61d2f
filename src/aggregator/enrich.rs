// Per-repository enrichment.
// Resolves commit counts and tech stacks through fallback chains; failures degrade to defaults.

use tracing::debug;

use crate::github::endpoints::MAX_PER_PAGE;
use crate::github::pagination::last_page;
use crate::github::{Api, Repository, Transport};

use super::types::RepositorySummary;

/// Most languages shown per repository.
pub const MAX_TECH_STACK: usize = 4;

/// Placeholder when no language is known.
pub const UNKNOWN_LANGUAGE: &str = "Code";

/// Enrich a repository, or `None` when it has no detectable commits and is
/// not private.
pub async fn enrich<T: Transport>(api: &Api<T>, repo: &Repository) -> Option<RepositorySummary> {
    let commit_count = commit_count(api, repo).await;
    if commit_count == 0 && !repo.private {
        debug!("{}: no commits, skipping", repo.full_name);
        return None;
    }

    let tech_stack = tech_stack(api, repo).await;
    Some(RepositorySummary::from_repo(repo, tech_stack, commit_count))
}

/// Commit count, first conclusive answer wins:
/// contributor totals, then the last page of a one-per-page commit listing,
/// then the length of a full commit page, then a default.
pub async fn commit_count<T: Transport>(api: &Api<T>, repo: &Repository) -> u64 {
    match api.get_contributors(&repo.full_name).await {
        Ok(contributors) => {
            let total: u64 = contributors.iter().map(|c| c.contributions).sum();
            if total > 0 {
                return total;
            }
            debug!("{}: contributors reported no commits", repo.full_name);
        }
        Err(err) => debug!("{}: contributors unavailable: {}", repo.full_name, err),
    }

    match api.get_commits(&repo.full_name, 1).await {
        Ok(page) => {
            if let Some(count) = page.link.as_deref().and_then(last_page).filter(|n| *n > 0) {
                return count;
            }
        }
        Err(err) => debug!("{}: commit pagination unavailable: {}", repo.full_name, err),
    }

    match api.get_commits(&repo.full_name, MAX_PER_PAGE).await {
        Ok(page) if !page.items.is_empty() => return page.items.len() as u64,
        Ok(_) => {}
        Err(err) => debug!("{}: commit listing unavailable: {}", repo.full_name, err),
    }

    default_commit_count(repo)
}

/// Count assumed when nothing conclusive came back.
pub fn default_commit_count(repo: &Repository) -> u64 {
    if repo.private || repo.size > 0 { 1 } else { 0 }
}

/// Top languages by byte volume, else the primary language.
pub async fn tech_stack<T: Transport>(api: &Api<T>, repo: &Repository) -> Vec<String> {
    match api.get_languages(&repo.full_name).await {
        Ok(languages) if !languages.is_empty() => {
            return languages.keys().take(MAX_TECH_STACK).cloned().collect();
        }
        Ok(_) => {}
        Err(err) => debug!("{}: languages unavailable: {}", repo.full_name, err),
    }

    primary_language(repo)
}

/// The reported primary language, or the placeholder.
pub fn primary_language(repo: &Repository) -> Vec<String> {
    let language = repo
        .language
        .as_deref()
        .filter(|l| !l.trim().is_empty())
        .unwrap_or(UNKNOWN_LANGUAGE);
    vec![language.to_string()]
}
