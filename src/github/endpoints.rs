// GitHub API endpoint functions.
// Provides typed methods for the repository, contributor, commit, and language endpoints.

use crate::error::Result;

use super::client::{Api, Transport};
use super::types::{CommitItem, Contributor, Languages, Page, Repository};

/// Largest page size the API accepts.
pub const MAX_PER_PAGE: u32 = 100;

impl<T: Transport> Api<T> {
    /// Repositories owned by the authenticated user, including private ones.
    pub async fn get_owned_repos(&self, per_page: u32) -> Result<Vec<Repository>> {
        let params = [
            ("affiliation", "owner".to_string()),
            ("sort", "updated".to_string()),
            ("per_page", per_page.to_string()),
        ];
        self.get_json("/user/repos", &params).await
    }

    /// Public repositories of a user.
    pub async fn get_user_repos(&self, user: &str, per_page: u32) -> Result<Vec<Repository>> {
        let params = [
            ("sort", "updated".to_string()),
            ("per_page", per_page.to_string()),
        ];
        self.get_json(&format!("/users/{}/repos", user), &params)
            .await
    }

    /// Contributors of a repository with their commit counts.
    pub async fn get_contributors(&self, full_name: &str) -> Result<Vec<Contributor>> {
        let params = [("per_page", MAX_PER_PAGE.to_string())];
        self.get_json(&format!("/repos/{}/contributors", full_name), &params)
            .await
    }

    /// One page of commits, newest first, with the pagination header.
    pub async fn get_commits(&self, full_name: &str, per_page: u32) -> Result<Page<CommitItem>> {
        let params = [("per_page", per_page.to_string())];
        self.get_page(&format!("/repos/{}/commits", full_name), &params)
            .await
    }

    /// Language byte counts of a repository.
    pub async fn get_languages(&self, full_name: &str) -> Result<Languages> {
        self.get_json(&format!("/repos/{}/languages", full_name), &[])
            .await
    }
}
