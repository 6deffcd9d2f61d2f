// Repository aggregator.
// Fetches, enriches, filters, sorts, caps, and caches an account's projects and recent commits.

pub mod enrich;
pub mod fallback;
pub mod filter;
pub mod types;

use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::cache::{self, COMMITS_TTL, KeyValueStore, PROJECTS_TTL, entry_key};
use crate::error::{FolioError, Result};
use crate::github::endpoints::MAX_PER_PAGE;
use crate::github::{Api, Repository, Transport};

pub use filter::{DEFAULT_NOISE_KEYWORDS, RepoFilter};
pub use types::{CommitLogEntry, RepositorySummary, Visibility};

/// How per-repository enrichment is paced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichMode {
    /// One repository at a time with a pause in between.
    Sequential { delay: Duration },
    /// `width` repositories concurrently, pausing between batches.
    Batched { width: usize, delay: Duration },
}

impl Default for EnrichMode {
    fn default() -> Self {
        EnrichMode::Sequential {
            delay: Duration::from_millis(120),
        }
    }
}

/// Tunables of an aggregation cycle.
#[derive(Debug, Clone)]
pub struct AggregatorOptions {
    pub projects_ttl: Duration,
    pub commits_ttl: Duration,
    /// Most repositories enriched per cycle.
    pub processing_cap: usize,
    /// Most projects returned.
    pub result_cap: usize,
    /// Most commits returned by the commit log.
    pub commit_log_limit: usize,
    pub filter: RepoFilter,
    pub enrich_mode: EnrichMode,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            projects_ttl: PROJECTS_TTL,
            commits_ttl: COMMITS_TTL,
            processing_cap: 30,
            result_cap: 15,
            commit_log_limit: 8,
            filter: RepoFilter::default(),
            enrich_mode: EnrichMode::default(),
        }
    }
}

/// Produces the projects panel and commit log for one account.
///
/// Public operations never fail: network trouble degrades to fallback data or
/// an empty list. Each data kind has its own in-flight guard so overlapping
/// callers share one fetch.
pub struct Aggregator<T, S> {
    account: String,
    authenticated: bool,
    api: Api<T>,
    store: S,
    options: AggregatorOptions,
    projects_flight: Mutex<()>,
    commits_flight: Mutex<()>,
}

impl<T: Transport, S: KeyValueStore> Aggregator<T, S> {
    /// `authenticated` selects the owned-repos endpoint, which needs the
    /// transport to carry a token.
    pub fn new(
        account: impl Into<String>,
        authenticated: bool,
        api: Api<T>,
        store: S,
        options: AggregatorOptions,
    ) -> Self {
        Self {
            account: account.into(),
            authenticated,
            api,
            store,
            options,
            projects_flight: Mutex::new(()),
            commits_flight: Mutex::new(()),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn api(&self) -> &Api<T> {
        &self.api
    }

    pub fn projects_key(&self) -> String {
        entry_key("projects", &self.account)
    }

    pub fn commits_key(&self) -> String {
        entry_key("commits", &self.account)
    }

    /// Projects, from cache when fresh unless `force_refresh`.
    pub async fn get_projects(&self, force_refresh: bool) -> Vec<RepositorySummary> {
        let _flight = self.projects_flight.lock().await;
        let key = self.projects_key();

        if !force_refresh {
            if let Some(projects) = self.cached(&key, self.options.projects_ttl) {
                return projects;
            }
        }

        match self.fetch_projects().await {
            Ok(projects) => {
                info!("fetched {} projects for {}", projects.len(), self.account);
                self.store_entry(&key, &projects);
                projects
            }
            Err(err) => {
                warn!("project listing failed ({}), using public fallback", err);
                self.fallback_projects().await
            }
        }
    }

    /// Most recent commits across the newest repositories, from cache when fresh.
    pub async fn get_recent_commits(&self, max_repos: usize, per_repo: u32) -> Vec<CommitLogEntry> {
        self.load_recent_commits(max_repos, per_repo, false).await
    }

    /// Like [`Self::get_recent_commits`] but always fetches.
    pub async fn refresh_recent_commits(
        &self,
        max_repos: usize,
        per_repo: u32,
    ) -> Vec<CommitLogEntry> {
        self.load_recent_commits(max_repos, per_repo, true).await
    }

    async fn load_recent_commits(
        &self,
        max_repos: usize,
        per_repo: u32,
        force_refresh: bool,
    ) -> Vec<CommitLogEntry> {
        let _flight = self.commits_flight.lock().await;
        let key = self.commits_key();

        if !force_refresh {
            if let Some(commits) = self.cached(&key, self.options.commits_ttl) {
                return commits;
            }
        }

        match self.fetch_recent_commits(max_repos, per_repo).await {
            Ok(commits) => {
                info!("fetched {} recent commits for {}", commits.len(), self.account);
                self.store_entry(&key, &commits);
                commits
            }
            Err(err) => {
                warn!("commit log unavailable ({}), using built-in log", err);
                fallback::fallback_commits()
            }
        }
    }

    async fn list_repos(&self) -> Result<Vec<Repository>> {
        if self.authenticated {
            self.api.get_owned_repos(MAX_PER_PAGE).await
        } else {
            self.api.get_user_repos(&self.account, MAX_PER_PAGE).await
        }
    }

    async fn fetch_projects(&self) -> Result<Vec<RepositorySummary>> {
        let repos = self.list_repos().await?;
        let candidates: Vec<&Repository> = repos
            .iter()
            .filter(|repo| !self.options.filter.excludes(repo))
            .take(self.options.processing_cap)
            .collect();
        info!(
            "{} of {} repositories pass the filter",
            candidates.len(),
            repos.len()
        );

        let enriched = self.enrich_all(&candidates).await;
        Ok(sort_and_cap(enriched, self.options.result_cap))
    }

    async fn enrich_all(&self, candidates: &[&Repository]) -> Vec<RepositorySummary> {
        let mut summaries = Vec::with_capacity(candidates.len());

        match self.options.enrich_mode {
            EnrichMode::Sequential { delay } => {
                for (i, repo) in candidates.iter().enumerate() {
                    if i > 0 {
                        sleep(delay).await;
                    }
                    if let Some(summary) = enrich::enrich(&self.api, repo).await {
                        summaries.push(summary);
                    }
                }
            }
            EnrichMode::Batched { width, delay } => {
                for (i, batch) in candidates.chunks(width.max(1)).enumerate() {
                    if i > 0 {
                        sleep(delay).await;
                    }
                    let results =
                        join_all(batch.iter().map(|repo| enrich::enrich(&self.api, repo))).await;
                    summaries.extend(results.into_iter().flatten());
                }
            }
        }

        summaries
    }

    /// Public listing only, no per-repository calls, every count set to 1.
    /// Not cached, so the next load tries the full cycle again.
    async fn fallback_projects(&self) -> Vec<RepositorySummary> {
        match self.api.get_user_repos(&self.account, MAX_PER_PAGE).await {
            Ok(repos) => {
                let summaries = repos
                    .iter()
                    .filter(|repo| !self.options.filter.excludes_relaxed(repo))
                    .map(|repo| RepositorySummary::from_repo(repo, enrich::primary_language(repo), 1))
                    .collect();
                sort_and_cap(summaries, self.options.result_cap)
            }
            Err(err) => {
                warn!("public fallback failed: {}", err);
                Vec::new()
            }
        }
    }

    async fn fetch_recent_commits(
        &self,
        max_repos: usize,
        per_repo: u32,
    ) -> Result<Vec<CommitLogEntry>> {
        let mut repos: Vec<Repository> = self
            .list_repos()
            .await?
            .into_iter()
            .filter(|repo| !repo.fork && repo.size > 0)
            .collect();
        repos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        repos.truncate(max_repos);

        if repos.is_empty() {
            return Ok(Vec::new());
        }

        let pages = join_all(
            repos
                .iter()
                .map(|repo| self.api.get_commits(&repo.full_name, per_repo)),
        )
        .await;

        let mut commits = Vec::new();
        let mut succeeded = 0;
        for (repo, page) in repos.iter().zip(pages) {
            match page {
                Ok(page) => {
                    succeeded += 1;
                    commits.extend(
                        page.items
                            .iter()
                            .filter_map(|item| CommitLogEntry::from_item(&repo.name, item)),
                    );
                }
                Err(err) => warn!("{}: commits unavailable: {}", repo.full_name, err),
            }
        }

        if succeeded == 0 {
            return Err(FolioError::Other(
                "every commit request failed".to_string(),
            ));
        }

        commits.sort_by(|a, b| b.date.cmp(&a.date));
        commits.truncate(self.options.commit_log_limit);
        Ok(commits)
    }

    fn cached<D: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<D> {
        match cache::read_if_valid(&self.store, key, ttl, Utc::now()) {
            Ok(Some(data)) => {
                info!("cache hit for {}", key);
                Some(data)
            }
            Ok(None) => None,
            Err(err) => {
                warn!("unreadable cache entry {}: {}", key, err);
                None
            }
        }
    }

    fn store_entry<D: Serialize + ?Sized>(&self, key: &str, data: &D) {
        if let Err(err) = cache::write_cached(&self.store, key, data, Utc::now()) {
            warn!("failed to cache {}: {}", key, err);
        }
    }
}

/// Most recently pushed first, ties broken by commit count; then dedupe by
/// name and keep the first `cap`.
pub fn sort_and_cap(mut projects: Vec<RepositorySummary>, cap: usize) -> Vec<RepositorySummary> {
    projects.sort_by(|a, b| {
        b.pushed_at
            .cmp(&a.pushed_at)
            .then_with(|| b.commit_count.cmp(&a.commit_count))
    });

    let mut seen = HashSet::new();
    projects.retain(|p| seen.insert(p.name.clone()));
    projects.truncate(cap);
    projects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryStore, read_cached};
    use crate::github::RetryPolicy;
    use crate::github::client::testing::FakeTransport;
    use chrono::{DateTime, TimeZone};
    use serde_json::{Value, json};

    const BASE: &str = "https://api.test";
    const PUBLIC_LIST: &str = "https://api.test/users/octo/repos";
    const OWNED_LIST: &str = "https://api.test/user/repos";

    struct RepoFixture {
        name: String,
        description: Option<&'static str>,
        private: bool,
        fork: bool,
        size: u64,
        pushed_at: String,
    }

    impl RepoFixture {
        fn new(name: impl Into<String>, pushed_at: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                description: None,
                private: false,
                fork: false,
                size: 10,
                pushed_at: pushed_at.into(),
            }
        }
    }

    fn repo_json(fixture: &RepoFixture) -> Value {
        json!({
            "id": 1,
            "name": fixture.name,
            "full_name": format!("octo/{}", fixture.name),
            "owner": { "login": "octo" },
            "private": fixture.private,
            "fork": fixture.fork,
            "description": fixture.description,
            "html_url": format!("https://github.com/octo/{}", fixture.name),
            "language": "Rust",
            "size": fixture.size,
            "stargazers_count": 2,
            "forks_count": 0,
            "created_at": "2023-01-01T00:00:00Z",
            "updated_at": fixture.pushed_at,
            "pushed_at": fixture.pushed_at
        })
    }

    fn listing(specs: &[RepoFixture]) -> String {
        Value::Array(specs.iter().map(repo_json).collect()).to_string()
    }

    fn contributors(fake: &FakeTransport, name: &str, total: u64) {
        fake.respond(
            &format!("{}/repos/octo/{}/contributors", BASE, name),
            200,
            &json!([{ "login": "octo", "contributions": total }]).to_string(),
        );
    }

    fn aggregator(
        fake: &FakeTransport,
        authenticated: bool,
    ) -> Aggregator<FakeTransport, MemoryStore> {
        Aggregator::new(
            "octo",
            authenticated,
            Api::new(fake.clone(), BASE, RetryPolicy::default()),
            MemoryStore::new(),
            AggregatorOptions::default(),
        )
    }

    fn names(projects: &[RepositorySummary]) -> Vec<&str> {
        projects.iter().map(|p| p.name.as_str()).collect()
    }

    fn summary(name: &str, pushed_at: Option<DateTime<Utc>>, commit_count: u64) -> RepositorySummary {
        RepositorySummary {
            name: name.to_string(),
            description: None,
            tech_stack: vec!["Rust".to_string()],
            visibility: Visibility::Public,
            star_count: 0,
            fork_count: 0,
            commit_count,
            updated_at: Utc::now(),
            pushed_at,
            created_at: Utc::now(),
            url: String::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_warm_cache_makes_no_network_calls() {
        let fake = FakeTransport::new();
        let agg = aggregator(&fake, false);
        let cached = vec![summary("one", None, 3), summary("two", None, 1)];
        let five_minutes_ago = Utc::now() - chrono::Duration::minutes(5);
        cache::write_cached(&agg.store, "github_projects_octo", &cached, five_minutes_ago).unwrap();

        let projects = agg.get_projects(false).await;

        assert_eq!(projects, cached);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_call_within_window_is_served_from_cache() {
        let fake = FakeTransport::new();
        fake.respond(PUBLIC_LIST, 200, &listing(&[RepoFixture::new("folio", "2024-05-01T10:00:00Z")]));
        contributors(&fake, "folio", 12);
        let agg = aggregator(&fake, false);

        let first = agg.get_projects(false).await;
        let calls_after_first = fake.calls().len();
        let second = agg.get_projects(false).await;

        assert_eq!(fake.calls().len(), calls_after_first);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first[0].commit_count, 12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_force_refresh_bypasses_cache() {
        let fake = FakeTransport::new();
        fake.respond(PUBLIC_LIST, 200, &listing(&[RepoFixture::new("folio", "2024-05-01T10:00:00Z")]));
        contributors(&fake, "folio", 12);
        let agg = aggregator(&fake, false);

        agg.get_projects(false).await;
        agg.get_projects(true).await;

        assert_eq!(fake.calls_matching(PUBLIC_LIST), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_noise_repositories_never_appear() {
        let fake = FakeTransport::new();
        let mut curated = RepoFixture::new("links", "2024-05-03T10:00:00Z");
        curated.description = Some("A curated list of crates");
        fake.respond(
            PUBLIC_LIST,
            200,
            &listing(&[
                RepoFixture::new("awesome-go", "2024-05-02T10:00:00Z"),
                curated,
                RepoFixture::new("folio", "2024-05-01T10:00:00Z"),
            ]),
        );
        contributors(&fake, "awesome-go", 500);
        contributors(&fake, "links", 500);
        contributors(&fake, "folio", 4);
        let agg = aggregator(&fake, false);

        let projects = agg.get_projects(false).await;

        assert_eq!(names(&projects), vec!["folio"]);
        assert_eq!(fake.calls_matching("awesome-go"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bookmarked_fork_is_excluded() {
        let fake = FakeTransport::new();
        let mut starred = RepoFixture::new("tokio", "2024-05-02T10:00:00Z");
        starred.fork = true;
        starred.size = 0;
        let mut worked_fork = RepoFixture::new("serde", "2024-05-01T10:00:00Z");
        worked_fork.fork = true;
        fake.respond(PUBLIC_LIST, 200, &listing(&[starred, worked_fork]));
        contributors(&fake, "tokio", 9);
        contributors(&fake, "serde", 9);
        let agg = aggregator(&fake, false);

        let projects = agg.get_projects(false).await;

        assert_eq!(names(&projects), vec!["serde"]);
        assert_eq!(projects[0].visibility, Visibility::Fork);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pagination_used_when_contributors_empty() {
        let fake = FakeTransport::new();
        fake.respond(PUBLIC_LIST, 200, &listing(&[RepoFixture::new("folio", "2024-05-01T10:00:00Z")]));
        fake.respond(&format!("{}/repos/octo/folio/contributors", BASE), 200, "[]");
        fake.respond_with_link(
            &format!("{}/repos/octo/folio/commits?per_page=1", BASE),
            200,
            "[]",
            Some("<https://api.test/repositories/1/commits?per_page=1&page=23>; rel=\"last\""),
        );
        let agg = aggregator(&fake, false);

        let projects = agg.get_projects(false).await;

        assert_eq!(projects[0].commit_count, 23);
    }

    #[tokio::test(start_paused = true)]
    async fn test_private_repo_without_commits_is_kept() {
        let fake = FakeTransport::new();
        let mut secret = RepoFixture::new("secret", "2024-05-01T10:00:00Z");
        secret.private = true;
        secret.size = 0;
        fake.respond(OWNED_LIST, 200, &listing(&[secret]));
        fake.respond(&format!("{}/repos/octo/secret/contributors", BASE), 200, "[]");
        fake.respond(&format!("{}/repos/octo/secret/commits", BASE), 200, "[]");
        let agg = aggregator(&fake, true);

        let projects = agg.get_projects(false).await;

        assert_eq!(names(&projects), vec!["secret"]);
        assert_eq!(projects[0].commit_count, 1);
        assert_eq!(projects[0].visibility, Visibility::Private);
        assert_eq!(fake.calls_matching(PUBLIC_LIST), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_enrichment_keeps_repository_with_defaults() {
        let fake = FakeTransport::new();
        fake.respond(PUBLIC_LIST, 200, &listing(&[RepoFixture::new("folio", "2024-05-01T10:00:00Z")]));
        fake.respond(&format!("{}/repos/octo/folio", BASE), 500, "boom");
        let agg = aggregator(&fake, false);

        let projects = agg.get_projects(false).await;

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].commit_count, 1);
        assert_eq!(projects[0].tech_stack, vec!["Rust"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listing_recovers_from_rate_limit() {
        let fake = FakeTransport::new();
        fake.respond(PUBLIC_LIST, 403, "{\"message\":\"API rate limit exceeded\"}")
            .respond(PUBLIC_LIST, 200, &listing(&[RepoFixture::new("folio", "2024-05-01T10:00:00Z")]));
        contributors(&fake, "folio", 2);
        let agg = aggregator(&fake, false);

        let start = tokio::time::Instant::now();
        let projects = agg.get_projects(false).await;

        assert_eq!(names(&projects), vec!["folio"]);
        assert_eq!(fake.calls_matching(PUBLIC_LIST), 2);
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_caps_forty_repositories_to_fifteen() {
        let fake = FakeTransport::new();
        let specs: Vec<RepoFixture> = (0..40)
            .map(|i| {
                RepoFixture::new(
                    format!("project-{}", i),
                    format!("2024-03-{:02}T10:00:00Z", i % 28 + 1),
                )
            })
            .collect();
        fake.respond(PUBLIC_LIST, 200, &listing(&specs));
        fake.respond(
            &format!("{}/repos/octo/", BASE),
            200,
            &json!([{ "login": "octo", "contributions": 3 }]).to_string(),
        );
        let options = AggregatorOptions {
            enrich_mode: EnrichMode::Batched {
                width: 5,
                delay: Duration::from_millis(150),
            },
            ..AggregatorOptions::default()
        };
        let agg = Aggregator::new(
            "octo",
            false,
            Api::new(fake.clone(), BASE, RetryPolicy::default()),
            MemoryStore::new(),
            options,
        );

        let projects = agg.get_projects(false).await;

        assert_eq!(projects.len(), 15);
        // Only the first 30 candidates are enriched.
        assert_eq!(fake.calls_matching("/contributors"), 30);
        assert!(projects.windows(2).all(|w| w[0].pushed_at >= w[1].pushed_at));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_to_public_listing() {
        let fake = FakeTransport::new();
        let mut empty = RepoFixture::new("empty", "2024-05-03T10:00:00Z");
        empty.size = 0;
        fake.respond(OWNED_LIST, 401, "{\"message\":\"Bad credentials\"}");
        fake.respond(
            PUBLIC_LIST,
            200,
            &listing(&[
                RepoFixture::new("older", "2024-04-01T10:00:00Z"),
                RepoFixture::new("awesome-rust", "2024-05-02T10:00:00Z"),
                empty,
                RepoFixture::new("newer", "2024-05-01T10:00:00Z"),
            ]),
        );
        let agg = aggregator(&fake, true);

        let projects = agg.get_projects(false).await;

        assert_eq!(names(&projects), vec!["newer", "older"]);
        assert!(projects.iter().all(|p| p.commit_count == 1));
        assert_eq!(fake.calls_matching("/repos/octo/"), 0);
        let cached: Option<cache::CachedData<Vec<RepositorySummary>>> =
            read_cached(&agg.store, &agg.projects_key()).unwrap();
        assert!(cached.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_total_failure_resolves_to_empty() {
        let fake = FakeTransport::new();
        fake.respond(OWNED_LIST, 500, "down");
        fake.respond(PUBLIC_LIST, 500, "down");
        let agg = aggregator(&fake, true);

        assert!(agg.get_projects(false).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_list_response_triggers_fallback() {
        let fake = FakeTransport::new();
        fake.respond(PUBLIC_LIST, 200, "{\"message\":\"weird\"}");
        let agg = aggregator(&fake, false);

        assert!(agg.get_projects(false).await.is_empty());
        // listing once, then the fallback listing once
        assert_eq!(fake.calls_matching(PUBLIC_LIST), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_fetch() {
        let fake = FakeTransport::new();
        fake.respond(PUBLIC_LIST, 200, &listing(&[
            RepoFixture::new("a", "2024-05-01T10:00:00Z"),
            RepoFixture::new("b", "2024-05-02T10:00:00Z"),
        ]));
        contributors(&fake, "a", 1);
        contributors(&fake, "b", 1);
        let agg = aggregator(&fake, false);

        let (first, second) = tokio::join!(agg.get_projects(false), agg.get_projects(false));

        assert_eq!(first, second);
        assert_eq!(fake.calls_matching(PUBLIC_LIST), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_at_ttl_boundary_is_refetched() {
        let fake = FakeTransport::new();
        fake.respond(PUBLIC_LIST, 200, &listing(&[RepoFixture::new("folio", "2024-05-01T10:00:00Z")]));
        contributors(&fake, "folio", 4);
        let agg = aggregator(&fake, false);
        let stale = vec![summary("old", None, 1)];
        let thirty_minutes_ago = Utc::now() - chrono::Duration::minutes(30);
        cache::write_cached(&agg.store, &agg.projects_key(), &stale, thirty_minutes_ago).unwrap();

        let projects = agg.get_projects(false).await;

        assert_eq!(names(&projects), vec!["folio"]);
        assert_eq!(fake.calls_matching(PUBLIC_LIST), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_enrichment_runs_in_order_with_pause() {
        let fake = FakeTransport::new();
        fake.respond(
            PUBLIC_LIST,
            200,
            &listing(&[
                RepoFixture::new("first", "2024-05-03T10:00:00Z"),
                RepoFixture::new("second", "2024-05-02T10:00:00Z"),
                RepoFixture::new("third", "2024-05-01T10:00:00Z"),
            ]),
        );
        fake.respond(&format!("{}/repos/octo/", BASE), 200, "{}");
        contributors(&fake, "first", 1);
        contributors(&fake, "second", 1);
        contributors(&fake, "third", 1);
        let agg = aggregator(&fake, false);

        agg.get_projects(false).await;

        let contributor_calls: Vec<_> = fake
            .timed_calls()
            .into_iter()
            .filter(|(url, _)| url.contains("/contributors"))
            .collect();
        let order: Vec<&str> = contributor_calls
            .iter()
            .map(|(url, _)| url.split('/').nth_back(1).unwrap_or_default())
            .collect();
        assert_eq!(order, vec!["first", "second", "third"]);
        for pair in contributor_calls.windows(2) {
            assert!(pair[1].1 - pair[0].1 >= Duration::from_millis(120));
        }
    }

    #[test]
    fn test_sort_ties_broken_by_commit_count() {
        let pushed = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).single();
        let projects = vec![
            summary("fewer", pushed, 3),
            summary("never-pushed", None, 100),
            summary("more", pushed, 9),
        ];

        let sorted = sort_and_cap(projects, 15);

        assert_eq!(names(&sorted), vec!["more", "fewer", "never-pushed"]);
    }

    #[test]
    fn test_sort_dedupes_by_name() {
        let pushed = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).single();
        let projects = vec![summary("same", pushed, 1), summary("same", pushed, 5)];

        let sorted = sort_and_cap(projects, 15);

        assert_eq!(sorted.len(), 1);
        assert_eq!(sorted[0].commit_count, 5);
    }

    fn commit_json(sha: &str, date: &str) -> Value {
        json!({
            "sha": sha,
            "html_url": format!("https://github.com/octo/x/commit/{}", sha),
            "commit": { "message": format!("commit {}", sha), "author": { "name": "Octo", "date": date } }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_recent_commits_merged_and_sorted() {
        let fake = FakeTransport::new();
        let mut forked = RepoFixture::new("forked", "2024-05-05T10:00:00Z");
        forked.fork = true;
        fake.respond(
            PUBLIC_LIST,
            200,
            &listing(&[
                forked,
                RepoFixture::new("alpha", "2024-05-04T10:00:00Z"),
                RepoFixture::new("beta", "2024-05-03T10:00:00Z"),
                RepoFixture::new("gamma", "2024-01-01T10:00:00Z"),
            ]),
        );
        fake.respond(
            &format!("{}/repos/octo/alpha/commits", BASE),
            200,
            &json!([commit_json("a2", "2024-05-04T09:00:00Z"), commit_json("a1", "2024-05-01T09:00:00Z")]).to_string(),
        );
        fake.respond(
            &format!("{}/repos/octo/beta/commits", BASE),
            200,
            &json!([commit_json("b1", "2024-05-02T09:00:00Z")]).to_string(),
        );
        let agg = aggregator(&fake, false);

        let commits = agg.get_recent_commits(2, 5).await;

        let shas: Vec<&str> = commits.iter().map(|c| c.sha.as_str()).collect();
        assert_eq!(shas, vec!["a2", "b1", "a1"]);
        assert_eq!(commits[1].repo, "beta");
        assert_eq!(fake.calls_matching("forked"), 0);
        assert_eq!(fake.calls_matching("gamma"), 0);
        assert_eq!(fake.calls_matching("per_page=5"), 2);

        let calls = fake.calls().len();
        assert_eq!(agg.get_recent_commits(2, 5).await, commits);
        assert_eq!(fake.calls().len(), calls);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recent_commits_fall_back_to_builtin_log() {
        let fake = FakeTransport::new();
        fake.respond(PUBLIC_LIST, 500, "down");
        let agg = aggregator(&fake, false);

        let commits = agg.get_recent_commits(3, 5).await;

        assert_eq!(commits, fallback::fallback_commits());
        assert!(agg.store.get(&agg.commits_key()).unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recent_commits_all_requests_failing_use_builtin_log() {
        let fake = FakeTransport::new();
        fake.respond(
            PUBLIC_LIST,
            200,
            &listing(&[
                RepoFixture::new("alpha", "2024-05-04T10:00:00Z"),
                RepoFixture::new("beta", "2024-05-03T10:00:00Z"),
            ]),
        );
        fake.respond(&format!("{}/repos/octo/", BASE), 500, "down");
        let agg = aggregator(&fake, false);

        let commits = agg.get_recent_commits(5, 3).await;

        assert_eq!(commits, fallback::fallback_commits());
        assert!(agg.store.get(&agg.commits_key()).unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recent_commits_with_no_eligible_repos_cache_empty_log() {
        let fake = FakeTransport::new();
        let mut forked = RepoFixture::new("forked", "2024-05-04T10:00:00Z");
        forked.fork = true;
        let mut empty = RepoFixture::new("empty", "2024-05-03T10:00:00Z");
        empty.size = 0;
        fake.respond(PUBLIC_LIST, 200, &listing(&[forked, empty]));
        let agg = aggregator(&fake, false);

        let commits = agg.get_recent_commits(5, 3).await;

        assert!(commits.is_empty());
        assert_eq!(fake.calls_matching("/commits"), 0);
        assert_eq!(
            agg.store.get(&agg.commits_key()).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_recent_commits_skip_failed_repositories() {
        let fake = FakeTransport::new();
        fake.respond(
            PUBLIC_LIST,
            200,
            &listing(&[
                RepoFixture::new("alpha", "2024-05-04T10:00:00Z"),
                RepoFixture::new("beta", "2024-05-03T10:00:00Z"),
            ]),
        );
        fake.respond(
            &format!("{}/repos/octo/alpha/commits", BASE),
            200,
            &json!([commit_json("a1", "2024-05-04T09:00:00Z")]).to_string(),
        );
        fake.respond(&format!("{}/repos/octo/beta/commits", BASE), 500, "down");
        let agg = aggregator(&fake, false);

        let commits = agg.get_recent_commits(5, 3).await;

        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].repo, "alpha");
        assert_eq!(fake.calls_matching("/repos/octo/beta/commits"), 3);
        assert!(agg.store.get(&agg.commits_key()).unwrap().is_some());
    }
}
