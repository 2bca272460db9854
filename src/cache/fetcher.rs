// Read-through fetcher over the response cache.
// Serves fresh entries without network access and falls back to the last
// good value when a live request fails.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::github::endpoints::{self, COMMITS_KEY};
use crate::github::{Commit, Endpoints, Release, Repository, Transport, User};
use crate::stats::{ProjectStat, UserProfile};

use super::clock::{Clock, SystemClock};
use super::store::{CacheEntry, CacheTable, Fetched};

/// Page size of the commit list query.
const COMMITS_PER_PAGE: u32 = 1;

/// Fetcher owning the process-wide cache table.
pub struct Fetcher<T, C = SystemClock> {
    transport: T,
    clock: C,
    ttl: Duration,
    endpoints: Endpoints,
    table: CacheTable,
}

impl<T: Transport> Fetcher<T, SystemClock> {
    pub fn new(transport: T, endpoints: Endpoints, ttl: Duration) -> Self {
        Self::with_clock(transport, endpoints, ttl, SystemClock)
    }
}

impl<T: Transport, C: Clock> Fetcher<T, C> {
    pub fn with_clock(transport: T, endpoints: Endpoints, ttl: Duration, clock: C) -> Self {
        Self {
            transport,
            clock,
            ttl,
            endpoints,
            table: CacheTable::new(),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Current time according to the fetcher's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Entry currently stored under `cache_key`, fresh or not.
    pub fn cached(&self, cache_key: &str) -> Option<CacheEntry> {
        self.table.get(cache_key)
    }

    /// Fetch `url`, memoized under `cache_key`.
    ///
    /// Never fails: errors are logged and turned into `Stale` or
    /// `Unavailable`.
    pub async fn fetch(&self, url: &str, cache_key: &str) -> Fetched<Value> {
        if let Some(entry) = self.table.get(cache_key) {
            if entry.is_fresh(self.clock.now(), self.ttl) {
                debug!(key = cache_key, "cache hit");
                return Fetched::Cached(entry.data);
            }
        }

        match self.transport.get_json(url).await {
            Ok(data) => {
                debug!(key = cache_key, url, "fetched");
                self.table
                    .insert(cache_key, CacheEntry::new(data.clone(), self.clock.now()));
                Fetched::Live(data)
            }
            Err(err) => match self.table.get(cache_key) {
                Some(entry) => {
                    warn!(key = cache_key, error = %err, "fetch failed, serving cached data");
                    Fetched::Stale(entry.data)
                }
                None => {
                    warn!(key = cache_key, error = %err, "fetch failed, nothing cached");
                    Fetched::Unavailable
                }
            },
        }
    }

    /// Fetch and decode into a typed response.
    async fn fetch_as<D: DeserializeOwned>(&self, url: &str, cache_key: &str) -> Fetched<D> {
        self.fetch(url, cache_key)
            .await
            .and_then(|value| match serde_json::from_value(value) {
                Ok(decoded) => Some(decoded),
                Err(err) => {
                    warn!(key = cache_key, error = %err, "unexpected response shape");
                    None
                }
            })
    }

    /// Public profile of the configured owner.
    pub async fn get_user(&self) -> Fetched<User> {
        let owner = self.endpoints.owner();
        self.fetch_as(&self.endpoints.user_url(), &endpoints::user_key(owner))
            .await
    }

    /// Profile counters of the configured owner.
    pub async fn get_user_profile(&self) -> Fetched<UserProfile> {
        self.get_user().await.map(|user| UserProfile::from(&user))
    }

    /// Repository info for one of the owner's repositories.
    pub async fn get_repository(&self, name: &str) -> Fetched<Repository> {
        self.fetch_as(&self.endpoints.repo_url(name), &endpoints::repo_key(name))
            .await
    }

    /// Latest published release; `Unavailable` when the repository has none.
    pub async fn get_latest_release(&self, name: &str) -> Fetched<Release> {
        self.fetch_as(
            &self.endpoints.latest_release_url(name),
            &endpoints::release_key(name),
        )
        .await
    }

    /// Card statistics projected from the repository info.
    pub async fn get_repo_stats(&self, name: &str) -> Fetched<ProjectStat> {
        self.get_repository(name)
            .await
            .map(|repo| ProjectStat::from(&repo))
    }

    /// Most recent commits of the site repository.
    pub async fn get_commits(&self) -> Fetched<Vec<Commit>> {
        self.fetch_as(&self.endpoints.commits_url(COMMITS_PER_PAGE), COMMITS_KEY)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeTransport, ManualClock, repo_json, test_endpoints};
    use serde_json::json;

    const REPO_URL: &str = "https://api.test/repos/octo/cards";

    fn fetcher(transport: FakeTransport, clock: ManualClock) -> Fetcher<FakeTransport, ManualClock> {
        Fetcher::with_clock(transport, test_endpoints(), Duration::from_secs(300), clock)
    }

    #[tokio::test]
    async fn test_cache_hit_within_ttl_skips_network() {
        let transport = FakeTransport::new();
        transport.respond(REPO_URL, json!({"v": 1}));
        let clock = ManualClock::new();
        let fetcher = fetcher(transport.clone(), clock.clone());

        assert_eq!(fetcher.fetch(REPO_URL, "repo:cards").await, Fetched::Live(json!({"v": 1})));

        transport.respond(REPO_URL, json!({"v": 2}));
        clock.advance_secs(4 * 60 + 59);

        assert_eq!(fetcher.fetch(REPO_URL, "repo:cards").await, Fetched::Cached(json!({"v": 1})));
        assert_eq!(transport.calls(REPO_URL), 1);
    }

    #[tokio::test]
    async fn test_cache_expiry_refetches_and_updates_timestamp() {
        let transport = FakeTransport::new();
        transport.respond(REPO_URL, json!({"v": 1}));
        let clock = ManualClock::new();
        let fetcher = fetcher(transport.clone(), clock.clone());
        fetcher.fetch(REPO_URL, "repo:cards").await;

        transport.respond(REPO_URL, json!({"v": 2}));
        clock.advance_secs(5 * 60 + 1);

        assert_eq!(fetcher.fetch(REPO_URL, "repo:cards").await, Fetched::Live(json!({"v": 2})));
        assert_eq!(transport.calls(REPO_URL), 2);
        assert_eq!(fetcher.cached("repo:cards").unwrap().fetched_at, clock.now());
    }

    #[tokio::test]
    async fn test_failure_serves_stale_entry() {
        let transport = FakeTransport::new();
        transport.respond(REPO_URL, json!({"v": 1}));
        let clock = ManualClock::new();
        let fetcher = fetcher(transport.clone(), clock.clone());
        fetcher.fetch(REPO_URL, "repo:cards").await;
        let first = fetcher.cached("repo:cards").unwrap();

        transport.fail(REPO_URL);
        clock.advance_secs(60 * 60);

        assert_eq!(fetcher.fetch(REPO_URL, "repo:cards").await, Fetched::Stale(json!({"v": 1})));
        assert_eq!(fetcher.cached("repo:cards").unwrap(), first);
    }

    #[tokio::test]
    async fn test_cold_failure_is_unavailable() {
        let transport = FakeTransport::new();
        transport.fail(REPO_URL);
        let fetcher = fetcher(transport.clone(), ManualClock::new());

        assert_eq!(fetcher.fetch(REPO_URL, "repo:cards").await, Fetched::Unavailable);
        assert!(fetcher.cached("repo:cards").is_none());
    }

    #[tokio::test]
    async fn test_key_groups_requests_independent_of_url() {
        let transport = FakeTransport::new();
        transport.respond("https://api.test/a", json!("a"));
        transport.respond("https://api.test/b", json!("b"));
        let fetcher = fetcher(transport.clone(), ManualClock::new());

        fetcher.fetch("https://api.test/a", "shared").await;
        let second = fetcher.fetch("https://api.test/b", "shared").await;

        assert_eq!(second, Fetched::Cached(json!("a")));
        assert_eq!(transport.calls("https://api.test/b"), 0);
    }

    #[tokio::test]
    async fn test_repo_stats_projection() {
        let transport = FakeTransport::new();
        transport.respond(REPO_URL, repo_json("cards", 10, 2, 1));
        let fetcher = fetcher(transport, ManualClock::new());

        let stats = fetcher.get_repo_stats("cards").await.into_option().unwrap();
        assert_eq!((stats.stars, stats.forks, stats.open_issues), (10, 2, 1));
    }

    #[tokio::test]
    async fn test_repo_stats_unavailable_when_fetch_fails() {
        let transport = FakeTransport::new();
        transport.fail(REPO_URL);
        let fetcher = fetcher(transport, ManualClock::new());

        assert_eq!(fetcher.get_repo_stats("cards").await, Fetched::Unavailable);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_unavailable() {
        let transport = FakeTransport::new();
        transport.respond(REPO_URL, json!({"unexpected": true}));
        let fetcher = fetcher(transport, ManualClock::new());

        assert!(!fetcher.get_repository("cards").await.is_available());
        // The raw document is still cached under its key.
        assert!(fetcher.cached("repo:cards").is_some());
    }

    #[tokio::test]
    async fn test_commits_and_profile_queries() {
        let transport = FakeTransport::new();
        transport.respond(
            "https://api.test/repos/octo/octo.github.io/commits?per_page=1",
            json!([{"sha": "abc", "commit": {"author": {"date": "2024-01-01T00:00:00Z"}}}]),
        );
        transport.respond(
            "https://api.test/users/octo",
            json!({"login": "octo", "public_repos": 7, "followers": 3}),
        );
        let fetcher = fetcher(transport, ManualClock::new());

        let commits = fetcher.get_commits().await.into_option().unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].sha, "abc");

        let profile = fetcher.get_user_profile().await.into_option().unwrap();
        assert_eq!(profile.public_repos, 7);
        assert_eq!(profile.followers, 3);
    }
}
