#![cfg(test)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use tokio::sync::Semaphore;

use crate::cache::Clock;
use crate::error::{RepoCardsError, Result};
use crate::github::{Endpoints, Transport};

pub fn test_endpoints() -> Endpoints {
    Endpoints::new("https://api.test", "octo", "octo.github.io")
}

pub fn repo_url(name: &str) -> String {
    test_endpoints().repo_url(name)
}

pub fn release_url(name: &str) -> String {
    test_endpoints().latest_release_url(name)
}

pub fn commits_url() -> String {
    test_endpoints().commits_url(1)
}

pub fn repo_json(name: &str, stars: u64, forks: u64, issues: u64) -> Value {
    json!({
        "name": name,
        "full_name": format!("octo/{name}"),
        "stargazers_count": stars,
        "forks_count": forks,
        "open_issues_count": issues,
        "language": "Rust",
        "size": 2048,
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

pub fn release_json(tag: &str) -> Value {
    json!({"tag_name": tag, "published_at": "2024-01-01T00:00:00Z"})
}

pub fn commits_json(sha: &str, date: DateTime<Utc>) -> Value {
    json!([{
        "sha": sha,
        "commit": {"author": {"name": "octo", "date": date.to_rfc3339()}, "message": "update"}
    }])
}

#[derive(Debug, Clone)]
enum Canned {
    Ok(Value),
    Fail,
}

/// Transport answering from a table of canned responses.
///
/// Unknown URLs fail with `NotFound`.
#[derive(Clone, Default)]
pub struct FakeTransport {
    responses: Arc<Mutex<HashMap<String, Canned>>>,
    calls: Arc<Mutex<HashMap<String, usize>>>,
    panics: Arc<Mutex<HashSet<String>>>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose requests block until `gate` has permits.
    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn respond(&self, url: &str, value: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Canned::Ok(value));
    }

    pub fn fail(&self, url: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Canned::Fail);
    }

    /// Panic on the next request for `url`; later requests answer normally.
    pub fn panic_once(&self, url: &str) {
        self.panics.lock().unwrap().insert(url.to_string());
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

impl Transport for FakeTransport {
    async fn get_json(&self, url: &str) -> Result<Value> {
        if let Some(gate) = &self.gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| RepoCardsError::Other(e.to_string()))?;
        }

        *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
        let should_panic = self.panics.lock().unwrap().remove(url);
        if should_panic {
            panic!("transport failure injected for {url}");
        }
        let canned = self.responses.lock().unwrap().get(url).cloned();
        match canned {
            Some(Canned::Ok(value)) => Ok(value),
            Some(Canned::Fail) => Err(RepoCardsError::Status {
                status: 500,
                body: "server error".to_string(),
            }),
            None => Err(RepoCardsError::NotFound(url.to_string())),
        }
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        *self.now.lock().unwrap() += chrono::Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
