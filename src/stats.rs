// Display projections of GitHub responses.
// Recomputed on every update cycle and discarded after rendering.

use chrono::{DateTime, Utc};

use crate::github::{Commit, Release, Repository, User};

/// Length of an abbreviated commit hash.
pub const SHORT_SHA_LEN: usize = 7;

/// Card statistics for one repository.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectStat {
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub language: Option<String>,
    pub last_updated: DateTime<Utc>,
    pub size_mb: f64,
}

impl From<&Repository> for ProjectStat {
    fn from(repo: &Repository) -> Self {
        Self {
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            open_issues: repo.open_issues_count,
            language: repo.language.clone(),
            last_updated: repo.updated_at,
            size_mb: (repo.size as f64 / 1024.0 * 100.0).round() / 100.0,
        }
    }
}

/// Latest release of a repository.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseInfo {
    pub tag_name: String,
    pub published: Option<DateTime<Utc>>,
}

impl From<&Release> for ReleaseInfo {
    fn from(release: &Release) -> Self {
        Self {
            tag_name: release.tag_name.clone(),
            published: release.published_at,
        }
    }
}

/// Most recent commit of the site repository.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitSummary {
    pub sha: String,
    pub author_date: DateTime<Utc>,
}

impl CommitSummary {
    /// Summarize a commit; `None` when the commit carries no author date.
    pub fn from_commit(commit: &Commit) -> Option<Self> {
        let author = commit.commit.author.as_ref()?;
        Some(Self {
            sha: commit.sha.clone(),
            author_date: author.date,
        })
    }

    /// Abbreviated hash, as shown by git.
    pub fn short_sha(&self) -> &str {
        match self.sha.char_indices().nth(SHORT_SHA_LEN) {
            Some((idx, _)) => &self.sha[..idx],
            None => &self.sha,
        }
    }
}

/// Public profile counters for the site owner.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub login: String,
    pub name: Option<String>,
    pub public_repos: u64,
    pub followers: u64,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            login: user.login.clone(),
            name: user.name.clone(),
            public_repos: user.public_repos,
            followers: user.followers,
        }
    }
}

/// Date format used for every date shown on cards.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}
