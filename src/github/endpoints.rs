// GitHub API endpoint URLs.
// Builds request URLs and cache keys for the four query shapes the site uses.

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_WEB_BASE: &str = "https://github.com";

/// Endpoint builder bound to one account and the site's own repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api_base: String,
    owner: String,
    site_repo: String,
}

impl Endpoints {
    pub fn new(
        api_base: impl Into<String>,
        owner: impl Into<String>,
        site_repo: impl Into<String>,
    ) -> Self {
        let api_base: String = api_base.into();
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            owner: owner.into(),
            site_repo: site_repo.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn site_repo(&self) -> &str {
        &self.site_repo
    }

    /// `GET /users/{owner}`
    pub fn user_url(&self) -> String {
        format!("{}/users/{}", self.api_base, self.owner)
    }

    /// `GET /repos/{owner}/{repo}`
    pub fn repo_url(&self, repo: &str) -> String {
        format!("{}/repos/{}/{}", self.api_base, self.owner, repo)
    }

    /// `GET /repos/{owner}/{repo}/releases/latest`
    pub fn latest_release_url(&self, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base, self.owner, repo
        )
    }

    /// `GET /repos/{owner}/{site_repo}/commits?per_page={per_page}`
    pub fn commits_url(&self, per_page: u32) -> String {
        format!(
            "{}/repos/{}/{}/commits?per_page={}",
            self.api_base, self.owner, self.site_repo, per_page
        )
    }

    /// Browser page of a commit in the site repository.
    pub fn commit_page_url(&self, sha: &str) -> String {
        format!(
            "{}/{}/{}/commit/{}",
            GITHUB_WEB_BASE, self.owner, self.site_repo, sha
        )
    }

    /// Browser page of a repository.
    pub fn repo_page_url(&self, repo: &str) -> String {
        format!("{}/{}/{}", GITHUB_WEB_BASE, self.owner, repo)
    }
}

/// Cache key for the user profile.
pub fn user_key(owner: &str) -> String {
    format!("user:{}", owner)
}

/// Cache key for a repository's info.
pub fn repo_key(repo: &str) -> String {
    format!("repo:{}", repo)
}

/// Cache key for a repository's latest release.
pub fn release_key(repo: &str) -> String {
    format!("release:{}", repo)
}

/// Cache key for the site's commit list.
pub const COMMITS_KEY: &str = "commits";
