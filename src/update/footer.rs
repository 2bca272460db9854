// Footer commit updater.
// Shows how long ago the site repository last changed, linking the commit.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::{Clock, Fetcher, SystemClock};
use crate::github::Transport;
use crate::page::{Document, Element, Node};
use crate::stats::CommitSummary;

/// Updates the "last commit" line of the footer.
pub struct FooterUpdater<T, C = SystemClock> {
    fetcher: Arc<Fetcher<T, C>>,
}

impl<T: Transport, C: Clock> FooterUpdater<T, C> {
    pub fn new(fetcher: Arc<Fetcher<T, C>>) -> Self {
        Self { fetcher }
    }

    /// Refresh the footer from the most recent site commit.
    ///
    /// Leaves the footer untouched when no commit can be fetched.
    pub async fn update_footer(&self, document: &Mutex<Document>) {
        let commits = self.fetcher.get_commits().await;
        let Some(latest) = commits
            .as_ref()
            .and_then(|commits| commits.first())
            .and_then(CommitSummary::from_commit)
        else {
            debug!("no commit available, footer left as is");
            return;
        };

        let label = time_ago(self.fetcher.now(), latest.author_date);
        let url = self.fetcher.endpoints().commit_page_url(&latest.sha);

        let mut document = document.lock().await;
        let Some(mut footer) = document.footer_mut() else {
            debug!("page has no footer");
            return;
        };
        footer.replace_last_commit(commit_line(&label, &latest, &url));

        info!(sha = latest.short_sha(), label = %label, "footer commit updated");
    }
}

/// Coarse relative time between `then` and `now`.
///
/// Timestamps in the future count as "just now".
pub fn time_ago(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(then).num_seconds().max(0);

    match seconds {
        s if s < 60 => "just now".to_string(),
        s if s < 60 * 60 => format!("{} minutes ago", s / 60),
        s if s < 24 * 60 * 60 => format!("{} hours ago", s / (60 * 60)),
        s => format!("{} days ago", s / (24 * 60 * 60)),
    }
}

fn commit_line(label: &str, commit: &CommitSummary, url: &str) -> Vec<Node> {
    vec![
        Node::text(format!("Last commit: {} (", label)),
        Element::new("a")
            .attr("href", url)
            .attr("target", "_blank")
            .attr("rel", "noopener noreferrer")
            .text(commit.short_sha())
            .into(),
        Node::text(")"),
    ]
}
