// Repository card updater.
// Fetches stats and latest release per project and renders them into cards.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::{Clock, Fetcher, SystemClock};
use crate::github::Transport;
use crate::page::{Document, Element, Node};
use crate::stats::{ProjectStat, ReleaseInfo, format_date};

/// Updates the stats region of every tracked project's card.
pub struct CardUpdater<T, C = SystemClock> {
    fetcher: Arc<Fetcher<T, C>>,
}

impl<T: Transport, C: Clock> CardUpdater<T, C> {
    pub fn new(fetcher: Arc<Fetcher<T, C>>) -> Self {
        Self { fetcher }
    }

    /// Refresh all cards.
    ///
    /// Projects are fetched concurrently; results are applied in the order
    /// of `projects` once every fetch has finished.
    pub async fn update_all(&self, document: &Mutex<Document>, projects: &[String]) {
        let mut fetches = Vec::with_capacity(projects.len());
        for name in projects {
            fetches.push(self.fetch_project(name));
        }
        let results = join_all(fetches).await;

        let mut document = document.lock().await;
        let mut updated = 0;
        for (name, stats, release) in &results {
            if apply_project(&mut document, name, stats.as_ref(), release.as_ref()) {
                updated += 1;
            }
        }

        info!(updated, tracked = projects.len(), "repository cards updated");
    }

    /// Stats and release for one project, fetched concurrently.
    ///
    /// A missing release never affects the stats.
    async fn fetch_project<'a>(
        &self,
        name: &'a str,
    ) -> (&'a str, Option<ProjectStat>, Option<ReleaseInfo>) {
        let (stats, release) = tokio::join!(
            self.fetcher.get_repo_stats(name),
            self.fetcher.get_latest_release(name)
        );
        let release = release
            .into_option()
            .map(|release| ReleaseInfo::from(&release));
        (name, stats.into_option(), release)
    }
}

/// Render one project's data into its card. Returns whether the card changed.
///
/// A project without a card, or without stats, leaves the document untouched.
pub fn apply_project(
    document: &mut Document,
    project: &str,
    stats: Option<&ProjectStat>,
    release: Option<&ReleaseInfo>,
) -> bool {
    let Some(mut card) = document.card_for_project_mut(project) else {
        debug!(project, "no card links to project");
        return false;
    };
    let Some(stats) = stats else {
        debug!(project, "no stats available, card left as is");
        return false;
    };

    card.replace_stats(stats_content(stats));
    if let Some(release) = release {
        card.replace_release(release_content(release));
    }
    true
}

fn stat(kind: &str, title: &str, value: String) -> Node {
    Element::new("span")
        .class(format!("stat stat-{}", kind))
        .attr("title", title)
        .text(value)
        .into()
}

/// Stars, forks, open issues, last update; always in that order.
fn stats_content(stats: &ProjectStat) -> Vec<Node> {
    vec![
        stat("stars", "Stars", stats.stars.to_string()),
        stat("forks", "Forks", stats.forks.to_string()),
        stat("issues", "Open issues", stats.open_issues.to_string()),
        stat("updated", "Last updated", format_date(&stats.last_updated)),
    ]
}

fn release_content(release: &ReleaseInfo) -> Vec<Node> {
    let mut content = vec![
        Element::new("span")
            .class("release-tag")
            .text(release.tag_name.as_str())
            .into(),
    ];
    if let Some(published) = &release.published {
        content.push(
            Element::new("span")
                .class("release-date")
                .text(format_date(published))
                .into(),
        );
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Card, Footer};
    use crate::test_utils::{
        FakeTransport, ManualClock, release_json, release_url, repo_json, repo_url,
        test_endpoints,
    };
    use std::time::Duration;

    fn document() -> Document {
        Document::new("Projects")
            .with_card(Card::new("A", "https://github.com/octo/A"))
            .with_card(Card::new("B", "https://github.com/octo/B"))
            .with_footer(Footer::new(Vec::new()))
    }

    fn updater(transport: FakeTransport) -> CardUpdater<FakeTransport, ManualClock> {
        let fetcher = Fetcher::with_clock(
            transport,
            test_endpoints(),
            Duration::from_secs(300),
            ManualClock::new(),
        );
        CardUpdater::new(Arc::new(fetcher))
    }

    /// Text of the stat span with the given class inside a card's stats region.
    fn stat_text(document: &Document, project: &str, class: &str) -> Option<String> {
        let stats = document.card_for_project(project)?.stats()?;
        stats.fields().content().iter().find_map(|node| match node {
            Node::Element(element)
                if element
                    .get_attr("class")
                    .is_some_and(|c| c.split(' ').any(|part| part == class)) =>
            {
                Some(element.text_content())
            }
            _ => None,
        })
    }

    fn projects(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[tokio::test]
    async fn test_scenario_one_project_fails_cold() {
        let transport = FakeTransport::new();
        transport.respond(&repo_url("A"), repo_json("A", 10, 2, 1));
        transport.respond(&release_url("A"), release_json("v1.0"));
        transport.fail(&repo_url("B"));
        let updater = updater(transport);
        let document = Mutex::new(document());

        updater.update_all(&document, &projects(&["A", "B"])).await;

        let document = document.lock().await;
        assert_eq!(stat_text(&document, "A", "stat-stars").as_deref(), Some("10"));
        assert_eq!(stat_text(&document, "A", "stat-forks").as_deref(), Some("2"));
        assert_eq!(stat_text(&document, "A", "stat-issues").as_deref(), Some("1"));
        assert_eq!(
            stat_text(&document, "A", "stat-updated").as_deref(),
            Some("2024-01-01")
        );
        let release = document
            .card_for_project("A")
            .and_then(|card| card.stats())
            .and_then(|stats| stats.release())
            .unwrap();
        assert_eq!(release.text_content(), "v1.02024-01-01");

        assert!(document.card_for_project("B").unwrap().stats().is_none());
    }

    #[tokio::test]
    async fn test_update_twice_is_idempotent() {
        let transport = FakeTransport::new();
        transport.respond(&repo_url("A"), repo_json("A", 10, 2, 1));
        transport.respond(&release_url("A"), release_json("v1.0"));
        transport.respond(&repo_url("B"), repo_json("B", 5, 0, 0));
        let updater = updater(transport);
        let document = Mutex::new(document());
        let tracked = projects(&["A", "B"]);

        updater.update_all(&document, &tracked).await;
        let first = document.lock().await.to_html();
        updater.update_all(&document, &tracked).await;
        let second = document.lock().await.to_html();

        assert_eq!(first, second);
        assert_eq!(second.matches("repo-stats").count(), 2);
        assert_eq!(second.matches("release-info").count(), 1);
    }

    #[tokio::test]
    async fn test_missing_release_is_not_an_error() {
        let transport = FakeTransport::new();
        transport.respond(&repo_url("B"), repo_json("B", 5, 0, 0));
        let updater = updater(transport);
        let document = Mutex::new(document());

        updater.update_all(&document, &projects(&["B"])).await;

        let document = document.lock().await;
        let stats = document.card_for_project("B").unwrap().stats().unwrap();
        assert!(stats.release().is_none());
        assert_eq!(stat_text(&document, "B", "stat-stars").as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn test_project_without_card_is_skipped() {
        let transport = FakeTransport::new();
        transport.respond(&repo_url("ghost"), repo_json("ghost", 1, 1, 1));
        let updater = updater(transport.clone());
        let document = Mutex::new(document());

        updater.update_all(&document, &projects(&["ghost"])).await;

        assert_eq!(document.lock().await.mutations(), 0);
        assert_eq!(transport.calls(&repo_url("ghost")), 1);
    }

    #[test]
    fn test_apply_project_without_card_makes_no_mutations() {
        let mut doc = document();
        let before = doc.clone();

        let stats = ProjectStat {
            stars: 1,
            forks: 1,
            open_issues: 1,
            language: None,
            last_updated: chrono::Utc::now(),
            size_mb: 0.0,
        };

        assert!(!apply_project(&mut doc, "missing", Some(&stats), None));
        assert_eq!(doc.mutations(), 0);
        assert_eq!(doc, before);
    }

    #[tokio::test]
    async fn test_stale_stats_still_rendered() {
        let transport = FakeTransport::new();
        transport.respond(&repo_url("A"), repo_json("A", 10, 2, 1));
        let clock = ManualClock::new();
        let fetcher = Arc::new(Fetcher::with_clock(
            transport.clone(),
            test_endpoints(),
            Duration::from_secs(300),
            clock.clone(),
        ));
        let updater = CardUpdater::new(Arc::clone(&fetcher));
        let document = Mutex::new(document());
        let tracked = projects(&["A"]);
        updater.update_all(&document, &tracked).await;

        transport.fail(&repo_url("A"));
        clock.advance_secs(60 * 60);
        updater.update_all(&document, &tracked).await;

        assert_eq!(transport.calls(&repo_url("A")), 2);

        let document = document.lock().await;
        assert_eq!(stat_text(&document, "A", "stat-stars").as_deref(), Some("10"));
    }
}
