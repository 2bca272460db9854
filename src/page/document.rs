// Page document model.
// Project cards plus a footer, with mutable access limited to render regions.

use super::node::{Element, Node, escape};
use super::region::Region;

const STATS_CLASS: &str = "repo-stats";
const RELEASE_CLASS: &str = "release-info";
const LAST_COMMIT_CLASS: &str = "last-commit";

/// Stats region of a card, with an optional release sub-region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsRegion {
    fields: Region,
    release: Option<Region>,
}

impl StatsRegion {
    fn new() -> Self {
        Self {
            fields: Region::new("div", STATS_CLASS),
            release: None,
        }
    }

    pub fn fields(&self) -> &Region {
        &self.fields
    }

    pub fn release(&self) -> Option<&Region> {
        self.release.as_ref()
    }

    fn write_html(&self, out: &mut String) {
        self.fields.write_html_with(out, |out| {
            if let Some(release) = &self.release {
                release.write_html(out);
            }
        });
    }
}

/// One project card: a title, a GitHub link, and a badges region.
///
/// The stats region is created on first update and always rendered right
/// after the badges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    title: String,
    href: String,
    badges: Vec<Node>,
    stats: Option<StatsRegion>,
}

impl Card {
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            badges: Vec::new(),
            stats: None,
        }
    }

    pub fn with_badge(mut self, badge: impl Into<Node>) -> Self {
        self.badges.push(badge.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn stats(&self) -> Option<&StatsRegion> {
        self.stats.as_ref()
    }

    /// Whether this card's link references `project`.
    pub fn links_to(&self, project: &str) -> bool {
        self.href.contains(project)
    }

    fn write_html(&self, out: &mut String) {
        out.push_str("<article class=\"project-card\">");
        Element::new("h3")
            .class("project-title")
            .text(self.title.as_str())
            .write_html(out);
        Element::new("a")
            .class("project-link")
            .attr("href", self.href.as_str())
            .attr("target", "_blank")
            .attr("rel", "noopener noreferrer")
            .text("GitHub")
            .write_html(out);
        out.push_str("<div class=\"project-badges\">");
        for badge in &self.badges {
            badge.write_html(out);
        }
        out.push_str("</div>");
        if let Some(stats) = &self.stats {
            stats.write_html(out);
        }
        out.push_str("</article>");
    }
}

/// Site footer with an optional "last commit" line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    content: Vec<Node>,
    last_commit: Option<Region>,
}

impl Footer {
    pub fn new(content: Vec<Node>) -> Self {
        Self {
            content,
            last_commit: None,
        }
    }

    pub fn last_commit(&self) -> Option<&Region> {
        self.last_commit.as_ref()
    }

    fn write_html(&self, out: &mut String) {
        out.push_str("<footer class=\"site-footer\">");
        for node in &self.content {
            node.write_html(out);
        }
        if let Some(line) = &self.last_commit {
            line.write_html(out);
        }
        out.push_str("</footer>");
    }
}

/// The page the updaters decorate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    title: String,
    cards: Vec<Card>,
    footer: Option<Footer>,
    mutations: u64,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_card(mut self, card: Card) -> Self {
        self.cards.push(card);
        self
    }

    pub fn with_footer(mut self, footer: Footer) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// First card whose link references `project`.
    pub fn card_for_project(&self, project: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.links_to(project))
    }

    pub fn card_for_project_mut(&mut self, project: &str) -> Option<CardMut<'_>> {
        let card = self.cards.iter_mut().find(|card| card.links_to(project))?;
        Some(CardMut {
            card,
            mutations: &mut self.mutations,
        })
    }

    pub fn footer(&self) -> Option<&Footer> {
        self.footer.as_ref()
    }

    pub fn footer_mut(&mut self) -> Option<FooterMut<'_>> {
        let footer = self.footer.as_mut()?;
        Some(FooterMut {
            footer,
            mutations: &mut self.mutations,
        })
    }

    /// Number of region writes applied so far.
    pub fn mutations(&self) -> u64 {
        self.mutations
    }

    /// Serialize the full page.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str(&format!("<title>{}</title>\n", escape(&self.title)));
        out.push_str("</head>\n<body>\n<main class=\"projects\">\n");
        for card in &self.cards {
            card.write_html(&mut out);
            out.push('\n');
        }
        out.push_str("</main>\n");
        if let Some(footer) = &self.footer {
            footer.write_html(&mut out);
            out.push('\n');
        }
        out.push_str("</body>\n</html>\n");
        out
    }
}

/// Write access to one card's regions.
pub struct CardMut<'a> {
    card: &'a mut Card,
    mutations: &'a mut u64,
}

impl CardMut<'_> {
    /// Create the stats region if needed and replace its fields.
    pub fn replace_stats(&mut self, content: Vec<Node>) {
        self.card
            .stats
            .get_or_insert_with(StatsRegion::new)
            .fields
            .replace(content);
        *self.mutations += 1;
    }

    /// Create the release sub-region if needed and replace its content.
    pub fn replace_release(&mut self, content: Vec<Node>) {
        self.card
            .stats
            .get_or_insert_with(StatsRegion::new)
            .release
            .get_or_insert_with(|| Region::new("div", RELEASE_CLASS))
            .replace(content);
        *self.mutations += 1;
    }
}

/// Write access to the footer's regions.
pub struct FooterMut<'a> {
    footer: &'a mut Footer,
    mutations: &'a mut u64,
}

impl FooterMut<'_> {
    /// Create the last-commit line if needed and replace its content.
    pub fn replace_last_commit(&mut self, content: Vec<Node>) {
        self.footer
            .last_commit
            .get_or_insert_with(|| Region::new("p", LAST_COMMIT_CLASS))
            .replace(content);
        *self.mutations += 1;
    }
}
