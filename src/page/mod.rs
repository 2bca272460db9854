// Page module.
// Document model for the site: project cards, footer, and render regions.

#![allow(dead_code)]

pub mod document;
pub mod node;
pub mod region;

pub use document::{Card, CardMut, Document, Footer, FooterMut, StatsRegion};
pub use node::{Element, Node};
pub use region::Region;

use crate::github::Endpoints;

/// Build the initial page: one card per tracked project and a footer.
pub fn build_document(title: &str, endpoints: &Endpoints, projects: &[String]) -> Document {
    let cards = projects.iter().map(|project| {
        Card::new(project.as_str(), endpoints.repo_page_url(project)).with_badge(
            Element::new("img")
                .class("badge")
                .attr("alt", format!("{} on GitHub", project))
                .attr(
                    "src",
                    format!(
                        "https://img.shields.io/github/license/{}/{}",
                        endpoints.owner(),
                        project
                    ),
                ),
        )
    });

    let footer = Footer::new(vec![
        Element::new("span")
            .class("footer-owner")
            .text(format!("\u{a9} {}", endpoints.owner()))
            .into(),
    ]);

    cards
        .fold(Document::new(title), Document::with_card)
        .with_footer(footer)
}
