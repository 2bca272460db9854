// Presentation updaters.
// Render fetched GitHub data into the page's cards and footer.

pub mod cards;
pub mod footer;

pub use cards::CardUpdater;
pub use footer::{FooterUpdater, time_ago};
