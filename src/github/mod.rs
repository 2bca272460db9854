// GitHub API module.
// Provides the HTTP transport, endpoint URLs, and response types for the REST API.

#![allow(dead_code)]

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{GitHubClient, Transport};
pub use endpoints::Endpoints;
pub use types::*;
