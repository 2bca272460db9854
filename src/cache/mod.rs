// Cache module for short-lived API response memoization.
// Owns the cache table and the fetcher that reads through it.

#![allow(dead_code)]

pub mod clock;
pub mod fetcher;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use fetcher::Fetcher;
pub use store::{CacheEntry, CacheTable, DEFAULT_TTL, Fetched};
