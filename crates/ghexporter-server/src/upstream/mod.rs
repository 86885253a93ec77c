//! Upstream API access: shared client, concurrent fetcher, repository lister
//! and quota probe.

pub mod client;
pub mod fetcher;
pub mod lister;
pub mod rate;

pub use client::UpstreamClient;
pub use fetcher::{fetch_all, Response};
