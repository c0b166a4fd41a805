//! Fetching module
//!
//! This module contains everything that touches the network:
//! - The transport trait and its reqwest implementation
//! - Per-query fetch options
//! - The bounded queue every fetch is admitted through

mod queue;
mod transport;

pub use queue::{default_concurrency, FetchQueue};
pub use transport::{build_http_client, FetchOptions, HttpTransport, Transport};
