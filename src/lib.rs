//! htmlql: query HTML with GraphQL
//!
//! This crate turns a GraphQL selection over a `Document`/`Element` schema into a
//! lazily evaluated DOM traversal. Selections can follow links into other pages;
//! every network fetch made while answering one query goes through a bounded
//! fetch queue, and a per-query execution state tracks the base URL that relative
//! links are resolved against.

pub mod config;
pub mod dom;
pub mod engine;
pub mod fetch;
pub mod resolvers;
pub mod schema;
pub mod server;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for htmlql operations
#[derive(Debug, Error)]
pub enum HtmlqlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Schema error: {0}")]
    Schema(#[from] async_graphql::dynamic::SchemaError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Transport-level errors raised while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Errors surfaced by the bounded fetch queue
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Fetch queue is closed")]
    Closed,

    #[error(transparent)]
    Task(#[from] FetchError),
}

/// Errors raised by field resolvers; each one becomes a field-level error
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("You need to provide either a URL or a HTML source string.")]
    MissingSource,

    #[error("Invalid CSS selector \"{selector}\": {message}")]
    InvalidSelector { selector: String, message: String },

    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Result type alias for htmlql operations
pub type Result<T> = std::result::Result<T, HtmlqlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for resolver operations
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

// Re-export commonly used types
pub use config::Config;
pub use dom::{Document, NodeHandle};
pub use engine::{query, Engine, EngineConfig, QueryOptions};
pub use fetch::{FetchOptions, FetchQueue, HttpTransport, Transport};
pub use state::ExecutionState;
pub use url::resolve_url;
