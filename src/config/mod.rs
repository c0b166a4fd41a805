//! Configuration module for htmlql
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing values fall back to defaults.
//!
//! # Example
//!
//! ```no_run
//! use htmlql::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("htmlql.toml")).unwrap();
//! println!("Fetch concurrency: {}", config.queue.effective_concurrency());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetchConfig, QueueConfig, ServerConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
