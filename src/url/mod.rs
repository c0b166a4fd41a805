//! URL handling module for htmlql
//!
//! Links found in a page are resolved against the base URL of the query's
//! current document before they are fetched.

mod resolve;

pub use resolve::{is_absolute, resolve_url};
