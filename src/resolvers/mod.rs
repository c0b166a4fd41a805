//! Field resolvers
//!
//! Each resolver takes the current tree position, its typed arguments and, when
//! it needs them, the query's [`ExecutionState`](crate::state::ExecutionState):
//! - `tree`: synchronous selection, extraction and navigation
//! - `document`: fields only a `Document` exposes (`title`, `meta`)
//! - `link`: asynchronous link following (`visit`, `visit_custom`)
//! - `root`: the `page` entry point
//!
//! Absence (no match, no attribute) is `Ok(None)`, never an error.

pub mod document;
pub mod link;
pub mod root;
pub mod tree;

use crate::dom::NodeHandle;
use crate::{ResolveError, ResolveResult};
use scraper::Selector;

/// Parses a CSS selector, turning syntax errors into a field error
pub fn parse_selector(selector: &str) -> ResolveResult<Selector> {
    Selector::parse(selector).map_err(|e| ResolveError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Re-roots an operation at the first descendant matching `selector`
///
/// A missing or empty selector keeps the current position.
///
/// # Returns
///
/// * `Ok(Some(node))` - The position to operate on
/// * `Ok(None)` - The selector matched nothing
/// * `Err(ResolveError::InvalidSelector)` - The selector does not parse
pub fn scope(node: &NodeHandle, selector: Option<&str>) -> ResolveResult<Option<NodeHandle>> {
    match selector.filter(|s| !s.is_empty()) {
        Some(selector) => Ok(node.select_first(&parse_selector(selector)?)),
        None => Ok(Some(node.clone())),
    }
}
