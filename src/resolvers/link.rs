//! Link-following resolvers
//!
//! Both resolvers turn an attribute of the current element into an absolute
//! URL, fetch it through the query's fetch queue and parse the result.
//! `visit` only peeks into the linked page; `visit_custom` also moves the
//! query's base URL and current document to the new page, so that later
//! ancestor-index lookups run against it.

use crate::dom::{Document, NodeHandle};
use crate::resolvers::scope;
use crate::state::ExecutionState;
use crate::url::resolve_url;
use crate::ResolveResult;
use std::sync::Arc;

/// Follows the element's `href`
///
/// # Returns
///
/// * `Ok(Some(root))` - Root of the fetched document
/// * `Ok(None)` - The element has no `href`
/// * `Err(_)` - The fetch failed
pub async fn visit(node: &NodeHandle, state: &ExecutionState) -> ResolveResult<Option<NodeHandle>> {
    let Some(reference) = node.attr("href") else {
        return Ok(None);
    };

    let url = resolve_link(&reference, state);
    let document = fetch_document(&url, state).await?;

    Ok(Some(document.root()))
}

/// Follows attribute `attr` (default `href`) of the element matching `selector`
///
/// After a successful fetch the fetched URL becomes the query's base and the
/// new document becomes its current document.
pub async fn visit_custom(
    node: &NodeHandle,
    selector: Option<&str>,
    attr: Option<&str>,
    state: &ExecutionState,
) -> ResolveResult<Option<NodeHandle>> {
    let Some(target) = scope(node, selector)? else {
        return Ok(None);
    };
    let Some(reference) = target.attr(attr.unwrap_or("href")) else {
        return Ok(None);
    };

    let url = resolve_link(&reference, state);
    let document = fetch_document(&url, state).await?;

    state.set_base(url);
    state.set_document(document.clone());

    Ok(Some(document.root()))
}

/// Resolves a link against the current base, recording the result as the
/// query's current URL; with no base the reference is used as is
fn resolve_link(reference: &str, state: &ExecutionState) -> String {
    let base = state.base();
    if base.is_empty() {
        return reference.to_string();
    }

    let url = resolve_url(&base, reference);
    state.set_url(url.clone());
    url
}

/// Fetches `url` through the query's queue and parses the body
pub(crate) async fn fetch_document(url: &str, state: &ExecutionState) -> ResolveResult<Arc<Document>> {
    tracing::debug!("Queueing fetch of {}", url);

    let body = state
        .queue()
        .add(|| state.transport().fetch(url, state.fetch_options()))
        .await?;

    Ok(Document::parse(&body, Some(url.to_string())))
}
