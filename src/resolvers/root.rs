//! The `page` entry point

use crate::dom::{Document, NodeHandle};
use crate::resolvers::link::fetch_document;
use crate::state::ExecutionState;
use crate::{ResolveError, ResolveResult};

/// Bootstraps the execution state for one query and returns its root position
///
/// With a `url`, the page is fetched through the query's queue and the URL
/// becomes both the base and the current URL. With only a `source`, the base
/// is cleared so relative links stay unresolved. Either way the parsed
/// document becomes the state's current document.
///
/// # Returns
///
/// * `Ok(root)` - The document element of the parsed page
/// * `Err(ResolveError::MissingSource)` - Neither argument was given
/// * `Err(ResolveError::Queue)` - The fetch failed
pub async fn page(
    url: Option<&str>,
    source: Option<&str>,
    state: &ExecutionState,
) -> ResolveResult<NodeHandle> {
    let url = url.filter(|u| !u.is_empty());
    let source = source.filter(|s| !s.is_empty());

    let document = match (url, source) {
        (Some(url), _) => {
            let document = fetch_document(url, state).await?;
            state.set_base(url);
            state.set_url(url);
            document
        }
        (None, Some(source)) => {
            state.set_base("");
            Document::parse(source, None)
        }
        (None, None) => return Err(ResolveError::MissingSource),
    };

    state.set_document(document.clone());

    Ok(document.root())
}
