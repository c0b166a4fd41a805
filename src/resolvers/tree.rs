//! Tree-navigation resolvers
//!
//! Pure, synchronous functions over a tree position. The only one that reads
//! execution state is [`index`] with a `parent` selector.

use crate::dom::NodeHandle;
use crate::resolvers::{parse_selector, scope};
use crate::state::ExecutionState;
use crate::ResolveResult;

/// Inner HTML of the (re-scoped) element
pub fn content(node: &NodeHandle, selector: Option<&str>) -> ResolveResult<Option<String>> {
    Ok(scope(node, selector)?.and_then(|target| target.inner_html()))
}

/// Outer HTML of the (re-scoped) element
pub fn html(node: &NodeHandle, selector: Option<&str>) -> ResolveResult<Option<String>> {
    Ok(scope(node, selector)?.and_then(|target| target.outer_html()))
}

/// Text content of the (re-scoped) position, optionally trimmed
pub fn text(node: &NodeHandle, selector: Option<&str>, trim: bool) -> ResolveResult<Option<String>> {
    let text = scope(node, selector)?.and_then(|target| target.text_content());

    Ok(match text {
        Some(text) if trim => Some(text.trim().to_string()),
        text => text,
    })
}

/// Rows of `td` texts for every `tr` below the (re-scoped) element
///
/// Cell texts are trimmed; rows without `td` cells (header rows) are dropped.
pub fn table(node: &NodeHandle, selector: Option<&str>) -> ResolveResult<Option<Vec<Vec<String>>>> {
    let Some(target) = scope(node, selector)? else {
        return Ok(None);
    };

    let row_selector = parse_selector("tr")?;
    let cell_selector = parse_selector("td")?;

    let rows = target
        .select_all(&row_selector)
        .iter()
        .map(|row| {
            row.select_all(&cell_selector)
                .iter()
                .map(|cell| cell.text_content().unwrap_or_default().trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect();

    Ok(Some(rows))
}

/// Upper-cased tag name; `None` for text nodes
pub fn tag(node: &NodeHandle, selector: Option<&str>) -> ResolveResult<Option<String>> {
    Ok(scope(node, selector)?.and_then(|target| target.tag_name()))
}

/// Value of attribute `name`
pub fn attr(node: &NodeHandle, selector: Option<&str>, name: &str) -> ResolveResult<Option<String>> {
    Ok(scope(node, selector)?.and_then(|target| target.attr(name)))
}

/// Value of the `href` attribute
pub fn href(node: &NodeHandle, selector: Option<&str>) -> ResolveResult<Option<String>> {
    attr(node, selector, "href")
}

/// Value of the `src` attribute
pub fn src(node: &NodeHandle, selector: Option<&str>) -> ResolveResult<Option<String>> {
    attr(node, selector, "src")
}

/// Value of the `class` attribute
pub fn class(node: &NodeHandle, selector: Option<&str>) -> ResolveResult<Option<String>> {
    attr(node, selector, "class")
}

/// The `class` attribute split on whitespace
pub fn class_list(node: &NodeHandle, selector: Option<&str>) -> ResolveResult<Option<Vec<String>>> {
    Ok(class(node, selector)?
        .map(|classes| classes.split_whitespace().map(str::to_string).collect()))
}

/// Whether any descendant matches `selector`
pub fn has(node: &NodeHandle, selector: &str) -> ResolveResult<bool> {
    Ok(node.select_first(&parse_selector(selector)?).is_some())
}

/// Number of descendants matching `selector`; zero when no selector is given
pub fn count(node: &NodeHandle, selector: Option<&str>) -> ResolveResult<usize> {
    match selector.filter(|s| !s.is_empty()) {
        Some(selector) => Ok(node.select_all(&parse_selector(selector)?).len()),
        None => Ok(0),
    }
}

/// First descendant matching `selector`
pub fn query(node: &NodeHandle, selector: &str) -> ResolveResult<Option<NodeHandle>> {
    Ok(node.select_first(&parse_selector(selector)?))
}

/// Every descendant matching `selector`, in document order
pub fn query_all(node: &NodeHandle, selector: &str) -> ResolveResult<Vec<NodeHandle>> {
    Ok(node.select_all(&parse_selector(selector)?))
}

pub fn children(node: &NodeHandle) -> Vec<NodeHandle> {
    node.children()
}

pub fn child_nodes(node: &NodeHandle) -> Vec<NodeHandle> {
    node.child_nodes()
}

pub fn parent(node: &NodeHandle) -> Option<NodeHandle> {
    node.parent_element()
}

/// The parent's child elements including `node`, or just `node` at the root
pub fn siblings(node: &NodeHandle) -> Vec<NodeHandle> {
    match node.parent_element() {
        Some(parent) => parent.children(),
        None => vec![node.clone()],
    }
}

/// Next sibling node; may be a text node
pub fn next(node: &NodeHandle) -> Option<NodeHandle> {
    node.next_sibling()
}

/// Every following sibling node, nearest first
pub fn next_all(node: &NodeHandle) -> Vec<NodeHandle> {
    std::iter::successors(node.next_sibling(), NodeHandle::next_sibling).collect()
}

/// Previous sibling node; may be a text node
pub fn previous(node: &NodeHandle) -> Option<NodeHandle> {
    node.previous_sibling()
}

/// Every preceding sibling node, in document order
pub fn previous_all(node: &NodeHandle) -> Vec<NodeHandle> {
    let mut siblings: Vec<_> =
        std::iter::successors(node.previous_sibling(), NodeHandle::previous_sibling).collect();
    siblings.reverse();
    siblings
}

/// Ordinal of `node` in its parent, or of its enclosing `parent` match
///
/// Without `parent`, returns the position among the parent element's child
/// nodes (text nodes count). With `parent`, every element of the state's
/// current document matching the selector is a candidate, and the result is
/// the ordinal of the first candidate that is an ancestor of `node`. Both modes
/// return -1 when nothing matches.
pub fn index(node: &NodeHandle, parent: Option<&str>, state: &ExecutionState) -> ResolveResult<i64> {
    let Some(parent) = parent.filter(|p| !p.is_empty()) else {
        return Ok(node.index_in_parent().map_or(-1, |i| i as i64));
    };

    let selector = parse_selector(parent)?;
    let Some(document) = state.document() else {
        return Ok(-1);
    };

    let candidates = document.root().select_all(&selector);
    let ancestors: Vec<_> = node.ancestors().collect();

    Ok(candidates
        .iter()
        .position(|candidate| ancestors.iter().any(|a| a.same_position(candidate)))
        .map_or(-1, |i| i as i64))
}
