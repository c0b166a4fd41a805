//! Fields only a `Document` exposes

use crate::dom::NodeHandle;

/// Title of the document owning `node`
pub fn title(node: &NodeHandle) -> Option<String> {
    node.document().title()
}

/// `content` of `<meta name="...">`, falling back to `<meta property="...">`
///
/// Attribute values are compared literally, so names containing quotes or
/// other selector syntax need no escaping.
pub fn meta(node: &NodeHandle, name: &str) -> Option<String> {
    node.with_element(|element| {
        let metas: Vec<_> = element
            .descendants()
            .filter_map(scraper::ElementRef::wrap)
            .filter(|candidate| candidate.value().name() == "meta")
            .collect();

        let meta = metas
            .iter()
            .find(|meta| meta.value().attr("name") == Some(name))
            .or_else(|| {
                metas
                    .iter()
                    .find(|meta| meta.value().attr("property") == Some(name))
            })?;

        meta.value().attr("content").map(str::to_string)
    })
    .flatten()
}
