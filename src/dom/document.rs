use crate::dom::NodeHandle;
use ego_tree::NodeId;
use parking_lot::Mutex;
use scraper::{Html, Selector};
use std::sync::Arc;

/// One parsed HTML source
///
/// Documents are immutable once parsed and are shared through `Arc` by every
/// tree position that points into them. The parsed tree is `Send` but not
/// `Sync`, so access to it is serialized.
#[derive(Debug)]
pub struct Document {
    /// Parsed tree
    html: Mutex<Html>,

    /// Id of the document element (`<html>`)
    root: NodeId,

    /// URL the source was fetched from, `None` for inline sources
    url: Option<String>,
}

impl Document {
    /// Parses `source` permissively; malformed markup still yields a tree
    ///
    /// # Arguments
    ///
    /// * `source` - The raw HTML
    /// * `url` - Where the source came from, if it was fetched
    pub fn parse(source: &str, url: Option<String>) -> Arc<Self> {
        let html = Html::parse_document(source);
        tracing::debug!(
            "Parsed document from {} ({} bytes, {} parse errors)",
            url.as_deref().unwrap_or("inline source"),
            source.len(),
            html.errors.len()
        );

        Arc::new(Self {
            root: html.root_element().id(),
            html: Mutex::new(html),
            url,
        })
    }

    /// Runs `f` with the parsed tree locked
    pub fn with_html<R>(&self, f: impl FnOnce(&Html) -> R) -> R {
        f(&self.html.lock())
    }

    /// Returns the URL this document was fetched from
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the document element (`<html>`)
    pub fn root(self: &Arc<Self>) -> NodeHandle {
        NodeHandle::new(self.clone(), self.root)
    }

    /// Returns the text of the first `<title>` element with whitespace collapsed
    pub fn title(&self) -> Option<String> {
        let title_selector = Selector::parse("title").ok()?;

        self.with_html(|html| {
            html.select(&title_selector).next().map(|element| {
                element
                    .text()
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
        })
    }
}
