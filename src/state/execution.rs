use crate::dom::Document;
use crate::fetch::{FetchOptions, FetchQueue, Transport};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Locations the resolvers of one query read and overwrite as they traverse
#[derive(Debug, Default, Clone)]
struct Locations {
    /// Base URL relative links are resolved against; empty for inline sources
    base: String,

    /// Last absolute URL a link resolver resolved or fetched
    url: Option<String>,

    /// Document that ancestor-index lookups search
    document: Option<Arc<Document>>,
}

/// Per-query mutable context shared by every resolver invocation of that query
///
/// One instance is created for each top-level query and dropped when the query
/// completes; it is never shared between queries. Writes made by one resolver
/// are visible to every resolver that runs after it in the same query. Sibling
/// branches that write concurrently race, and the last write wins.
pub struct ExecutionState {
    locations: RwLock<Locations>,
    queue: Arc<FetchQueue>,
    transport: Arc<dyn Transport>,
    fetch_options: FetchOptions,
}

impl ExecutionState {
    /// Creates the state for one query
    ///
    /// # Arguments
    ///
    /// * `queue` - Queue all of this query's fetches are admitted through
    /// * `transport` - Transport that performs the fetches
    /// * `fetch_options` - Options applied to every fetch of this query
    pub fn new(
        queue: Arc<FetchQueue>,
        transport: Arc<dyn Transport>,
        fetch_options: FetchOptions,
    ) -> Self {
        Self {
            locations: RwLock::new(Locations::default()),
            queue,
            transport,
            fetch_options,
        }
    }

    /// Returns the current base URL (empty when the root was an inline source)
    pub fn base(&self) -> String {
        self.locations.read().base.clone()
    }

    /// Sets the base URL; callers only pass URLs that were successfully fetched
    pub fn set_base(&self, base: impl Into<String>) {
        self.locations.write().base = base.into();
    }

    /// Returns the last resolved absolute URL
    pub fn url(&self) -> Option<String> {
        self.locations.read().url.clone()
    }

    /// Records the last resolved absolute URL
    pub fn set_url(&self, url: impl Into<String>) {
        self.locations.write().url = Some(url.into());
    }

    /// Returns the document ancestor-index lookups operate on
    pub fn document(&self) -> Option<Arc<Document>> {
        self.locations.read().document.clone()
    }

    /// Replaces the document ancestor-index lookups operate on
    pub fn set_document(&self, document: Arc<Document>) {
        self.locations.write().document = Some(document);
    }

    /// Returns the fetch queue of this query
    pub fn queue(&self) -> &Arc<FetchQueue> {
        &self.queue
    }

    /// Returns the transport fetches are made with
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Returns the options applied to every fetch of this query
    pub fn fetch_options(&self) -> &FetchOptions {
        &self.fetch_options
    }
}

impl fmt::Debug for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let locations = self.locations.read();
        f.debug_struct("ExecutionState")
            .field("base", &locations.base)
            .field("url", &locations.url)
            .field(
                "document",
                &locations.document.as_ref().map(|doc| doc.url().map(str::to_string)),
            )
            .field("queue", &self.queue)
            .field("fetch_options", &self.fetch_options)
            .finish()
    }
}
