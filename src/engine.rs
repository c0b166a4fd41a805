//! Programmatic entry point
//!
//! An [`Engine`] owns the executable schema and the transport. Both are built
//! once; every query executed through the engine gets its own
//! [`ExecutionState`] and [`FetchQueue`], so concurrency limits and base-URL
//! tracking never leak between queries.

use crate::config::{Config, FetchConfig};
use crate::fetch::{default_concurrency, FetchOptions, FetchQueue, HttpTransport, Transport};
use crate::schema::build_schema;
use crate::state::ExecutionState;
use crate::HtmlqlError;
use async_graphql::dynamic::Schema;
use async_graphql::{Request, Response};
use std::sync::Arc;
use std::time::Instant;

/// Settings an [`Engine`] is built from
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Default fetch concurrency per query; `None` uses the machine default
    pub concurrency: Option<usize>,

    /// HTTP client settings and default request headers
    pub fetch: FetchConfig,
}

impl From<&Config> for EngineConfig {
    fn from(config: &Config) -> Self {
        Self {
            concurrency: Some(config.queue.effective_concurrency()),
            fetch: config.fetch.clone(),
        }
    }
}

/// Per-query overrides
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Maximum number of fetches in flight for this query
    pub concurrency: Option<usize>,

    /// Transport options for this query; headers are merged over the
    /// configured defaults
    pub fetch_options: Option<FetchOptions>,
}

impl QueryOptions {
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    pub fn fetch_options(mut self, fetch_options: FetchOptions) -> Self {
        self.fetch_options = Some(fetch_options);
        self
    }
}

/// Executes queries against the HTML schema
#[derive(Clone)]
pub struct Engine {
    schema: Schema,
    transport: Arc<dyn Transport>,
    concurrency: usize,
    fetch_options: FetchOptions,
}

impl Engine {
    /// Builds an engine that fetches over HTTP
    pub fn new(config: EngineConfig) -> Result<Self, HtmlqlError> {
        let transport = HttpTransport::new(&config.fetch)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Builds an engine that fetches through the given transport
    pub fn with_transport(
        config: EngineConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, HtmlqlError> {
        let schema = build_schema()?;

        Ok(Self {
            schema,
            transport,
            concurrency: config.concurrency.unwrap_or_else(default_concurrency),
            fetch_options: config.fetch.fetch_options(),
        })
    }

    /// Default fetch concurrency applied when a query does not override it
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the schema in SDL form
    pub fn sdl(&self) -> String {
        self.schema.sdl()
    }

    /// Executes a query document
    ///
    /// Field failures never abort the query: the response carries whatever
    /// data could be resolved together with one error per failed field.
    pub async fn execute(&self, query: &str, options: QueryOptions) -> Response {
        self.execute_request(Request::new(query), options).await
    }

    /// Executes a full request (query, variables and operation name)
    pub async fn execute_request(&self, request: Request, options: QueryOptions) -> Response {
        let concurrency = options.concurrency.unwrap_or(self.concurrency);
        let fetch_options = self.merge_fetch_options(options.fetch_options);

        let queue = Arc::new(FetchQueue::new(concurrency));
        let state = ExecutionState::new(queue.clone(), self.transport.clone(), fetch_options);

        let started = Instant::now();
        let response = self.schema.execute(request.data(state)).await;
        queue.close();

        tracing::info!(
            "Query completed in {}ms: {} fetches (peak {} in flight), {} errors",
            started.elapsed().as_millis(),
            queue.completed(),
            queue.high_water_mark(),
            response.errors.len()
        );

        response
    }

    fn merge_fetch_options(&self, overrides: Option<FetchOptions>) -> FetchOptions {
        let Some(overrides) = overrides else {
            return self.fetch_options.clone();
        };

        let mut merged = self.fetch_options.clone();
        merged.headers.extend(overrides.headers);
        merged.timeout_secs = overrides
            .timeout_secs
            .or(merged.timeout_secs)
            .map(|secs| secs.max(1));
        merged
    }
}

/// Executes one query with a default engine
///
/// # Example
///
/// ```no_run
/// # async fn run() -> htmlql::Result<()> {
/// let response = htmlql::query(
///     r#"{ page(source: "<title>hi</title>") { title } }"#,
///     htmlql::QueryOptions::default(),
/// )
/// .await?;
/// assert!(response.errors.is_empty());
/// # Ok(())
/// # }
/// ```
pub async fn query(text: &str, options: QueryOptions) -> Result<Response, HtmlqlError> {
    let engine = Engine::new(EngineConfig::default())?;
    Ok(engine.execute(text, options).await)
}
