//! HTTP surface
//!
//! `GET /graphql` serves the GraphiQL console, `POST /graphql` executes a
//! standard GraphQL JSON request, `GET /health` answers `ok`.

use crate::engine::{Engine, QueryOptions};
use async_graphql::http::GraphiQLSource;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;

const GRAPHQL_PATH: &str = "/graphql";

/// Builds the router serving the given engine
pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route(GRAPHQL_PATH, get(graphiql).post(graphql))
        .route("/health", get(health))
        .with_state(engine)
}

/// Serves requests on `listener` until the process is stopped
pub async fn serve(listener: TcpListener, engine: Arc<Engine>) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("htmlql listening on http://{}{}", addr, GRAPHQL_PATH);
    }

    axum::serve(listener, router(engine)).await
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

async fn graphql(
    State(engine): State<Arc<Engine>>,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    tracing::debug!(
        "POST {} (operation: {})",
        GRAPHQL_PATH,
        request.operation_name.as_deref().unwrap_or("<anonymous>")
    );

    Json(engine.execute_request(request, QueryOptions::default()).await)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
