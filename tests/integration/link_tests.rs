//! Fetching and link following against mock servers

use crate::common::{html_page, http_engine};
use htmlql::config::FetchConfig;
use htmlql::{Engine, EngineConfig, FetchOptions, QueryOptions};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serves two link chains that only agree if relative links follow the base
async fn chain_server() -> MockServer {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/index.html",
        html_page("Index", r#"<a href="sub/one.html">one</a>"#),
    )
    .await;
    mount_page(
        &server,
        "/sub/one.html",
        html_page("One", r#"<a href="two.html">two</a>"#),
    )
    .await;
    mount_page(&server, "/sub/two.html", html_page("Sub two", "")).await;
    mount_page(&server, "/two.html", html_page("Root two", "")).await;

    server
}

async fn run(engine: &Engine, query: &str) -> async_graphql::Response {
    engine.execute(query, QueryOptions::default()).await
}

fn data(response: async_graphql::Response) -> Value {
    assert!(
        response.errors.is_empty(),
        "unexpected errors: {:?}",
        response.errors
    );
    response.data.into_json().unwrap()
}

#[tokio::test]
async fn test_page_from_url() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page("Fetched", "<p>hello</p>")).await;

    let query = format!(
        r#"{{ page(url: "{}/") {{ title text(selector: "p") }} }}"#,
        server.uri()
    );
    let data = data(run(&http_engine(), &query).await);

    assert_eq!(data["page"]["title"], "Fetched");
    assert_eq!(data["page"]["text"], "hello");
}

#[tokio::test]
async fn test_url_wins_over_source() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page("From URL", "")).await;

    let query = format!(
        r#"{{ page(url: "{}/", source: "<title>From source</title>") {{ title }} }}"#,
        server.uri()
    );
    let data = data(run(&http_engine(), &query).await);

    assert_eq!(data["page"]["title"], "From URL");
}

#[tokio::test]
async fn test_failed_root_fetch_is_a_field_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let query = format!(r#"{{ page(url: "{}/") {{ title }} }}"#, server.uri());
    let response = run(&http_engine(), &query).await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("500"));
    assert_eq!(response.data.into_json().unwrap(), json!({ "page": null }));
}

#[tokio::test]
async fn test_visit_resolves_relative_href() {
    let server = chain_server().await;

    let query = format!(
        r#"{{ page(url: "{}/index.html") {{ query(selector: "a") {{ visit {{ title }} }} }} }}"#,
        server.uri()
    );
    let data = data(run(&http_engine(), &query).await);

    assert_eq!(data["page"]["query"]["visit"]["title"], "One");
}

#[tokio::test]
async fn test_visit_keeps_the_base() {
    let server = chain_server().await;

    // `two.html` is resolved against /index.html, not /sub/one.html
    let query = format!(
        r#"{{ page(url: "{}/index.html") {{
              query(selector: "a") {{
                visit {{ query(selector: "a") {{ visit {{ title }} }} }}
              }}
            }} }}"#,
        server.uri()
    );
    let data = data(run(&http_engine(), &query).await);

    assert_eq!(
        data["page"]["query"]["visit"]["query"]["visit"]["title"],
        "Root two"
    );
}

#[tokio::test]
async fn test_visit_custom_moves_the_base() {
    let server = chain_server().await;

    let query = format!(
        r#"{{ page(url: "{}/index.html") {{
              query(selector: "body") {{
                visit_custom(selector: "a") {{
                  query(selector: "body") {{ visit_custom(selector: "a") {{ title }} }}
                }}
              }}
            }} }}"#,
        server.uri()
    );
    let data = data(run(&http_engine(), &query).await);

    assert_eq!(
        data["page"]["query"]["visit_custom"]["query"]["visit_custom"]["title"],
        "Sub two"
    );
}

#[tokio::test]
async fn test_visit_custom_with_attribute() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        html_page("Start", r#"<div data-next="/target">go</div>"#),
    )
    .await;
    mount_page(&server, "/target", html_page("Target", "")).await;

    let query = format!(
        r#"{{ page(url: "{}/") {{
              query(selector: "div") {{ visit_custom(attr: "data-next") {{ title }} }}
            }} }}"#,
        server.uri()
    );
    let data = data(run(&http_engine(), &query).await);

    assert_eq!(data["page"]["query"]["visit_custom"]["title"], "Target");
}

#[tokio::test]
async fn test_visit_custom_index_uses_the_new_document() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page("Start", r#"<a href="/list">list</a>"#)).await;
    mount_page(
        &server,
        "/list",
        html_page(
            "List",
            "<section><b>x</b></section><section><b>y</b></section>",
        ),
    )
    .await;

    let query = format!(
        r#"{{ page(url: "{}/") {{
              query(selector: "body") {{
                visit_custom(selector: "a") {{
                  queryAll(selector: "b") {{ index(parent: "section") }}
                }}
              }}
            }} }}"#,
        server.uri()
    );
    let data = data(run(&http_engine(), &query).await);

    assert_eq!(
        data["page"]["query"]["visit_custom"]["queryAll"],
        json!([{ "index": 0 }, { "index": 1 }])
    );
}

#[tokio::test]
async fn test_failed_visit_does_not_affect_siblings() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        html_page(
            "Start",
            r#"<a href="/ok">ok</a><a href="/missing">missing</a>"#,
        ),
    )
    .await;
    mount_page(&server, "/ok", html_page("Fine", "")).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let query = format!(
        r#"{{ page(url: "{}/") {{ title queryAll(selector: "a") {{ text visit {{ title }} }} }} }}"#,
        server.uri()
    );
    let response = run(&http_engine(), &query).await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("404"));
    assert_eq!(
        serde_json::to_value(&response.errors[0].path).unwrap(),
        json!(["page", "queryAll", 1, "visit"])
    );

    let data = response.data.into_json().unwrap();
    assert_eq!(data["page"]["title"], "Start");
    assert_eq!(
        data["page"]["queryAll"],
        json!([
            { "text": "ok", "visit": { "title": "Fine" } },
            { "text": "missing", "visit": null },
        ])
    );
}

#[tokio::test]
async fn test_fetch_options_reach_every_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("x-api-key", "secret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("Start", r#"<a href="/next">next</a>"#)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("Next", "")))
        .expect(1)
        .mount(&server)
        .await;

    let query = format!(
        r#"{{ page(url: "{}/") {{ query(selector: "a") {{ visit {{ title }} }} }} }}"#,
        server.uri()
    );
    let options =
        QueryOptions::default().fetch_options(FetchOptions::default().header("x-api-key", "secret"));
    let response = http_engine().execute(&query, options).await;

    let data = data(response);
    assert_eq!(data["page"]["query"]["visit"]["title"], "Next");
}

#[tokio::test]
async fn test_configured_user_agent_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "TestAgent/1.0"))
        .and(header("accept-language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("Configured", "")))
        .expect(1)
        .mount(&server)
        .await;

    let mut fetch = FetchConfig::default();
    fetch.user_agent = "TestAgent/1.0".to_string();
    fetch
        .headers
        .insert("Accept-Language".to_string(), "en".to_string());
    let engine = Engine::new(EngineConfig {
        concurrency: None,
        fetch,
    })
    .unwrap();

    let query = format!(r#"{{ page(url: "{}/") {{ title }} }}"#, server.uri());
    let data = data(run(&engine, &query).await);

    assert_eq!(data["page"]["title"], "Configured");
}

#[tokio::test]
async fn test_failed_visit_keeps_its_parent() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page("Start", r#"<a href="/gone">gone</a>"#)).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    // `visit` is the only field selected on `query`
    let query = format!(
        r#"{{ page(url: "{}/") {{ query(selector: "a") {{ visit {{ title }} }} }} }}"#,
        server.uri()
    );
    let response = run(&http_engine(), &query).await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("503"));
    assert_eq!(
        serde_json::to_value(&response.errors[0].path).unwrap(),
        json!(["page", "query", "visit"])
    );
    assert_eq!(
        response.data.into_json().unwrap(),
        json!({ "page": { "query": { "visit": null } } })
    );
}
