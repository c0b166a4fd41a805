//! Tree navigation over inline source documents

use crate::common::{page_on_source, run_on_source};
use serde_json::json;

const PAGE: &str = r#"<html><head><title>some title</title></head><body><div class="selectme"><strong>bad</strong>bare text<span>bap</span></div></body></html>"#;

#[tokio::test]
async fn test_title_from_source() {
    let page = page_on_source(PAGE, "title").await;
    assert_eq!(page["title"], "some title");
}

#[tokio::test]
async fn test_title_collapses_whitespace() {
    let page = page_on_source("<title>\n  Two   words \n</title>", "title").await;
    assert_eq!(page["title"], "Two words");
}

#[tokio::test]
async fn test_page_without_arguments_is_a_field_error() {
    let response = htmlql::query("{ page { title } }", htmlql::QueryOptions::default())
        .await
        .unwrap();

    assert_eq!(response.errors.len(), 1);
    assert_eq!(
        response.errors[0].message,
        "You need to provide either a URL or a HTML source string."
    );
    assert_eq!(
        serde_json::to_value(&response.errors[0].path).unwrap(),
        json!(["page"])
    );
    assert_eq!(response.data.into_json().unwrap(), json!({ "page": null }));
}

#[tokio::test]
async fn test_empty_source_counts_as_missing() {
    let response = run_on_source("", "title").await;
    assert_eq!(response.errors.len(), 1);
}

#[tokio::test]
async fn test_content_html_and_text() {
    let page = page_on_source(
        PAGE,
        r#"content(selector: ".selectme")
           html(selector: "span")
           text(selector: ".selectme")"#,
    )
    .await;

    assert_eq!(page["content"], "<strong>bad</strong>bare text<span>bap</span>");
    assert_eq!(page["html"], "<span>bap</span>");
    assert_eq!(page["text"], "badbare textbap");
}

#[tokio::test]
async fn test_text_trim() {
    let source = "<p>\n   padded   </p>";
    let page = page_on_source(
        source,
        r#"raw: text(selector: "p")
           trimmed: text(selector: "p", trim: true)"#,
    )
    .await;

    assert_eq!(page["raw"], "\n   padded   ");
    assert_eq!(page["trimmed"], "padded");
}

#[tokio::test]
async fn test_missing_selector_target_is_null() {
    let page = page_on_source(
        PAGE,
        r#"text(selector: "table") tag(selector: "table") query(selector: "table") { tag }"#,
    )
    .await;

    assert_eq!(page["text"], json!(null));
    assert_eq!(page["tag"], json!(null));
    assert_eq!(page["query"], json!(null));
}

#[tokio::test]
async fn test_tag_and_attributes() {
    let source = r#"<a id="home" href="/start" class=" nav  main "><img src="logo.png"></a>"#;
    let page = page_on_source(
        source,
        r#"tag
           query(selector: "a") {
             tag
             href
             id: attr(name: "id")
             missing: attr(name: "rel")
             class
             classList
             src(selector: "img")
           }"#,
    )
    .await;

    assert_eq!(page["tag"], "HTML");
    let link = &page["query"];
    assert_eq!(link["tag"], "A");
    assert_eq!(link["href"], "/start");
    assert_eq!(link["id"], "home");
    assert_eq!(link["missing"], json!(null));
    assert_eq!(link["class"], " nav  main ");
    assert_eq!(link["classList"], json!(["nav", "main"]));
    assert_eq!(link["src"], "logo.png");
}

#[tokio::test]
async fn test_has_and_count() {
    let page = page_on_source(
        PAGE,
        r#"yes: has(selector: "strong")
           no: has(selector: "table")
           count(selector: "div > *")
           none: count"#,
    )
    .await;

    assert_eq!(page["yes"], true);
    assert_eq!(page["no"], false);
    assert_eq!(page["count"], 2);
    assert_eq!(page["none"], 0);
}

#[tokio::test]
async fn test_query_all_scopes_nested_selectors() {
    let source = r#"<ul><li><b>1</b></li><li><b>2</b><b>3</b></li></ul><b>outside</b>"#;
    let page = page_on_source(
        source,
        r#"queryAll(selector: "li") { count(selector: "b") texts: queryAll(selector: "b") { text } }"#,
    )
    .await;

    assert_eq!(
        page["queryAll"],
        json!([
            { "count": 1, "texts": [{ "text": "1" }] },
            { "count": 2, "texts": [{ "text": "2" }, { "text": "3" }] },
        ])
    );
}

#[tokio::test]
async fn test_next_includes_bare_text() {
    let page = page_on_source(
        PAGE,
        r#"query(selector: "strong") { next { text } nextAll { text } }"#,
    )
    .await;

    assert_eq!(page["query"]["next"]["text"], "bare text");
    assert_eq!(
        page["query"]["nextAll"],
        json!([{ "text": "bare text" }, { "text": "bap" }])
    );
}

#[tokio::test]
async fn test_previous_all_in_document_order() {
    let page = page_on_source(
        PAGE,
        r#"query(selector: "span") { previous { text } previousAll { text } }"#,
    )
    .await;

    assert_eq!(page["query"]["previous"]["text"], "bare text");
    assert_eq!(
        page["query"]["previousAll"],
        json!([{ "text": "bad" }, { "text": "bare text" }])
    );
}

#[tokio::test]
async fn test_first_and_last_siblings_are_null_or_empty() {
    let page = page_on_source(
        PAGE,
        r#"first: query(selector: "strong") { previous { text } previousAll { text } }
           last: query(selector: "span") { next { text } nextAll { text } }"#,
    )
    .await;

    assert_eq!(page["first"]["previous"], json!(null));
    assert_eq!(page["first"]["previousAll"], json!([]));
    assert_eq!(page["last"]["next"], json!(null));
    assert_eq!(page["last"]["nextAll"], json!([]));
}

#[tokio::test]
async fn test_children_and_child_nodes() {
    let page = page_on_source(
        PAGE,
        r#"query(selector: "div") { children { tag } childNodes { tag text } }"#,
    )
    .await;

    assert_eq!(
        page["query"]["children"],
        json!([{ "tag": "STRONG" }, { "tag": "SPAN" }])
    );
    assert_eq!(
        page["query"]["childNodes"],
        json!([
            { "tag": "STRONG", "text": "bad" },
            { "tag": null, "text": "bare text" },
            { "tag": "SPAN", "text": "bap" },
        ])
    );
}

#[tokio::test]
async fn test_parent_and_siblings() {
    let page = page_on_source(
        PAGE,
        r#"parent { tag }
           siblings { tag }
           query(selector: "span") { parent { class } siblings { tag } }"#,
    )
    .await;

    assert_eq!(page["parent"], json!(null));
    assert_eq!(page["siblings"], json!([{ "tag": "HTML" }]));
    assert_eq!(page["query"]["parent"]["class"], "selectme");
    assert_eq!(
        page["query"]["siblings"],
        json!([{ "tag": "STRONG" }, { "tag": "SPAN" }])
    );
}

#[tokio::test]
async fn test_index_among_child_nodes() {
    let page = page_on_source(
        PAGE,
        r#"index query(selector: "span") { index }"#,
    )
    .await;

    assert_eq!(page["index"], -1);
    assert_eq!(page["query"]["index"], 2);
}

#[tokio::test]
async fn test_index_of_matching_ancestor() {
    let source = r#"<ul><li><a>one</a></li><li><p><a>two</a></p></li></ul><a>free</a>"#;
    let page = page_on_source(
        source,
        r#"queryAll(selector: "a") { index(parent: "li") }"#,
    )
    .await;

    assert_eq!(
        page["queryAll"],
        json!([{ "index": 0 }, { "index": 1 }, { "index": -1 }])
    );
}

#[tokio::test]
async fn test_table_rows() {
    let source = r#"<table>
        <tr><th>Name</th><th>Qty</th></tr>
        <tr><td> apples </td><td>3</td></tr>
        <tr><td>pears</td><td> 5</td></tr>
    </table>"#;
    let page = page_on_source(source, r#"table(selector: "table")"#).await;

    assert_eq!(page["table"], json!([["apples", "3"], ["pears", "5"]]));
}

#[tokio::test]
async fn test_meta() {
    let source = r#"<html><head>
        <meta name="description" content="by name">
        <meta property="og:title" content="by property">
        </head></html>"#;
    let page = page_on_source(
        source,
        r#"description: meta(name: "description")
           og: meta(name: "og:title")
           missing: meta(name: "keywords")"#,
    )
    .await;

    assert_eq!(page["description"], "by name");
    assert_eq!(page["og"], "by property");
    assert_eq!(page["missing"], json!(null));
}

#[tokio::test]
async fn test_invalid_selector_only_fails_its_field() {
    let response = run_on_source(PAGE, r#"title has(selector: "div[")"#).await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0]
        .message
        .starts_with(r#"Invalid CSS selector "div[""#));
    assert_eq!(
        serde_json::to_value(&response.errors[0].path).unwrap(),
        json!(["page", "has"])
    );

    let data = response.data.into_json().unwrap();
    assert_eq!(data["page"]["title"], "some title");
    assert_eq!(data["page"]["has"], json!(null));
}

#[tokio::test]
async fn test_visit_without_href_is_null() {
    let page = page_on_source(
        "<span>no link</span>",
        r#"query(selector: "span") { visit { title } }"#,
    )
    .await;

    assert_eq!(page["query"]["visit"], json!(null));
}

#[tokio::test]
async fn test_count_inside_query() {
    let page = page_on_source(
        "<ul><li>one</li><li>two</li></ul>",
        r#"query(selector: "ul") { count(selector: "li") }"#,
    )
    .await;

    assert_eq!(page["query"]["count"], 2);
}

#[tokio::test]
async fn test_next_all_mixes_text_and_elements() {
    let page = page_on_source(
        PAGE,
        r#"query(selector: "strong") { nextAll { tag text } }"#,
    )
    .await;

    assert_eq!(
        page["query"]["nextAll"],
        json!([
            { "tag": null, "text": "bare text" },
            { "tag": "SPAN", "text": "bap" },
        ])
    );
}

#[tokio::test]
async fn test_nested_field_error_is_scoped_to_that_field() {
    let response = run_on_source(
        PAGE,
        r#"queryAll(selector: "div") { text(selector: "p[") }"#,
    )
    .await;

    assert_eq!(response.errors.len(), 1);
    assert_eq!(
        serde_json::to_value(&response.errors[0].path).unwrap(),
        json!(["page", "queryAll", 0, "text"])
    );
    assert_eq!(
        response.data.into_json().unwrap(),
        json!({ "page": { "queryAll": [{ "text": null }] } })
    );
}
