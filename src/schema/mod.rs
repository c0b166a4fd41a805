//! GraphQL schema
//!
//! The schema is a dispatch table from field name to handler, built once when
//! an [`Engine`](crate::engine::Engine) is created:
//!
//! ```graphql
//! interface Node { ...shared fields }
//! type Document implements Node { ...shared, title, meta(name) }
//! type Element implements Node { ...shared, visit, visit_custom(selector, attr) }
//! type Query { page(url: String, source: String): Document }
//! ```

mod fields;
mod handlers;

pub use fields::{ArgSpec, FieldSpec};
pub use handlers::Handler;

use async_graphql::dynamic::{Interface, Object, Schema, SchemaError};

pub const QUERY: &str = "Query";
pub const NODE: &str = "Node";
pub const DOCUMENT: &str = "Document";
pub const ELEMENT: &str = "Element";

/// Builds the executable schema
pub fn build_schema() -> Result<Schema, SchemaError> {
    let shared = fields::shared_fields();

    let node = shared.iter().fold(
        Interface::new(NODE).description("A DOM node (either an Element or a Document)."),
        |interface, spec| interface.field(spec.interface_field()),
    );

    let document = shared
        .iter()
        .chain(fields::document_fields().iter())
        .fold(
            Object::new(DOCUMENT)
                .description("A DOM document.")
                .implement(NODE),
            |object, spec| object.field(spec.field()),
        );

    let element = shared
        .iter()
        .chain(fields::element_fields().iter())
        .fold(
            Object::new(ELEMENT)
                .description("A DOM element.")
                .implement(NODE),
            |object, spec| object.field(spec.field()),
        );

    let query = Object::new(QUERY).field(fields::page_field().field());

    Schema::build(QUERY, None, None)
        .register(node)
        .register(document)
        .register(element)
        .register(query)
        .finish()
}
