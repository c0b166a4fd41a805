//! Declarative field table
//!
//! The fields shared by `Node`, `Document` and `Element` are declared once and
//! turned into both interface fields and object fields, so the interface and
//! its implementations can never disagree.

use crate::schema::handlers::{self, Handler};
use crate::schema::{DOCUMENT, ELEMENT};
use async_graphql::dynamic::{Field, InputValue, InterfaceField, TypeRef};
use async_graphql::Value;

const SELECTOR_DESCRIPTION: &str =
    "A [CSS selector](https://developer.mozilla.org/en-US/docs/Learn/CSS/Introduction_to_CSS/Selectors).";

/// One argument of a field
#[derive(Clone)]
pub struct ArgSpec {
    pub name: &'static str,
    pub ty: TypeRef,
    pub description: &'static str,
    pub default: Option<Value>,
}

impl ArgSpec {
    fn new(name: &'static str, ty: TypeRef, description: &'static str) -> Self {
        Self {
            name,
            ty,
            description,
            default: None,
        }
    }

    /// Optional `selector` that re-scopes the field to the first match
    fn selector() -> Self {
        Self::new("selector", TypeRef::named(TypeRef::STRING), SELECTOR_DESCRIPTION)
    }

    /// Mandatory `selector`
    fn required_selector() -> Self {
        Self::new("selector", TypeRef::named_nn(TypeRef::STRING), SELECTOR_DESCRIPTION)
    }

    fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    fn input_value(&self) -> InputValue {
        let input = InputValue::new(self.name, self.ty.clone()).description(self.description);
        match &self.default {
            Some(default) => input.default_value(default.clone()),
            None => input,
        }
    }
}

/// One field of the schema: its type, arguments and handler
#[derive(Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: TypeRef,
    pub description: &'static str,
    pub args: Vec<ArgSpec>,
    pub handler: Handler,
}

impl FieldSpec {
    fn new(name: &'static str, ty: TypeRef, description: &'static str, handler: Handler) -> Self {
        Self {
            name,
            ty,
            description,
            args: Vec::new(),
            handler,
        }
    }

    fn arg(mut self, arg: ArgSpec) -> Self {
        self.args.push(arg);
        self
    }

    /// Builds the executable object field
    pub fn field(&self) -> Field {
        self.args.iter().fold(
            Field::new(self.name, self.ty.clone(), self.handler).description(self.description),
            |field, arg| field.argument(arg.input_value()),
        )
    }

    /// Builds the matching interface field
    pub fn interface_field(&self) -> InterfaceField {
        self.args.iter().fold(
            InterfaceField::new(self.name, self.ty.clone()).description(self.description),
            |field, arg| field.argument(arg.input_value()),
        )
    }
}

fn string() -> TypeRef {
    TypeRef::named(TypeRef::STRING)
}

fn element() -> TypeRef {
    TypeRef::named(ELEMENT)
}

fn elements() -> TypeRef {
    TypeRef::named_list(ELEMENT)
}

/// Fields every `Node` (and so every `Document` and `Element`) has
pub fn shared_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new(
            "index",
            TypeRef::named(TypeRef::INT),
            "The node's position among its parent's child nodes or, with `parent`, \
             the position of its closest matching ancestor among all matches of `parent`.",
            handlers::index,
        )
        .arg(ArgSpec::new(
            "parent",
            string(),
            "A CSS selector for the ancestor whose position should be returned.",
        )),
        FieldSpec::new("content", string(), "The HTML content of the subnodes", handlers::content)
            .arg(ArgSpec::selector()),
        FieldSpec::new(
            "html",
            string(),
            "The HTML content of the selected DOM node",
            handlers::html,
        )
        .arg(ArgSpec::selector()),
        FieldSpec::new(
            "text",
            string(),
            "The text content of the selected DOM node",
            handlers::text,
        )
        .arg(ArgSpec::selector())
        .arg(
            ArgSpec::new(
                "trim",
                TypeRef::named(TypeRef::BOOLEAN),
                "Strip leading and trailing whitespace.",
            )
            .with_default(false),
        ),
        FieldSpec::new(
            "table",
            TypeRef::List(Box::new(TypeRef::named_list(TypeRef::STRING))),
            "The trimmed text of every `td`, row by row, for the `tr` rows of the selected node",
            handlers::table,
        )
        .arg(ArgSpec::selector()),
        FieldSpec::new(
            "tag",
            string(),
            "The tag name of the selected DOM node",
            handlers::tag,
        )
        .arg(ArgSpec::selector()),
        FieldSpec::new(
            "attr",
            string(),
            "An attribute of the selected node (eg. `href`, `src`, etc.).",
            handlers::attr,
        )
        .arg(ArgSpec::selector())
        .arg(ArgSpec::new(
            "name",
            TypeRef::named_nn(TypeRef::STRING),
            "The name of the attribute",
        )),
        FieldSpec::new("href", string(), "The href attribute of the selected node", handlers::href)
            .arg(ArgSpec::selector()),
        FieldSpec::new("src", string(), "The src attribute of the selected node", handlers::src)
            .arg(ArgSpec::selector()),
        FieldSpec::new("class", string(), "The class attribute of the selected node", handlers::class)
            .arg(ArgSpec::selector()),
        FieldSpec::new(
            "classList",
            TypeRef::named_list(TypeRef::STRING),
            "An array containing the classes of the selected node",
            handlers::class_list,
        )
        .arg(ArgSpec::selector()),
        FieldSpec::new(
            "has",
            TypeRef::named(TypeRef::BOOLEAN),
            "Returns true if an element with the given selector exists.",
            handlers::has,
        )
        .arg(ArgSpec::required_selector()),
        FieldSpec::new(
            "count",
            TypeRef::named(TypeRef::INT),
            "The number of elements matching the selector",
            handlers::count,
        )
        .arg(ArgSpec::selector()),
        FieldSpec::new(
            "query",
            element(),
            "Equivalent to Element.querySelector. The selectors of any nested queries \
             will be scoped to the resulting element.",
            handlers::query,
        )
        .arg(ArgSpec::required_selector()),
        FieldSpec::new(
            "queryAll",
            elements(),
            "Equivalent to Element.querySelectorAll. The selectors of any nested queries \
             will be scoped to the resulting elements.",
            handlers::query_all,
        )
        .arg(ArgSpec::required_selector()),
        FieldSpec::new(
            "children",
            elements(),
            "An element's child elements.",
            handlers::children,
        ),
        FieldSpec::new(
            "childNodes",
            elements(),
            "An element's child nodes. Includes text nodes.",
            handlers::child_nodes,
        ),
        FieldSpec::new(
            "parent",
            element(),
            "An element's parent element.",
            handlers::parent,
        ),
        FieldSpec::new(
            "siblings",
            elements(),
            "All elements which are at the same level in the tree as the current element, \
             ie. the children of the current element's parent. Includes the current element.",
            handlers::siblings,
        ),
        FieldSpec::new(
            "next",
            element(),
            "The current element's next sibling. Includes text nodes.",
            handlers::next,
        ),
        FieldSpec::new(
            "nextAll",
            elements(),
            "All of the current element's next siblings",
            handlers::next_all,
        ),
        FieldSpec::new(
            "previous",
            element(),
            "The current element's previous sibling. Includes text nodes.",
            handlers::previous,
        ),
        FieldSpec::new(
            "previousAll",
            elements(),
            "All of the current element's previous siblings",
            handlers::previous_all,
        ),
    ]
}

/// Fields only `Document` has
pub fn document_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("title", string(), "The page title", handlers::title),
        FieldSpec::new(
            "meta",
            string(),
            "The content attribute of the meta tag with the given name or property",
            handlers::meta,
        )
        .arg(ArgSpec::new(
            "name",
            string(),
            "The name (or property) of the meta tag",
        )),
    ]
}

/// Fields only `Element` has
pub fn element_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new(
            "visit",
            TypeRef::named(DOCUMENT),
            "If the element is a link, visit the page linked to in the href attribute.",
            handlers::visit,
        ),
        FieldSpec::new(
            "visit_custom",
            TypeRef::named(DOCUMENT),
            "Visit the page linked to by an attribute of the selected element and \
             continue the query from there.",
            handlers::visit_custom,
        )
        .arg(ArgSpec::selector())
        .arg(ArgSpec::new(
            "attr",
            string(),
            "The attribute holding the link. Defaults to `href`.",
        )),
    ]
}

/// The `page` root field
pub fn page_field() -> FieldSpec {
    FieldSpec::new(
        "page",
        TypeRef::named(DOCUMENT),
        "Load a page from a URL or from an HTML source string.",
        handlers::page,
    )
    .arg(ArgSpec::new(
        "url",
        string(),
        "A URL to fetch the HTML source from.",
    ))
    .arg(ArgSpec::new(
        "source",
        string(),
        "A string containing HTML to be used as the source document.",
    ))
}
