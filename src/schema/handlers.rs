//! Glue between the executor and the resolvers
//!
//! Every handler has the same shape: pull the parent tree position, typed
//! arguments and the per-query [`ExecutionState`] out of the resolver context,
//! call the matching resolver, and wrap its result as a field value. A failing
//! resolver is reported against its own field path and the field resolves to
//! `null`, leaving sibling and parent fields intact.

use crate::dom::NodeHandle;
use crate::resolvers::{document, link, root, tree};
use crate::state::ExecutionState;
use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use async_graphql::{Number, Value};
use std::future::Future;

/// Signature shared by every field handler
pub type Handler = for<'a> fn(ResolverContext<'a>) -> FieldFuture<'a>;

/// Runs `resolver`, turning its error into a `null` field plus an error
/// carrying this field's path
fn resolve<'a, F, Fut>(ctx: ResolverContext<'a>, resolver: F) -> FieldFuture<'a>
where
    F: FnOnce(ResolverContext<'a>) -> Fut,
    Fut: Future<Output = async_graphql::Result<Option<FieldValue<'a>>>> + Send + 'a,
{
    let context = ctx.ctx;
    let resolved = resolver(ctx);

    FieldFuture::new(async move {
        match resolved.await {
            Ok(value) => Ok(value),
            Err(err) => {
                let err = context.set_error_path(err.into_server_error(context.item.pos));
                tracing::debug!("Field {} failed: {}", context.item.node.name.node, err.message);
                context.add_error(err);
                Ok(None)
            }
        }
    })
}

fn node<'a>(ctx: &ResolverContext<'a>) -> async_graphql::Result<&'a NodeHandle> {
    ctx.parent_value.try_downcast_ref::<NodeHandle>()
}

fn state<'a>(ctx: &ResolverContext<'a>) -> async_graphql::Result<&'a ExecutionState> {
    ctx.data::<ExecutionState>()
}

/// Optional string argument; an explicit `null` counts as absent
fn string_arg(ctx: &ResolverContext<'_>, name: &str) -> async_graphql::Result<Option<String>> {
    match ctx.args.get(name) {
        Some(value) if !value.is_null() => Ok(Some(value.string()?.to_string())),
        _ => Ok(None),
    }
}

/// Required string argument; the schema already rejects missing values
fn required_string_arg(ctx: &ResolverContext<'_>, name: &str) -> async_graphql::Result<String> {
    Ok(ctx.args.try_get(name)?.string()?.to_string())
}

fn bool_arg(ctx: &ResolverContext<'_>, name: &str) -> async_graphql::Result<bool> {
    match ctx.args.get(name) {
        Some(value) if !value.is_null() => value.boolean(),
        _ => Ok(false),
    }
}

fn string_value(value: String) -> FieldValue<'static> {
    FieldValue::value(Value::String(value))
}

fn strings_value(values: Vec<String>) -> FieldValue<'static> {
    FieldValue::value(Value::List(values.into_iter().map(Value::String).collect()))
}

fn int_value(value: i64) -> FieldValue<'static> {
    FieldValue::value(Value::Number(Number::from(value)))
}

fn node_value(node: NodeHandle) -> FieldValue<'static> {
    FieldValue::owned_any(node)
}

fn nodes_value(nodes: Vec<NodeHandle>) -> FieldValue<'static> {
    FieldValue::list(nodes.into_iter().map(node_value))
}

/// Handler for a field that takes only an optional `selector` and yields a string
macro_rules! scoped_string_handler {
    ($handler:ident, $resolver:path) => {
        pub fn $handler(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
            resolve(ctx, |ctx| async move {
                let node = node(&ctx)?;
                let selector = string_arg(&ctx, "selector")?;
                Ok($resolver(node, selector.as_deref())?.map(string_value))
            })
        }
    };
}

scoped_string_handler!(content, tree::content);
scoped_string_handler!(html, tree::html);
scoped_string_handler!(tag, tree::tag);
scoped_string_handler!(href, tree::href);
scoped_string_handler!(src, tree::src);
scoped_string_handler!(class, tree::class);

pub fn page(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    resolve(ctx, |ctx| async move {
        let url = string_arg(&ctx, "url")?;
        let source = string_arg(&ctx, "source")?;
        let state = state(&ctx)?;

        let root = root::page(url.as_deref(), source.as_deref(), state).await?;
        Ok(Some(node_value(root)))
    })
}

pub fn index(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    resolve(ctx, |ctx| async move {
        let node = node(&ctx)?;
        let parent = string_arg(&ctx, "parent")?;
        let state = state(&ctx)?;
        Ok(Some(int_value(tree::index(node, parent.as_deref(), state)?)))
    })
}

pub fn text(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    resolve(ctx, |ctx| async move {
        let node = node(&ctx)?;
        let selector = string_arg(&ctx, "selector")?;
        let trim = bool_arg(&ctx, "trim")?;
        Ok(tree::text(node, selector.as_deref(), trim)?.map(string_value))
    })
}

pub fn table(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    resolve(ctx, |ctx| async move {
        let node = node(&ctx)?;
        let selector = string_arg(&ctx, "selector")?;
        Ok(tree::table(node, selector.as_deref())?.map(|rows| {
            FieldValue::value(Value::List(
                rows.into_iter()
                    .map(|row| Value::List(row.into_iter().map(Value::String).collect()))
                    .collect(),
            ))
        }))
    })
}

pub fn attr(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    resolve(ctx, |ctx| async move {
        let node = node(&ctx)?;
        let selector = string_arg(&ctx, "selector")?;
        let name = required_string_arg(&ctx, "name")?;
        Ok(tree::attr(node, selector.as_deref(), &name)?.map(string_value))
    })
}

pub fn class_list(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    resolve(ctx, |ctx| async move {
        let node = node(&ctx)?;
        let selector = string_arg(&ctx, "selector")?;
        Ok(tree::class_list(node, selector.as_deref())?.map(strings_value))
    })
}

pub fn has(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    resolve(ctx, |ctx| async move {
        let node = node(&ctx)?;
        let selector = required_string_arg(&ctx, "selector")?;
        Ok(Some(FieldValue::value(Value::Boolean(tree::has(
            node, &selector,
        )?))))
    })
}

pub fn count(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    resolve(ctx, |ctx| async move {
        let node = node(&ctx)?;
        let selector = string_arg(&ctx, "selector")?;
        let count = tree::count(node, selector.as_deref())?;
        Ok(Some(int_value(count as i64)))
    })
}

pub fn query(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    resolve(ctx, |ctx| async move {
        let node = node(&ctx)?;
        let selector = required_string_arg(&ctx, "selector")?;
        Ok(tree::query(node, &selector)?.map(node_value))
    })
}

pub fn query_all(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    resolve(ctx, |ctx| async move {
        let node = node(&ctx)?;
        let selector = required_string_arg(&ctx, "selector")?;
        Ok(Some(nodes_value(tree::query_all(node, &selector)?)))
    })
}

/// Handler for a navigation field with no arguments yielding one position
macro_rules! step_handler {
    ($handler:ident, $resolver:path) => {
        pub fn $handler(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
            resolve(ctx, |ctx| async move {
                let node = node(&ctx)?;
                Ok($resolver(node).map(node_value))
            })
        }
    };
}

/// Handler for a navigation field with no arguments yielding a list of positions
macro_rules! walk_handler {
    ($handler:ident, $resolver:path) => {
        pub fn $handler(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
            resolve(ctx, |ctx| async move {
                let node = node(&ctx)?;
                Ok(Some(nodes_value($resolver(node))))
            })
        }
    };
}

step_handler!(parent, tree::parent);
step_handler!(next, tree::next);
step_handler!(previous, tree::previous);

walk_handler!(children, tree::children);
walk_handler!(child_nodes, tree::child_nodes);
walk_handler!(siblings, tree::siblings);
walk_handler!(next_all, tree::next_all);
walk_handler!(previous_all, tree::previous_all);

pub fn visit(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    resolve(ctx, |ctx| async move {
        let node = node(&ctx)?;
        let state = state(&ctx)?;
        Ok(link::visit(node, state).await?.map(node_value))
    })
}

pub fn visit_custom(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    resolve(ctx, |ctx| async move {
        let node = node(&ctx)?;
        let selector = string_arg(&ctx, "selector")?;
        let attr = string_arg(&ctx, "attr")?;
        let state = state(&ctx)?;

        let visited =
            link::visit_custom(node, selector.as_deref(), attr.as_deref(), state).await?;
        Ok(visited.map(node_value))
    })
}

pub fn title(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    resolve(ctx, |ctx| async move {
        let node = node(&ctx)?;
        Ok(document::title(node).map(string_value))
    })
}

pub fn meta(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    resolve(ctx, |ctx| async move {
        let node = node(&ctx)?;
        let name = string_arg(&ctx, "name")?;
        Ok(name
            .and_then(|name| document::meta(node, &name))
            .map(string_value))
    })
}
