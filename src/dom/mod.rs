//! Parsed documents and positions within them
//!
//! A [`Document`] owns one parsed HTML source; a [`NodeHandle`] is a shareable
//! reference to a single node of a document.

mod document;
mod node;

pub use document::Document;
pub use node::NodeHandle;
