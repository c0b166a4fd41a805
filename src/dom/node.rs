use crate::dom::Document;
use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Node, Selector};
use std::fmt;
use std::sync::Arc;

/// A position inside a parsed document: an element, text, comment or other node
///
/// Handles are cheap to clone and may alias the same node. They never mutate
/// the tree, only navigate it. Every accessor locks the document's tree for
/// the duration of the call, so results are owned values or further handles.
#[derive(Clone)]
pub struct NodeHandle {
    document: Arc<Document>,
    id: NodeId,
}

impl NodeHandle {
    /// Creates a handle to node `id` of `document`
    pub fn new(document: Arc<Document>, id: NodeId) -> Self {
        Self { document, id }
    }

    /// Returns the document this position belongs to
    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    /// Returns the node id within the document's tree
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns true if both handles denote the same node of the same document
    pub fn same_position(&self, other: &NodeHandle) -> bool {
        Arc::ptr_eq(&self.document, &other.document) && self.id == other.id
    }

    fn handle(&self, id: NodeId) -> NodeHandle {
        NodeHandle::new(self.document.clone(), id)
    }

    /// Runs `f` on the node at this position
    ///
    /// `f` must not call back into handles of the same document.
    fn with_node<R>(&self, f: impl FnOnce(NodeRef<'_, Node>) -> R) -> Option<R> {
        self.document.with_html(|html| html.tree.get(self.id).map(f))
    }

    /// Runs `f` on the element at this position; `None` for text and other nodes
    ///
    /// `f` must not call back into handles of the same document.
    pub fn with_element<R>(&self, f: impl FnOnce(ElementRef<'_>) -> R) -> Option<R> {
        self.document
            .with_html(|html| html.tree.get(self.id).and_then(ElementRef::wrap).map(f))
    }

    /// Returns true if this position is an element
    pub fn is_element(&self) -> bool {
        self.with_node(|node| node.value().is_element())
            .unwrap_or(false)
    }

    /// Returns the upper-cased tag name (`DIV`), like `Element.tagName`
    pub fn tag_name(&self) -> Option<String> {
        self.with_element(|element| element.value().name().to_ascii_uppercase())
    }

    /// Returns the serialized children of this element
    pub fn inner_html(&self) -> Option<String> {
        self.with_element(|element| element.inner_html())
    }

    /// Returns the serialized element including its own tags
    pub fn outer_html(&self) -> Option<String> {
        self.with_element(|element| element.html())
    }

    /// Returns the text content, like `Node.textContent`
    ///
    /// Text and comment nodes yield their data; elements yield the
    /// concatenation of all descendant text nodes; doctypes yield `None`.
    pub fn text_content(&self) -> Option<String> {
        self.with_node(|node| match node.value() {
            Node::Text(text) => Some(text.text.to_string()),
            Node::Comment(comment) => Some(comment.comment.to_string()),
            Node::Element(_) | Node::Document | Node::Fragment => {
                let mut content = String::new();
                for descendant in node.descendants() {
                    if let Node::Text(text) = descendant.value() {
                        content.push_str(&text.text);
                    }
                }
                Some(content)
            }
            _ => None,
        })
        .flatten()
    }

    /// Returns the value of attribute `name`
    pub fn attr(&self, name: &str) -> Option<String> {
        self.with_element(|element| element.value().attr(name).map(str::to_string))
            .flatten()
    }

    /// Returns the first descendant element matching `selector`
    pub fn select_first(&self, selector: &Selector) -> Option<NodeHandle> {
        let found = self
            .with_element(|element| element.select(selector).next().map(|found| found.id()))
            .flatten()?;
        Some(self.handle(found))
    }

    /// Returns every descendant element matching `selector`, in document order
    pub fn select_all(&self, selector: &Selector) -> Vec<NodeHandle> {
        let ids = self
            .with_element(|element| {
                element
                    .select(selector)
                    .map(|found| found.id())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        ids.into_iter().map(|id| self.handle(id)).collect()
    }

    /// Returns the child elements
    pub fn children(&self) -> Vec<NodeHandle> {
        let ids = self
            .with_node(|node| {
                node.children()
                    .filter(|child| child.value().is_element())
                    .map(|child| child.id())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        ids.into_iter().map(|id| self.handle(id)).collect()
    }

    /// Returns every child node, text nodes included
    pub fn child_nodes(&self) -> Vec<NodeHandle> {
        let ids = self
            .with_node(|node| node.children().map(|child| child.id()).collect::<Vec<_>>())
            .unwrap_or_default();
        ids.into_iter().map(|id| self.handle(id)).collect()
    }

    /// Returns the parent node of any kind (the document node for `<html>`)
    pub fn parent_node(&self) -> Option<NodeHandle> {
        let parent = self.with_node(|node| node.parent().map(|parent| parent.id()))??;
        Some(self.handle(parent))
    }

    /// Returns the parent if it is an element, like `Node.parentElement`
    pub fn parent_element(&self) -> Option<NodeHandle> {
        self.parent_node().filter(NodeHandle::is_element)
    }

    /// Returns the next sibling node, text nodes included
    pub fn next_sibling(&self) -> Option<NodeHandle> {
        let next = self.with_node(|node| node.next_sibling().map(|next| next.id()))??;
        Some(self.handle(next))
    }

    /// Returns the previous sibling node, text nodes included
    pub fn previous_sibling(&self) -> Option<NodeHandle> {
        let previous = self.with_node(|node| node.prev_sibling().map(|prev| prev.id()))??;
        Some(self.handle(previous))
    }

    /// Returns this node's ordinal among its parent element's child nodes
    pub fn index_in_parent(&self) -> Option<usize> {
        self.parent_element()?
            .child_nodes()
            .iter()
            .position(|sibling| sibling.same_position(self))
    }

    /// Iterates the strict ancestors of this node, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        std::iter::successors(self.parent_node(), NodeHandle::parent_node)
    }
}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self
            .with_node(|node| match node.value() {
                Node::Element(element) => element.name().to_string(),
                Node::Text(_) => "#text".to_string(),
                Node::Comment(_) => "#comment".to_string(),
                Node::Document => "#document".to_string(),
                _ => "#other".to_string(),
            })
            .unwrap_or_else(|| "#detached".to_string());

        f.debug_struct("NodeHandle")
            .field("node", &kind)
            .field("id", &self.id)
            .field("url", &self.document.url())
            .finish()
    }
}
