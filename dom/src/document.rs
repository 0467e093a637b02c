//! DOM Document - Document node and tree management

use hashbrown::HashMap;
use thiserror::Error;

use crate::node::{Attribute, Node, NodeData, NodeId};

/// DOM errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// Tag name is not a valid element name
    #[error("invalid tag name: {0:?}")]
    InvalidTagName(String),
    /// No node with this ID exists in the document
    #[error("node {0} not found")]
    NotFound(NodeId),
    /// The insertion would produce an invalid tree
    #[error("cannot insert node {child} under node {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}

/// A DOM document.
#[derive(Debug)]
pub struct Document {
    /// All nodes in the document.
    nodes: Vec<Node>,
    /// ID to node mapping.
    id_map: HashMap<String, NodeId>,
}

/// Simple selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selector<'a> {
    Id(&'a str),
    Class(&'a str),
    Tag(&'a str),
}

impl<'a> Selector<'a> {
    fn parse(selector: &'a str) -> Option<Self> {
        let selector = selector.trim();
        if let Some(id) = selector.strip_prefix('#') {
            (!id.is_empty()).then_some(Selector::Id(id))
        } else if let Some(class) = selector.strip_prefix('.') {
            (!class.is_empty()).then_some(Selector::Class(class))
        } else if is_valid_tag_name(selector) {
            Some(Selector::Tag(selector))
        } else {
            None
        }
    }

    fn matches(&self, node: &Node) -> bool {
        match self {
            Selector::Id(id) => node.element_id() == Some(*id),
            Selector::Class(class) => node.has_class(class),
            Selector::Tag(tag) => node
                .tag_name()
                .map(|t| t.eq_ignore_ascii_case(tag))
                .unwrap_or(false),
        }
    }
}

/// Element names start with an ASCII letter and contain letters, digits or `-`.
pub fn is_valid_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
        }
        _ => false,
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Document {
            nodes: vec![Node::new_document(0)],
            id_map: HashMap::new(),
        }
    }

    /// Get the document node ID.
    pub fn root(&self) -> NodeId {
        0
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Create a new element.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.create_element_with(tag_name, Vec::new())
    }

    /// Create a new element with attributes.
    pub fn create_element_with(&mut self, tag_name: &str, attrs: Vec<Attribute>) -> NodeId {
        let id = self.nodes.len();
        let node = Node::new_element(id, tag_name, attrs);

        if let Some(id_value) = node.element_id() {
            self.id_map.entry(id_value.to_string()).or_insert(id);
        }

        self.nodes.push(node);
        id
    }

    /// Create a new text node.
    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new_text(id, content.into()));
        id
    }

    /// Set an attribute on an element.
    pub fn set_attribute(&mut self, node_id: NodeId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.set_attribute(name, value);
            if name == "id" && node.is_element() {
                self.id_map.insert(value.to_string(), node_id);
            }
        }
    }

    /// Get an attribute of an element.
    pub fn get_attribute(&self, node_id: NodeId, name: &str) -> Option<&str> {
        self.get(node_id).and_then(|n| n.get_attribute(name))
    }

    /// Current value of a form control.
    pub fn value(&self, node_id: NodeId) -> &str {
        self.get_attribute(node_id, "value").unwrap_or("")
    }

    /// Set the value of a form control.
    pub fn set_value(&mut self, node_id: NodeId, value: &str) {
        self.set_attribute(node_id, "value", value);
    }

    /// Get parent of a node.
    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.get(node_id).and_then(|n| n.parent)
    }

    /// Append a child to a parent, detaching it from any previous parent.
    ///
    /// The document node cannot be a child, text nodes cannot be parents, and
    /// a node cannot be appended under itself or one of its descendants.
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<(), DomError> {
        self.check_insert(parent_id, child_id)?;
        if self.nodes[child_id].parent.is_some() {
            self.remove_child(child_id);
        }

        let old_last_child = self.nodes[parent_id].last_child;

        if let Some(old_last_id) = old_last_child {
            self.nodes[old_last_id].next_sibling = Some(child_id);
        }

        let child = &mut self.nodes[child_id];
        child.parent = Some(parent_id);
        child.prev_sibling = old_last_child;

        let parent = &mut self.nodes[parent_id];
        if parent.first_child.is_none() {
            parent.first_child = Some(child_id);
        }
        parent.last_child = Some(child_id);
        Ok(())
    }

    fn check_insert(&self, parent_id: NodeId, child_id: NodeId) -> Result<(), DomError> {
        let parent = self.get(parent_id).ok_or(DomError::NotFound(parent_id))?;
        let child = self.get(child_id).ok_or(DomError::NotFound(child_id))?;
        let hierarchy = DomError::HierarchyRequest {
            parent: parent_id,
            child: child_id,
        };

        if child.is_document() || parent.is_text() {
            return Err(hierarchy);
        }

        // child must not be the parent or one of its ancestors
        let mut current = Some(parent_id);
        while let Some(id) = current {
            if id == child_id {
                return Err(hierarchy);
            }
            current = self.nodes[id].parent;
        }
        Ok(())
    }

    /// Remove a child from its parent.
    pub fn remove_child(&mut self, child_id: NodeId) {
        let (parent_id, prev_id, next_id) = match self.nodes.get(child_id) {
            Some(c) => (c.parent, c.prev_sibling, c.next_sibling),
            None => return,
        };

        // Update previous sibling
        if let Some(prev_id) = prev_id {
            self.nodes[prev_id].next_sibling = next_id;
        } else if let Some(parent_id) = parent_id {
            // child was first child
            self.nodes[parent_id].first_child = next_id;
        }

        // Update next sibling
        if let Some(next_id) = next_id {
            self.nodes[next_id].prev_sibling = prev_id;
        } else if let Some(parent_id) = parent_id {
            // child was last child
            self.nodes[parent_id].last_child = prev_id;
        }

        let child = &mut self.nodes[child_id];
        child.parent = None;
        child.prev_sibling = None;
        child.next_sibling = None;
    }

    /// Get children of a node.
    pub fn children(&self, parent_id: NodeId) -> Vec<NodeId> {
        let mut children = Vec::new();
        let mut child_id = self.nodes.get(parent_id).and_then(|p| p.first_child);

        while let Some(id) = child_id {
            children.push(id);
            child_id = self.nodes.get(id).and_then(|n| n.next_sibling);
        }

        children
    }

    /// Get child element nodes.
    pub fn child_elements(&self, parent_id: NodeId) -> Vec<NodeId> {
        self.children(parent_id)
            .into_iter()
            .filter(|&id| self.nodes[id].is_element())
            .collect()
    }

    /// Descendants of a node in tree order, excluding the node itself.
    pub fn descendants(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node_id).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        out
    }

    /// Whether a node is attached to the document tree.
    pub fn is_connected(&self, node_id: NodeId) -> bool {
        let mut current = Some(node_id);
        while let Some(id) = current {
            if id == self.root() {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Get a connected element by ID.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        match self.id_map.get(id).copied() {
            Some(node_id)
                if self.is_connected(node_id)
                    && self.nodes[node_id].element_id() == Some(id) =>
            {
                Some(node_id)
            }
            _ => self.query_selector_all(&format!("#{}", id)).first().copied(),
        }
    }

    /// Get connected elements by class name.
    pub fn get_elements_by_class_name(&self, class_name: &str) -> Vec<NodeId> {
        self.matching(self.root(), Selector::Class(class_name))
    }

    /// Get connected elements by tag name.
    pub fn get_elements_by_tag_name(&self, tag_name: &str) -> Vec<NodeId> {
        self.matching(self.root(), Selector::Tag(tag_name))
    }

    /// First connected element matching `#id`, `.class` or `tag`.
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.query_selector_all(selector).first().copied()
    }

    /// All connected elements matching `#id`, `.class` or `tag`.
    pub fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        match Selector::parse(selector) {
            Some(sel) => self.matching(self.root(), sel),
            None => Vec::new(),
        }
    }

    /// Like `query_selector`, scoped to the descendants of `scope`.
    pub fn query_selector_in(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        Selector::parse(selector).and_then(|sel| self.matching(scope, sel).first().copied())
    }

    fn matching(&self, scope: NodeId, selector: Selector<'_>) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| selector.matches(&self.nodes[id]))
            .collect()
    }

    /// Get text content of a node (recursive).
    pub fn text_content(&self, node_id: NodeId) -> String {
        let node = match self.get(node_id) {
            Some(n) => n,
            None => return String::new(),
        };

        match &node.data {
            NodeData::Text { content } => content.clone(),
            NodeData::Element { .. } | NodeData::Document => self
                .children(node_id)
                .into_iter()
                .map(|child| self.text_content(child))
                .collect(),
        }
    }

    /// Serialize a node and its subtree to HTML.
    pub fn to_html(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node_id, &mut out);
        out
    }

    fn write_html(&self, node_id: NodeId, out: &mut String) {
        let node = match self.get(node_id) {
            Some(n) => n,
            None => return,
        };

        match &node.data {
            NodeData::Text { content } => out.push_str(&escape(content, false)),
            NodeData::Document => {
                for child in self.children(node_id) {
                    self.write_html(child, out);
                }
            }
            NodeData::Element { tag, attrs, .. } => {
                out.push('<');
                out.push_str(tag);
                for attr in attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    out.push_str(&escape(&attr.value, true));
                    out.push('"');
                }
                out.push('>');
                if node.is_void_element() {
                    return;
                }
                for child in self.children(node_id) {
                    self.write_html(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if document is empty (only document node).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
