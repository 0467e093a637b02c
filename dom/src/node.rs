//! DOM Node - Base node type

use std::fmt;

/// Node ID - index into the owning document's arena.
pub type NodeId = usize;

/// DOM node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Document = 9,
}

/// A DOM node.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique ID of this node.
    pub id: NodeId,
    /// Node type.
    pub node_type: NodeType,
    /// Node data (element, text, etc.)
    pub data: NodeData,
    /// Parent node ID.
    pub parent: Option<NodeId>,
    /// First child node ID.
    pub first_child: Option<NodeId>,
    /// Last child node ID.
    pub last_child: Option<NodeId>,
    /// Previous sibling node ID.
    pub prev_sibling: Option<NodeId>,
    /// Next sibling node ID.
    pub next_sibling: Option<NodeId>,
}

/// Node data union.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document node
    Document,
    /// Element node
    Element {
        /// Lowercase tag name
        tag: String,
        attrs: Vec<Attribute>,
        /// Element ID attribute value (cached)
        id: Option<String>,
        /// Element class list (cached)
        classes: Vec<String>,
    },
    /// Text node
    Text { content: String },
}

/// An element attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    /// Create a new attribute.
    pub fn new(name: &str, value: &str) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

fn split_classes(value: &str) -> Vec<String> {
    value.split_whitespace().map(|s| s.into()).collect()
}

impl Node {
    fn with_data(id: NodeId, node_type: NodeType, data: NodeData) -> Self {
        Node {
            id,
            node_type,
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }

    /// Create a new document node.
    pub fn new_document(id: NodeId) -> Self {
        Node::with_data(id, NodeType::Document, NodeData::Document)
    }

    /// Create a new element node.
    pub fn new_element(id: NodeId, tag: &str, attrs: Vec<Attribute>) -> Self {
        let id_attr = attrs
            .iter()
            .find(|a| a.name == "id")
            .map(|a| a.value.clone());

        let classes = attrs
            .iter()
            .find(|a| a.name == "class")
            .map(|a| split_classes(&a.value))
            .unwrap_or_default();

        Node::with_data(
            id,
            NodeType::Element,
            NodeData::Element {
                tag: tag.to_ascii_lowercase(),
                attrs,
                id: id_attr,
                classes,
            },
        )
    }

    /// Create a new text node.
    pub fn new_text(id: NodeId, content: String) -> Self {
        Node::with_data(id, NodeType::Text, NodeData::Text { content })
    }

    /// Check if this is an element node.
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if this is a text node.
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Check if this is a document node.
    pub fn is_document(&self) -> bool {
        self.node_type == NodeType::Document
    }

    /// Get tag name (if element).
    pub fn tag_name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Get element ID (if element with id attribute).
    pub fn element_id(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element { id: Some(id), .. } => Some(id.as_str()),
            _ => None,
        }
    }

    /// Get element classes (if element).
    pub fn element_classes(&self) -> &[String] {
        match &self.data {
            NodeData::Element { classes, .. } => classes,
            _ => &[],
        }
    }

    /// Get text content (if text node).
    pub fn text_content(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text { content } => Some(content),
            _ => None,
        }
    }

    /// Get all attributes in insertion order.
    pub fn attributes(&self) -> &[Attribute] {
        match &self.data {
            NodeData::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    /// Get attribute value.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set attribute value. No-op on non-element nodes.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if let NodeData::Element {
            attrs, id, classes, ..
        } = &mut self.data
        {
            if name == "id" {
                *id = Some(value.into());
            } else if name == "class" {
                *classes = split_classes(value);
            }

            match attrs.iter_mut().find(|a| a.name == name) {
                Some(attr) => attr.value = value.into(),
                None => attrs.push(Attribute::new(name, value)),
            }
        }
    }

    /// Check if element has a class.
    pub fn has_class(&self, class: &str) -> bool {
        self.element_classes().iter().any(|c| c == class)
    }

    /// Check if this is a void element (no closing tag).
    pub fn is_void_element(&self) -> bool {
        matches!(
            self.tag_name(),
            Some(
                "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link"
                    | "meta" | "source" | "track" | "wbr"
            )
        )
    }

    /// Check if node has children.
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            NodeData::Document => write!(f, "#document"),
            NodeData::Element { tag, .. } => write!(f, "<{}>", tag),
            NodeData::Text { content } => {
                if content.chars().count() > 20 {
                    let head: String = content.chars().take(20).collect();
                    write!(f, "\"{}...\"", head)
                } else {
                    write!(f, "\"{}\"", content)
                }
            }
        }
    }
}
