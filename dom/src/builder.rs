//! Element builder
//!
//! Builds a detached element from a tag name, attribute pairs and children in
//! one call, so page scripts never wire nodes together by hand.

use crate::document::{is_valid_tag_name, Document, DomError};
use crate::node::NodeId;

/// A child passed to [`Document::create_el`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    /// A previously built node
    Node(NodeId),
    /// Plain text, appended as a text node
    Text(String),
}

impl From<NodeId> for Child {
    fn from(id: NodeId) -> Self {
        Child::Node(id)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(text)
    }
}

impl Document {
    /// Create a detached element with `attrs` set and `children` appended in
    /// order.
    ///
    /// A repeated attribute name keeps the last value. Node children must
    /// exist and cannot be the document; otherwise nothing is created.
    ///
    /// ```
    /// use foodfest_dom::{Child, Document};
    ///
    /// let mut doc = Document::new();
    /// let title = doc.create_el("h1", &[("class", "card-title")], [Child::from("Taco Night")])?;
    /// let body = doc.create_el("div", &[("class", "card-body")], [Child::from(title)])?;
    /// assert_eq!(doc.to_html(body), "<div class=\"card-body\"><h1 class=\"card-title\">Taco Night</h1></div>");
    /// # Ok::<(), foodfest_dom::DomError>(())
    /// ```
    pub fn create_el<I>(
        &mut self,
        tag: &str,
        attrs: &[(&str, &str)],
        children: I,
    ) -> Result<NodeId, DomError>
    where
        I: IntoIterator<Item = Child>,
    {
        if !is_valid_tag_name(tag) {
            return Err(DomError::InvalidTagName(tag.to_string()));
        }

        // Check node children before anything is created or moved.
        let children: Vec<Child> = children.into_iter().collect();
        for child in &children {
            if let Child::Node(id) = child {
                let id = *id;
                let node = self.get(id).ok_or(DomError::NotFound(id))?;
                if node.is_document() {
                    return Err(DomError::HierarchyRequest {
                        parent: self.len(),
                        child: id,
                    });
                }
            }
        }

        let element = self.create_element(tag);
        for (name, value) in attrs {
            self.set_attribute(element, name, value);
        }

        for child in children {
            let child_id = match child {
                Child::Node(id) => id,
                Child::Text(text) => self.create_text(text),
            };
            self.append_child(element, child_id)?;
        }

        Ok(element)
    }
}
