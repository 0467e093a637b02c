//! FoodFest DOM
//!
//! A small arena-backed Document Object Model for the page scripts: element
//! and text nodes, simple selectors, an element builder, and click / ready
//! event dispatch.

pub mod builder;
pub mod document;
pub mod events;
pub mod node;

pub use builder::Child;
pub use document::{Document, DomError};
pub use events::{Event, EventDispatcher, EventPhase, EventType};
pub use node::{Attribute, Node, NodeData, NodeId, NodeType};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{Child, Document, EventDispatcher, EventType, NodeId};
}
