//! FoodFest page scripts
//!
//! Each HTML shell loads exactly one script bundle; the controllers here are
//! what those bundles do once the page is ready. They read local state, build
//! DOM with the element builder and never touch the network.

pub mod bundle;
pub mod events_page;
pub mod lorem;
pub mod storage;
pub mod tickets_page;

pub use bundle::Page;
pub use events_page::{EventRecord, EventsPage, EventsPageConfig};
pub use lorem::lorem_ipsum;
pub use storage::{StorageError, WebStorage};
pub use tickets_page::TicketsPage;

use foodfest_dom::{Document, DomError, EventDispatcher};
use thiserror::Error;

/// Page controller errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// An element the page markup must provide is absent
    #[error("required element not found: {0}")]
    MissingElement(String),
    /// Element construction failed
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Script run by one page once its document is ready.
pub trait PageController {
    /// Page this controller belongs to
    fn page(&self) -> Page;

    /// Run the page-ready logic
    fn on_ready(&self, doc: &mut Document, events: &mut EventDispatcher) -> Result<(), PageError>;
}

/// Resolve a selector or report which one is missing.
pub(crate) fn require(doc: &Document, selector: &str) -> Result<foodfest_dom::NodeId, PageError> {
    doc.query_selector(selector)
        .ok_or_else(|| PageError::MissingElement(selector.to_string()))
}
