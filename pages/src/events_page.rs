//! Events page
//!
//! Renders the selected event as a card into `#page`. The event comes from
//! local storage; anything missing falls back to placeholders.

use foodfest_dom::{Child, Document, EventDispatcher, NodeId};
use serde::{Deserialize, Serialize};

use crate::lorem::lorem_ipsum;
use crate::storage::WebStorage;
use crate::{require, Page, PageController, PageError};

/// Storage key holding the selected event.
pub const CURRENT_EVENT_KEY: &str = "currentEvent";

/// Image shown when an event has none.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/350x150";

/// Title used when nothing has been selected.
pub const PLACEHOLDER_TITLE: &str = "Title Placeholder";

/// Event stored under [`CURRENT_EVENT_KEY`]. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRecord {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl EventRecord {
    /// Record used when storage has no usable event.
    pub fn placeholder() -> Self {
        Self {
            title: Some(PLACEHOLDER_TITLE.to_string()),
            subtitle: Some(String::new()),
            description: Some(String::new()),
            image: None,
        }
    }
}

/// Empty strings count as absent.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Events page settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsPageConfig {
    /// Selector of the element the card is appended to
    pub container: String,
    /// Words of filler used for a missing description
    pub filler_words: usize,
    /// Image used for a missing image
    pub placeholder_image: String,
}

impl Default for EventsPageConfig {
    fn default() -> Self {
        Self {
            container: "#page".to_string(),
            filler_words: 100,
            placeholder_image: PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

/// Controller for `events.html`
pub struct EventsPage<'a> {
    storage: &'a WebStorage,
    config: EventsPageConfig,
}

impl<'a> EventsPage<'a> {
    pub fn new(storage: &'a WebStorage) -> Self {
        Self::with_config(storage, EventsPageConfig::default())
    }

    pub fn with_config(storage: &'a WebStorage, config: EventsPageConfig) -> Self {
        Self { storage, config }
    }

    /// The event to show, or the placeholder when none is stored.
    pub fn current_event(&self) -> EventRecord {
        self.storage
            .get_json::<EventRecord>(CURRENT_EVENT_KEY)
            .unwrap_or_else(EventRecord::placeholder)
    }

    /// Build the event card and append it to the container.
    ///
    /// Returns the card's outer `div.container`.
    pub fn render(&self, doc: &mut Document) -> Result<NodeId, PageError> {
        let page = require(doc, &self.config.container)?;
        let event = self.current_event();

        let image = present(&event.image).unwrap_or(self.config.placeholder_image.as_str());
        let description = match present(&event.description) {
            Some(text) => text.to_string(),
            None => lorem_ipsum(self.config.filler_words),
        };

        let img = doc.create_el("img", &[("class", "card-img-top"), ("src", image)], [])?;
        let title = doc.create_el(
            "h1",
            &[("class", "card-title")],
            [Child::from(present(&event.title).unwrap_or(""))],
        )?;
        let subtitle = doc.create_el(
            "h2",
            &[("class", "text-muted")],
            [Child::from(present(&event.subtitle).unwrap_or(""))],
        )?;
        let text = doc.create_el("p", &[("class", "card-text mt-3")], [Child::from(description)])?;
        let buy = doc.create_el(
            "a",
            &[("href", Page::Tickets.html()), ("class", "btn btn-primary")],
            [Child::from("Buy Tickets")],
        )?;
        let body = doc.create_el(
            "div",
            &[("class", "card-body")],
            [title, subtitle, text, buy].map(Child::from),
        )?;
        let card = doc.create_el("div", &[("class", "card mb-3")], [img, body].map(Child::from))?;
        let container = doc.create_el("div", &[("class", "container")], [Child::from(card)])?;

        doc.append_child(page, container)?;
        log::info!(
            "[FoodFest Pages] rendered event {:?}",
            present(&event.title).unwrap_or("")
        );
        Ok(container)
    }
}

impl PageController for EventsPage<'_> {
    fn page(&self) -> Page {
        Page::Events
    }

    fn on_ready(&self, doc: &mut Document, _events: &mut EventDispatcher) -> Result<(), PageError> {
        self.render(doc).map(|_| ())
    }
}
