//! Tickets page
//!
//! Clicking `#purchaseBtn` swaps the purchase modal's body and footer for a
//! confirmation naming the email from `#purchaseEmail`.

use foodfest_dom::{Child, Document, EventDispatcher, EventType, NodeId};

use crate::{require, Page, PageController, PageError};

/// Controller for `tickets.html`
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketsPage;

/// Nodes captured when the page becomes ready.
#[derive(Debug, Clone, Copy)]
struct PurchaseModal {
    content: NodeId,
    body: NodeId,
    footer: NodeId,
    email: NodeId,
}

impl PurchaseModal {
    fn locate(doc: &Document) -> Result<Self, PageError> {
        let content = require(doc, ".modal-content")?;
        let in_modal = |selector: &str| {
            doc.query_selector_in(content, selector)
                .ok_or_else(|| PageError::MissingElement(selector.to_string()))
        };
        Ok(Self {
            content,
            body: in_modal(".modal-body")?,
            footer: in_modal(".modal-footer")?,
            email: require(doc, "#purchaseEmail")?,
        })
    }

    /// Replace body and footer with the confirmation.
    ///
    /// Does nothing once the initial body is gone, so repeated clicks leave
    /// one confirmation.
    fn confirm(&self, doc: &mut Document) -> Result<Option<NodeId>, PageError> {
        if doc.parent(self.body) != Some(self.content) {
            return Ok(None);
        }

        let email = doc.value(self.email).to_string();
        doc.remove_child(self.body);
        if doc.parent(self.footer) == Some(self.content) {
            doc.remove_child(self.footer);
        }

        let title = doc.create_el(
            "h5",
            &[("class", "modal-title")],
            [Child::from(confirmation_message(&email))],
        )?;
        let body = doc.create_el("div", &[("class", "modal-body")], [Child::from(title)])?;
        doc.append_child(self.content, body)?;
        log::info!("[FoodFest Pages] ticket purchase requested for {}", email);
        Ok(Some(body))
    }
}

/// Text shown after a purchase request.
pub fn confirmation_message(email: &str) -> String {
    format!(
        "Thanks for requesting a ticket purchase! We will send an email to {} to complete the order form!",
        email
    )
}

impl PageController for TicketsPage {
    fn page(&self) -> Page {
        Page::Tickets
    }

    fn on_ready(&self, doc: &mut Document, events: &mut EventDispatcher) -> Result<(), PageError> {
        let button = require(doc, "#purchaseBtn")?;
        let modal = PurchaseModal::locate(doc)?;

        events.add_listener(button, EventType::Click, move |doc, _| {
            if let Err(err) = modal.confirm(doc) {
                log::warn!("[FoodFest Pages] purchase confirmation failed: {}", err);
            }
        });
        Ok(())
    }
}
