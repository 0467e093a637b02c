//! Test fixtures and data factories
//!
//! Provides a scripted network and the page shells the controllers run in.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use foodfest_dom::{Child, Document, DomError, NodeId};
use foodfest_runtime::service_worker::{AssetManifest, NetworkError};
use foodfest_runtime::{Network, Request, Response};
use spin::{Mutex, RwLock};

/// Network double with a fixed route table and a call log.
///
/// Known URLs answer with their status and a body naming the URL; unknown
/// URLs answer 404. While offline every call fails as unreachable.
pub struct RecordingNetwork {
    routes: RwLock<BTreeMap<String, u16>>,
    online: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl RecordingNetwork {
    /// Online network with no routes
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(BTreeMap::new()),
            online: AtomicBool::new(true),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Online network serving every manifest entry with 200
    pub fn serving(manifest: &AssetManifest) -> Self {
        let network = Self::new();
        for url in manifest.iter() {
            network.route(url, 200);
        }
        network
    }

    /// Answer `url` with `status`
    pub fn route(&self, url: &str, status: u16) {
        self.routes.write().insert(url.to_string(), status);
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// URLs requested so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().clear();
    }

    /// Body served for `url`
    pub fn body_for(url: &str) -> Vec<u8> {
        format!("served {}", url).into_bytes()
    }
}

impl Default for RecordingNetwork {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Network for RecordingNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError> {
        self.calls.lock().push(request.url.clone());

        if !self.online.load(Ordering::SeqCst) {
            return Err(NetworkError::Unreachable(request.url.clone()));
        }

        let status = self.routes.read().get(&request.url).copied().unwrap_or(404);
        Ok(Response::new(status)
            .with_url(request.url.clone())
            .with_body(Self::body_for(&request.url)))
    }
}

/// Page shells, trimmed to the elements the page scripts touch
pub struct SiteFixtures;

impl SiteFixtures {
    /// `events.html`: a `main#page` under the body. Returns `#page`.
    pub fn events_page() -> Result<(Document, NodeId), DomError> {
        let mut doc = Document::new();
        let page = doc.create_el("main", &[("id", "page")], [])?;
        let body = doc.create_el("body", &[], [Child::from(page)])?;
        let root = doc.root();
        doc.append_child(root, body)?;
        Ok((doc, page))
    }

    /// `tickets.html`: the purchase modal. Returns `#purchaseBtn`.
    pub fn tickets_page() -> Result<(Document, NodeId), DomError> {
        let mut doc = Document::new();
        let label = doc.create_el("label", &[("for", "purchaseEmail")], [Child::from("Email")])?;
        let email = doc.create_el(
            "input",
            &[("id", "purchaseEmail"), ("type", "email"), ("class", "form-control")],
            [],
        )?;
        let body = doc.create_el("div", &[("class", "modal-body")], [label, email].map(Child::from))?;
        let button = doc.create_el(
            "button",
            &[("id", "purchaseBtn"), ("class", "btn btn-primary")],
            [Child::from("Purchase")],
        )?;
        let footer = doc.create_el("div", &[("class", "modal-footer")], [Child::from(button)])?;
        let content = doc.create_el(
            "div",
            &[("class", "modal-content")],
            [body, footer].map(Child::from),
        )?;
        let modal = doc.create_el("div", &[("class", "modal")], [Child::from(content)])?;
        let root = doc.root();
        doc.append_child(root, modal)?;
        Ok((doc, button))
    }
}
