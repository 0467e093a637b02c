//! E2E Test: Site pages
//!
//! Tests the page scripts against realistic shells, and that every page the
//! site ships can load while offline.

use foodfest_dom::{EventDispatcher, EventType};
use foodfest_e2e_tests::{OfflineSite, SiteFixtures};
use foodfest_pages::events_page::{CURRENT_EVENT_KEY, PLACEHOLDER_IMAGE, PLACEHOLDER_TITLE};
use foodfest_pages::tickets_page::confirmation_message;
use foodfest_pages::{
    lorem_ipsum, EventRecord, EventsPage, EventsPageConfig, Page, PageController, TicketsPage,
    WebStorage,
};
use foodfest_runtime::{CacheConfig, Request};

#[test]
fn test_every_page_is_precached() {
    let manifest = CacheConfig::default().manifest;
    for page in Page::ALL {
        let html = format!("/{}", page.html());
        let bundle = format!("/{}", page.bundle());
        assert!(manifest.contains(&html), "{} missing from manifest", html);
        assert!(manifest.contains(&bundle), "{} missing from manifest", bundle);
    }
}

#[tokio::test]
async fn test_pages_load_offline() {
    let config = CacheConfig::default();
    let site = OfflineSite::serving(&config.manifest);
    let host = site.deploy(config).await.ok().unwrap();
    site.network.set_online(false);

    for page in Page::ALL {
        for url in [format!("/{}", page.html()), format!("/{}", page.bundle())] {
            let response = host.fetch(Request::new(url.clone())).await;
            assert!(response.is_ok(), "{} unavailable offline", url);
        }
    }
}

#[test]
fn test_events_page_renders_selected_event() {
    let mut storage = WebStorage::new("https://foodfest.example");
    let record = EventRecord {
        title: Some("BBQ Brawl".to_string()),
        subtitle: Some("Saturday <noon>".to_string()),
        description: Some("Smoke & fire.".to_string()),
        image: None,
    };
    storage.set_json(CURRENT_EVENT_KEY, &record).unwrap();

    let (mut doc, _) = SiteFixtures::events_page().unwrap();
    let page = EventsPage::new(&storage);
    page.on_ready(&mut doc, &mut EventDispatcher::new()).unwrap();

    let container = doc.query_selector(".container").unwrap();
    assert_eq!(
        doc.to_html(container),
        format!(
            "<div class=\"container\"><div class=\"card mb-3\">\
             <img class=\"card-img-top\" src=\"{}\">\
             <div class=\"card-body\">\
             <h1 class=\"card-title\">BBQ Brawl</h1>\
             <h2 class=\"text-muted\">Saturday &lt;noon&gt;</h2>\
             <p class=\"card-text mt-3\">Smoke &amp; fire.</p>\
             <a href=\"tickets.html\" class=\"btn btn-primary\">Buy Tickets</a>\
             </div></div></div>",
            PLACEHOLDER_IMAGE
        )
    );
}

#[test]
fn test_events_page_without_selection() {
    let storage = WebStorage::new("https://foodfest.example");
    let (mut doc, page) = SiteFixtures::events_page().unwrap();

    EventsPage::new(&storage).render(&mut doc).unwrap();

    assert_eq!(doc.children(page).len(), 1);
    let title = doc.query_selector(".card-title").unwrap();
    let subtitle = doc.query_selector(".text-muted").unwrap();
    let text = doc.query_selector(".card-text").unwrap();
    assert_eq!(doc.text_content(title), PLACEHOLDER_TITLE);
    assert_eq!(doc.text_content(subtitle), "");
    assert_eq!(doc.text_content(text), lorem_ipsum(100));
}

#[test]
fn test_events_page_filler_length_is_configurable() {
    let storage = WebStorage::new("https://foodfest.example");
    let (mut doc, _) = SiteFixtures::events_page().unwrap();
    let config = EventsPageConfig {
        filler_words: 7,
        ..EventsPageConfig::default()
    };

    EventsPage::with_config(&storage, config).render(&mut doc).unwrap();

    let text = doc.query_selector(".card-text").unwrap();
    assert_eq!(doc.text_content(text).split_whitespace().count(), 7);
}

#[test]
fn test_ticket_purchase_flow() {
    let (mut doc, button) = SiteFixtures::tickets_page().unwrap();
    let mut events = EventDispatcher::new();
    TicketsPage.on_ready(&mut doc, &mut events).unwrap();

    let email = doc.get_element_by_id("purchaseEmail").unwrap();
    doc.set_value(email, "guest@foodfest.example");
    events.dispatch(&mut doc, button, EventType::Click);

    let content = doc.query_selector(".modal-content").unwrap();
    let children = doc.child_elements(content);
    assert_eq!(children.len(), 1);
    let title = doc.query_selector(".modal-title").unwrap();
    assert_eq!(
        doc.text_content(title),
        confirmation_message("guest@foodfest.example")
    );
    assert!(doc.get_element_by_id("purchaseBtn").is_none());
}
