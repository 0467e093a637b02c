//! Page bundles
//!
//! Each HTML shell loads one script bundle built from one entry script into
//! `dist/`. The service worker precaches the shells and bundles together.

/// Output directory for built bundles.
pub const OUTPUT_DIR: &str = "dist";

/// The site's pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Index,
    Events,
    Tickets,
    Schedule,
}

impl Page {
    /// Every page, in navigation order
    pub const ALL: [Page; 4] = [Page::Index, Page::Events, Page::Tickets, Page::Schedule];

    /// Bundle name (without extension)
    pub fn name(&self) -> &'static str {
        match self {
            Page::Index => "app",
            Page::Events => "events",
            Page::Tickets => "tickets",
            Page::Schedule => "schedule",
        }
    }

    /// HTML shell, relative to the site root
    pub fn html(&self) -> &'static str {
        match self {
            Page::Index => "index.html",
            Page::Events => "events.html",
            Page::Tickets => "tickets.html",
            Page::Schedule => "schedule.html",
        }
    }

    /// Entry script the bundle is built from
    pub fn entry(&self) -> &'static str {
        match self {
            Page::Index => "assets/js/script.js",
            Page::Events => "assets/js/events.js",
            Page::Tickets => "assets/js/tickets.js",
            Page::Schedule => "assets/js/schedule.js",
        }
    }

    /// Built bundle path, e.g. `dist/events.bundle.js`
    pub fn bundle(&self) -> String {
        format!("{}/{}.bundle.js", OUTPUT_DIR, self.name())
    }

    /// Look up a page by its HTML shell path. A leading `/` or `./` is ignored.
    pub fn from_html(path: &str) -> Option<Page> {
        let path = path
            .strip_prefix("./")
            .or_else(|| path.strip_prefix('/'))
            .unwrap_or(path);
        Page::ALL.into_iter().find(|page| page.html() == path)
    }
}
