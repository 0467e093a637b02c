//! Fetch Event Handling
//!
//! Request/response types, the live network seam, and the fetch event a host
//! hands to the worker for every intercepted request.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use super::ServiceWorkerError;

/// HTTP request method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl RequestMethod {
    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }
}

/// Fetch request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Request URL, used verbatim as the cache key
    pub url: String,
    /// HTTP method
    pub method: RequestMethod,
    /// Request headers
    pub headers: BTreeMap<String, String>,
}

impl Request {
    /// Create a GET request
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: RequestMethod::Get,
            headers: BTreeMap::new(),
        }
    }

    /// Set the method
    pub fn with_method(mut self, method: RequestMethod) -> Self {
        self.method = method;
        self
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Fetch response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Final URL
    pub url: String,
    /// Status code
    pub status: u16,
    /// Status text
    pub status_text: String,
    /// Response headers
    pub headers: BTreeMap<String, String>,
    /// Response body
    pub body: Option<Vec<u8>>,
}

impl Response {
    /// Create a new response
    pub fn new(status: u16) -> Self {
        Self {
            url: String::new(),
            status,
            status_text: status_text_for(status).to_string(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Set the final URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Check if response is OK
    pub fn ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Size of the body plus headers, used for quota accounting
    pub fn size(&self) -> usize {
        let headers: usize = self.headers.iter().map(|(k, v)| k.len() + v.len()).sum();
        self.body.as_ref().map(|b| b.len()).unwrap_or(0) + headers
    }
}

/// Get status text for status code
fn status_text_for(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}

/// Failure reported by the network layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// Host could not be reached (offline, DNS, refused)
    #[error("network unreachable: {0}")]
    Unreachable(String),
    /// Request timed out
    #[error("request timed out: {0}")]
    Timeout(String),
    /// Request was aborted by the host
    #[error("request aborted: {0}")]
    Aborted(String),
}

/// Live network access.
///
/// Non-2xx statuses are successful fetches; only transport failures are
/// reported as errors.
#[async_trait]
pub trait Network: Send + Sync {
    /// Perform a live fetch
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError>;
}

/// Outcome handed back to the requesting page
pub type FetchResult = Result<Response, ServiceWorkerError>;

/// Fetch event
#[derive(Debug)]
pub struct FetchEvent {
    /// Request
    request: Request,
    /// Whether respond_with was called
    responded: bool,
    /// Response (if respond_with was called)
    response: Option<FetchResult>,
}

impl FetchEvent {
    /// Create a new fetch event
    pub fn new(request: Request) -> Self {
        Self {
            request,
            responded: false,
            response: None,
        }
    }

    /// Get the request
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Check if respond_with was called
    pub fn responded(&self) -> bool {
        self.responded
    }

    /// Respond with a result. Only the first call takes effect.
    pub fn respond_with(&mut self, response: FetchResult) {
        if !self.responded {
            self.responded = true;
            self.response = Some(response);
        }
    }

    /// Take the response
    pub fn take_response(&mut self) -> Option<FetchResult> {
        self.response.take()
    }
}
