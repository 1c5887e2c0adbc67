//! Minimal blocking HTTP transport for the trojmiasto scraper.
//!
//! - [`HttpClient`]: thin wrapper over `reqwest::blocking` with per-request
//!   headers and timeout
//! - [`PageResponse`]: materialized response (status, headers, body) that can
//!   be persisted by the cache
//! - [`Fetcher`]: GET with the warn-and-return-`None` policy for non-2xx
//!   statuses, optionally backed by a filesystem [`cache::ResponseCache`]
//! - [`extract_cookie`]: pull the `name=value` pair out of `Set-Cookie`
//!
//! Every operation issues at most one outbound call and blocks until it
//! completes or fails; there is no retry machinery. Structured `tracing`
//! events are emitted for request start, response status, and failures.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod cache;

pub use cache::ResponseCache;

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("client build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("missing expected header: {0}")]
    MissingHeader(&'static str),
}

// ==============================
// Response
// ==============================

/// A fully materialized HTTP response.
///
/// Header names are stored lowercased as reqwest yields them; duplicates
/// (e.g. repeated `set-cookie`) are preserved in arrival order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse {
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl PageResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header with the given name, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Session cookie from a response's `Set-Cookie` header.
///
/// Returns only the first semicolon-delimited segment (the `name=value`
/// pair), discarding attributes such as path, domain, and expiry. A missing
/// header is a structural error: it means the site stopped handing out
/// sessions the way the scraper expects.
///
/// ```
/// use trojmiasto_http::{PageResponse, extract_cookie};
///
/// let response = PageResponse {
///     url: "http://ogloszenia.trojmiasto.pl/".into(),
///     status: 200,
///     headers: vec![("set-cookie".into(), "sid=abc123; Path=/; HttpOnly".into())],
///     body: String::new(),
/// };
/// assert_eq!(extract_cookie(&response).unwrap(), "sid=abc123");
/// ```
pub fn extract_cookie(response: &PageResponse) -> Result<String, HttpError> {
    let raw = response
        .header("set-cookie")
        .ok_or(HttpError::MissingHeader("set-cookie"))?;
    Ok(raw.split(';').next().unwrap_or(raw).to_string())
}

// ==============================
// Request options
// ==============================

/// Per-request tuning knobs for the HTTP client.
#[derive(Clone, Debug, Default)]
pub struct RequestOpts {
    pub timeout: Option<Duration>,
    /// Extra request headers, e.g. `("cookie", session)`.
    pub headers: Vec<(String, String)>,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client with the stock connect timeout.
    pub fn new() -> Result<Self, HttpError> {
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            default_timeout: Duration::from_secs(15),
        })
    }

    /// Override the default per-request timeout.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Blocking GET returning the materialized response, whatever its status.
    pub fn get(&self, url: &str, opts: RequestOpts) -> Result<PageResponse, HttpError> {
        let url = Url::parse(url).map_err(|e| HttpError::Url(e.to_string()))?;
        let rb = self.inner.get(url.clone());
        self.send(rb, url, "GET", opts)
    }

    /// Blocking form-encoded POST returning the materialized response.
    ///
    /// The form may contain repeated keys; pass a slice of pairs to keep
    /// order and duplicates intact.
    pub fn post_form<F>(&self, url: &str, form: &F, opts: RequestOpts) -> Result<PageResponse, HttpError>
    where
        F: Serialize + ?Sized,
    {
        let url = Url::parse(url).map_err(|e| HttpError::Url(e.to_string()))?;
        let rb = self.inner.post(url.clone()).form(form);
        self.send(rb, url, "POST", opts)
    }

    fn send(
        &self,
        mut rb: reqwest::blocking::RequestBuilder,
        url: Url,
        method: &'static str,
        opts: RequestOpts,
    ) -> Result<PageResponse, HttpError> {
        rb = rb.timeout(opts.timeout.unwrap_or(self.default_timeout));
        for (name, value) in &opts.headers {
            rb = rb.header(name.as_str(), value.as_str());
        }

        tracing::debug!(
            method,
            host_path = %format!("{}{}", url.domain().unwrap_or("-"), url.path()),
            "http.request.start"
        );

        let t0 = std::time::Instant::now();
        let resp = rb.send().map_err(|e| HttpError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let final_url = resp.url().to_string();
        let headers = resp
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).to_string(),
                )
            })
            .collect();
        let body = resp.text().map_err(|e| HttpError::Network(e.to_string()))?;

        tracing::debug!(
            method,
            url = %final_url,
            status,
            duration_ms = t0.elapsed().as_millis() as u64,
            body_len = body.len(),
            "http.response"
        );

        Ok(PageResponse {
            url: final_url,
            status,
            headers,
            body,
        })
    }
}

// ==============================
// Fetcher
// ==============================

/// GET with the scraper's recoverable-failure policy and optional caching.
///
/// A non-2xx status is an expected operational condition: it is logged as a
/// warning and surfaced as `Ok(None)`. Transport failures still propagate as
/// [`HttpError`]. The cache is advisory; a hit short-circuits the network
/// call and a failed write never fails the fetch.
pub struct Fetcher {
    client: HttpClient,
    cache: Option<ResponseCache>,
}

impl Fetcher {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            cache: None,
        }
    }

    /// Attach a response cache (debug-mode runs).
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn fetch(&self, url: &str) -> Result<Option<PageResponse>, HttpError> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.load(url) {
                tracing::debug!(url, "serving response from cache");
                return Ok(Some(hit));
            }
        }

        let response = self.client.get(url, RequestOpts::default())?;
        if !response.is_success() {
            tracing::warn!(url, status = response.status, "request failed");
            return Ok(None);
        }

        if let Some(cache) = &self.cache {
            cache.store(url, &response);
        }
        Ok(Some(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with_headers(headers: Vec<(String, String)>) -> PageResponse {
        PageResponse {
            url: "http://ogloszenia.trojmiasto.pl/".into(),
            status: 200,
            headers,
            body: String::new(),
        }
    }

    #[test]
    fn cookie_keeps_only_name_value_pair() {
        let response = response_with_headers(vec![(
            "set-cookie".into(),
            "sid=abc123; Path=/; HttpOnly".into(),
        )]);
        assert_eq!(extract_cookie(&response).unwrap(), "sid=abc123");
    }

    #[test]
    fn cookie_without_attributes_passes_through() {
        let response = response_with_headers(vec![("Set-Cookie".into(), "sid=abc123".into())]);
        assert_eq!(extract_cookie(&response).unwrap(), "sid=abc123");
    }

    #[test]
    fn missing_set_cookie_is_an_error() {
        let response = response_with_headers(vec![]);
        assert!(matches!(
            extract_cookie(&response),
            Err(HttpError::MissingHeader("set-cookie"))
        ));
    }

    #[test]
    fn header_lookup_is_case_insensitive_and_first_wins() {
        let response = response_with_headers(vec![
            ("set-cookie".into(), "first=1".into()),
            ("set-cookie".into(), "second=2".into()),
        ]);
        assert_eq!(response.header("Set-Cookie"), Some("first=1"));
    }

    #[test]
    fn status_classes() {
        let mut response = response_with_headers(vec![]);
        assert!(response.is_success());
        response.status = 404;
        assert!(!response.is_success());
        response.status = 299;
        assert!(response.is_success());
    }
}
