//! Resolve category/region/filter combinations into listing URLs.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use thiserror::Error;
use trojmiasto_common::{OBFUSCATOR_URL, SEARCH_URL};
use trojmiasto_http::{HttpClient, HttpError, RequestOpts};

use crate::filters::{FilterSet, SearchQuery, build_payload};

static ALTERNATE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[rel="alternate"]"#).expect("static selector parses"));

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Http(#[from] HttpError),
    /// The search response markup no longer carries the canonical alternate
    /// link, meaning the site's markup contract changed.
    #[error("search response carries no canonical alternate link")]
    AlternateLinkMissing,
}

/// Client for the site's search engine and obfuscator endpoints.
#[derive(Clone)]
pub struct SearchClient {
    pub(crate) http: HttpClient,
    search_url: String,
    pub(crate) obfuscator_url: String,
}

impl SearchClient {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            search_url: SEARCH_URL.to_string(),
            obfuscator_url: OBFUSCATOR_URL.to_string(),
        }
    }

    /// Point the client at a different search endpoint (tests).
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    /// Point the client at a different obfuscator endpoint (tests).
    pub fn with_obfuscator_url(mut self, url: impl Into<String>) -> Self {
        self.obfuscator_url = url.into();
        self
    }

    /// Listing URL for the given category, region, and filters.
    ///
    /// Filterless queries are answered locally with a direct path. Anything
    /// else round-trips through the search engine: the form payload is
    /// POSTed and the response page's canonical alternate link carries the
    /// resolved URL, which is rewritten from its mobile form to the desktop
    /// one.
    pub fn resolve_url(
        &self,
        category: &str,
        region: Option<&str>,
        filters: &FilterSet,
    ) -> Result<String, SearchError> {
        match build_payload(category, region, filters) {
            SearchQuery::Direct(url) => Ok(url),
            SearchQuery::Form(payload) => {
                tracing::debug!(category, ?region, entries = payload.len(), "resolving via search engine");
                let response =
                    self.http
                        .post_form(&self.search_url, &payload, RequestOpts::default())?;
                desktop_url_from_html(&response.body)
            }
        }
    }
}

/// Pull the alternate-link `href` out of a search response and rewrite the
/// mobile-site marker `/m.` to `/`.
fn desktop_url_from_html(html: &str) -> Result<String, SearchError> {
    let document = Html::parse_document(html);
    let href = document
        .select(&ALTERNATE_LINK)
        .next()
        .and_then(|element| element.value().attr("href"))
        .ok_or(SearchError::AlternateLinkMissing)?;
    Ok(href.replace("/m.", "/"))
}
