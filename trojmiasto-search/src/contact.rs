//! Contact deobfuscation against the site's ajax endpoint.

use trojmiasto_http::{PageResponse, RequestOpts};

use crate::resolver::{SearchClient, SearchError};

/// Fixed type discriminator the obfuscator expects for classifieds.
const OBFUSCATOR_TYPE: &str = "ogloszenia";

impl SearchClient {
    /// Decode an obfuscated contact detail.
    ///
    /// Carries the caller's session cookie, as obtained from
    /// [`trojmiasto_http::extract_cookie`] on a listing response. A non-2xx
    /// status is an expected operational condition: it is logged as a
    /// warning and surfaced as `Ok(None)`.
    pub fn decode_contact(
        &self,
        contact_hash: &str,
        cookie: &str,
    ) -> Result<Option<PageResponse>, SearchError> {
        let payload = [("hash", contact_hash), ("type", OBFUSCATOR_TYPE)];
        let opts = RequestOpts {
            headers: vec![(String::from("cookie"), cookie.to_string())],
            ..Default::default()
        };

        let response = self.http.post_form(&self.obfuscator_url, &payload, opts)?;
        if !response.is_success() {
            tracing::warn!(
                url = %self.obfuscator_url,
                status = response.status,
                "request failed"
            );
            return Ok(None);
        }
        Ok(Some(response))
    }
}
