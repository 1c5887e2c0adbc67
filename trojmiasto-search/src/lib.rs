//! Search-query construction and resolution for ogloszenia.trojmiasto.pl.
//!
//! - Filter model and form-payload encoding (`filters`)
//! - Listing-URL resolution through the site's search engine (`resolver`)
//! - Contact deobfuscation (`contact`)
//!
//! The encoder is pure; only [`SearchClient`] talks to the network, and it
//! does so with blocking, single-shot requests.

pub mod contact;
pub mod filters;
pub mod resolver;

pub use filters::{FilterSet, FilterValue, Payload, SearchQuery, build_payload, decode_offer_type};
pub use resolver::{SearchClient, SearchError};
