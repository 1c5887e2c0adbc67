//! Filter model and form-payload encoding for the search engine.
//!
//! The encoder maps a category, an optional region, and an ordered filter
//! set into either a direct listing URL (when no filters apply) or the flat
//! key-value payload the search form expects. Keys may repeat (a ranged
//! filter contributes one entry per bound), so the payload is a plain
//! ordered sequence, never a map.

use trojmiasto_common::BASE_URL;

/// Fixed category identifier seeded into every search payload.
const SEARCH_CATEGORY_ID: &str = "104";

/// Filter name carrying the symbolic offer type.
pub const OFFER_TYPE_FIELD: &str = "offer_type";

/// Short form-field name the search engine expects for the offer type.
const OFFER_TYPE_FORM_KEY: &str = "wi";

/// Filter name restricting results to recently added listings.
pub const DATE_ADDED_FIELD: &str = "data_wprow";

/// Accepted recency codes: 1 day, 3 days, 1 week, 3 weeks.
pub const DATE_ADDED_CODES: [&str; 4] = ["1d", "3d", "1w", "3w"];

/// Ordered form payload; repeated keys are significant.
pub type Payload = Vec<(String, String)>;

/// A single filter value: a scalar, or an inclusive range of bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Value(String),
    Range { min: Option<i64>, max: Option<i64> },
}

impl FilterValue {
    pub fn value(v: impl Into<String>) -> Self {
        Self::Value(v.into())
    }

    pub fn range(min: Option<i64>, max: Option<i64>) -> Self {
        Self::Range { min, max }
    }
}

/// Insertion-ordered set of named filters.
///
/// ```
/// use trojmiasto_search::{FilterSet, FilterValue};
///
/// let filters = FilterSet::new()
///     .with("offer_type", FilterValue::value("Dom"))
///     .with("cena", FilterValue::range(Some(1000), Some(2500)));
/// assert_eq!(filters.iter().count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    entries: Vec<(String, FilterValue)>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, name: impl Into<String>, value: FilterValue) {
        self.entries.push((name.into(), value));
    }

    pub fn with(mut self, name: impl Into<String>, value: FilterValue) -> Self {
        self.push(name, value);
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, FilterValue)> {
        self.entries.iter()
    }
}

/// Encoder output: either a URL answerable without the search engine, or the
/// form payload to submit to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Direct(String),
    Form(Payload),
}

/// Integer code for a symbolic offer type name.
///
/// Unknown names map to 0, which the search engine treats as "any".
pub fn decode_offer_type(name: &str) -> u32 {
    match name {
        "Mieszkanie" => 100,     // flat
        "Pokoj" => 395,          // room
        "Biuro" => 400,          // office
        "Dom" => 200,            // house
        "Blizniak" => 230,       // semi-detached house
        "Kamienica" => 250,      // tenement house
        "Pietrowy" => 260,       // storey house
        "Rekreacyjny" => 220,    // leisure house
        "Szeregowy" => 240,      // terraced house
        "Wolnostojacy" => 210,   // detached house
        "Lokal usługowy" => 450, // service area
        _ => 0,
    }
}

/// Encode a category, optional region, and filters into a [`SearchQuery`].
///
/// With no filters the result is a direct listing URL and no remote call is
/// ever needed. Otherwise the payload is seeded with the category identifier
/// (and region, when given) and each filter is encoded in insertion order:
/// ranges emit one entry per present bound with a missing lower bound
/// normalized to 0, the offer type is translated to its integer code under
/// the short key, and recency filters outside [`DATE_ADDED_CODES`] are
/// silently dropped.
pub fn build_payload(category: &str, region: Option<&str>, filters: &FilterSet) -> SearchQuery {
    if filters.is_empty() {
        let mut url = format!("{BASE_URL}/{category}/");
        if let Some(region) = region {
            url.push_str(&format!("s,{region}.html"));
        }
        return SearchQuery::Direct(url);
    }

    let mut payload: Payload = vec![(String::from("id_kat"), SEARCH_CATEGORY_ID.to_string())];
    if let Some(region) = region {
        payload.push((String::from("s"), region.to_string()));
    }

    for (name, value) in filters.iter() {
        match value {
            FilterValue::Range { min, max } => {
                payload.push((name.clone(), min.unwrap_or(0).to_string()));
                if let Some(max) = max {
                    payload.push((name.clone(), max.to_string()));
                }
            }
            FilterValue::Value(v) if name == OFFER_TYPE_FIELD => {
                payload.push((
                    OFFER_TYPE_FORM_KEY.to_string(),
                    decode_offer_type(v).to_string(),
                ));
            }
            FilterValue::Value(v) if name == DATE_ADDED_FIELD => {
                if DATE_ADDED_CODES.contains(&v.as_str()) {
                    payload.push((name.clone(), v.clone()));
                } else {
                    tracing::debug!(value = %v, "dropping unrecognized recency filter");
                }
            }
            FilterValue::Value(v) => payload.push((name.clone(), v.clone())),
        }
    }

    SearchQuery::Form(payload)
}
