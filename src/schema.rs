//! Search API response types.
//!
//! The search provider's JSON is loose: the result array may be called
//! `results` or `items`, `count` may be missing or oddly typed, and item fields may be
//! missing, `null`, or numbers. Everything is normalized here into one shape
//! before the rest of the crate sees it.

use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel the search provider uses for "no alternate part number".
pub const ALT_MPN_SENTINEL: &str = "N/A";

/// One part returned by the search API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResultItem {
    #[serde(deserialize_with = "lenient_string")]
    pub part_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub brand: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub mpn: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub alt_mpn: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub compatible_models: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub datasheet_url: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub image_url: Option<String>,
}

impl SearchResultItem {
    /// Alternate MPN, unless blank or the `N/A` sentinel (any case).
    pub fn alt_mpn_display(&self) -> Option<&str> {
        self.alt_mpn
            .as_deref()
            .map(str::trim)
            .filter(|alt| !alt.is_empty() && !alt.eq_ignore_ascii_case(ALT_MPN_SENTINEL))
    }
}

/// Accept strings, numbers and booleans; treat `null` as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Any JSON value as an item; non-objects become an empty item.
fn lenient_items<'de, D>(deserializer: D) -> Result<Option<Vec<SearchResultItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(value.map(|entries| {
        entries
            .into_iter()
            .map(|entry| {
                if entry.is_object() {
                    serde_json::from_value(entry).unwrap_or_default()
                } else {
                    SearchResultItem::default()
                }
            })
            .collect()
    }))
}

/// A non-negative whole number given as an integer, an integral float, or a
/// numeric string. Anything else is absent.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match &value {
        serde_json::Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    })
}

/// Wire shape, before normalization.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSearchResponse {
    #[serde(deserialize_with = "lenient_count")]
    count: Option<u64>,
    #[serde(deserialize_with = "lenient_items")]
    results: Option<Vec<SearchResultItem>>,
    #[serde(deserialize_with = "lenient_items")]
    items: Option<Vec<SearchResultItem>>,
}

/// Normalized search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResponse {
    pub count: u64,
    pub results: Vec<SearchResultItem>,
}

impl SearchResponse {
    pub fn empty() -> Self {
        Self::default()
    }
}

impl From<RawSearchResponse> for SearchResponse {
    fn from(raw: RawSearchResponse) -> Self {
        let results = raw
            .results
            .filter(|r| !r.is_empty())
            .or(raw.items)
            .unwrap_or_default();
        let count = raw.count.unwrap_or(results.len() as u64);
        Self { count, results }
    }
}

impl<'de> Deserialize<'de> for SearchResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawSearchResponse::deserialize(deserializer).map(Self::from)
    }
}
