//! Product identifiers and the product data returned by the backend.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

const PRODUCT_BASE_URL: &str = "https://www.amazon.com/dp/";

fn product_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/dp/([A-Za-z0-9]{10})/").expect("product id pattern is valid"))
}

/// A 10-character alphanumeric product code, as found in `/dp/<code>/` URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductId(String);

impl ProductId {
    /// Extract the product code from a tab URL.
    ///
    /// Returns `None` when the URL has no `/dp/<10 alnum chars>/` segment.
    /// Nothing beyond the pattern match is validated.
    pub fn from_url(url: &str) -> Option<Self> {
        product_id_pattern()
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| ProductId(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical product page URL with tracking segments and query string dropped
    pub fn product_url(&self) -> String {
        format!("{}{}", PRODUCT_BASE_URL, self.0)
    }

    /// Query value sent to the backend; a missing id is passed through as `null`.
    pub fn query_value(id: Option<&ProductId>) -> &str {
        id.map(ProductId::as_str).unwrap_or("null")
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scraped product metadata from `/info`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

impl ProductInfo {
    /// Description followed by each feature, one entry per display line.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(description.to_string());
        }
        if let Some(features) = &self.features {
            lines.extend(features.iter().cloned());
        }
        lines
    }
}

/// Pros and cons digest from `/pros-cons`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProsCons {
    #[serde(default)]
    pub pros: Option<Vec<String>>,
    #[serde(default)]
    pub cons: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_id_from_product_url() {
        let url = "https://www.amazon.com/Echo-Dot/dp/B07XJ8C8F5/ref=sr_1_1?keywords=echo";
        let id = ProductId::from_url(url).unwrap();
        assert_eq!(id.as_str(), "B07XJ8C8F5");
    }

    #[test]
    fn test_lowercase_alnum_id_matches() {
        let id = ProductId::from_url("https://example.com/dp/abc123xyz0/").unwrap();
        assert_eq!(id.as_str(), "abc123xyz0");
    }

    #[test]
    fn test_non_matching_urls() {
        assert_eq!(ProductId::from_url("https://www.amazon.com/gp/cart/view.html"), None);
        // no trailing slash after the code
        assert_eq!(ProductId::from_url("https://www.amazon.com/dp/B07XJ8C8F5"), None);
        // too short
        assert_eq!(ProductId::from_url("https://www.amazon.com/dp/B07XJ8/"), None);
        // non-alphanumeric character inside the code
        assert_eq!(ProductId::from_url("https://www.amazon.com/dp/B07-J8C8F5/"), None);
        assert_eq!(ProductId::from_url(""), None);
    }

    #[test]
    fn test_product_url_is_canonical() {
        let id = ProductId::from_url("https://www.amazon.com/x/dp/B07XJ8C8F5/ref=abc?th=1").unwrap();
        assert_eq!(id.product_url(), "https://www.amazon.com/dp/B07XJ8C8F5");
    }

    #[test]
    fn test_query_value_passes_null_through() {
        let id = ProductId::from_url("https://www.amazon.com/dp/B07XJ8C8F5/").unwrap();
        assert_eq!(ProductId::query_value(Some(&id)), "B07XJ8C8F5");
        assert_eq!(ProductId::query_value(None), "null");
    }

    #[test]
    fn test_summary_lines() {
        let info = ProductInfo {
            title: "Echo Dot".to_string(),
            description: Some("Smart speaker".to_string()),
            features: Some(vec!["Alexa".to_string(), "Compact".to_string()]),
        };
        assert_eq!(info.summary_lines(), vec!["Smart speaker", "Alexa", "Compact"]);

        let bare: ProductInfo = serde_json::from_str(r#"{"title": "Echo Dot"}"#).unwrap();
        assert!(bare.summary_lines().is_empty());
    }
}
