//! Product record and discovery candidate structures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A discovered (url, title) pair awaiting detailed extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Absolute URL of the product page
    pub url: String,

    /// Title resolved from the listing page
    pub title: String,
}

/// A structured product record extracted from one product page.
///
/// Multi-valued lists are deduplicated and preserve first-occurrence
/// order; a named list that resolved to nothing is `None`, never an
/// empty list. Records are created once by the extractor and never
/// mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductRecord {
    /// Identifier derived from the URL's final path segment
    pub product_id: String,

    /// Product title
    pub title: String,

    /// Normalized product description
    pub description: String,

    /// Absolute URL of the main product image
    pub image_url: String,

    /// Full URL of the product page
    pub url: String,

    /// Price text, when a price rule matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    /// Link to a technical drawing, when declared and matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawing_url: Option<String>,

    /// Technical specifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<Vec<String>>,

    /// Product features
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,

    /// Product benefits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefits: Option<Vec<String>>,

    /// Application areas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applications: Option<Vec<String>>,

    /// Additional detail lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,

    /// Downloadable resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,

    /// Profile-declared custom fields
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ProductRecord {
        ProductRecord {
            product_id: "widget-2000".to_string(),
            title: "Widget 2000".to_string(),
            description: "A very good widget.".to_string(),
            image_url: "https://example.com/img/widget.jpg".to_string(),
            url: "https://example.com/products/widget-2000".to_string(),
            price: None,
            drawing_url: None,
            specifications: None,
            features: Some(vec!["Durable".to_string(), "Fast".to_string()]),
            benefits: None,
            applications: None,
            details: None,
            resources: None,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn test_empty_lists_are_omitted_from_json() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        assert!(json.contains("\"features\""));
        assert!(!json.contains("\"specifications\""));
        assert!(!json.contains("\"price\""));
        assert!(!json.contains("\"extra\""));
    }

    #[test]
    fn test_round_trips_custom_fields() {
        let mut record = sample_record();
        record
            .extra
            .insert("warranty".to_string(), vec!["2 years".to_string()]);
        let json = serde_json::to_string(&record).unwrap();
        let back: ProductRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
