// src/services/validator.rs

//! Record acceptance checks.
//!
//! Pure filtering against a profile's [`FilterPolicy`]; rejection is a
//! normal outcome, not an error. Any single failing check rejects.

use crate::models::{FilterPolicy, ProductRecord};
use crate::utils::contains_ci;

/// Decide whether an extracted record should be kept.
pub fn is_acceptable(record: &ProductRecord, filter: &FilterPolicy) -> bool {
    if record.description.chars().count() < filter.min_description_length {
        log::debug!(
            "Rejecting '{}': description shorter than {}",
            record.title,
            filter.min_description_length
        );
        return false;
    }

    if let Some(keyword) = filter
        .blocked_title_keywords
        .iter()
        .find(|k| contains_ci(&record.title, k))
    {
        log::debug!("Rejecting '{}': blocked title keyword '{keyword}'", record.title);
        return false;
    }

    if let Some(keyword) = filter
        .blocked_description_keywords
        .iter()
        .find(|k| contains_ci(&record.description, k))
    {
        log::debug!(
            "Rejecting '{}': blocked description keyword '{keyword}'",
            record.title
        );
        return false;
    }

    true
}
