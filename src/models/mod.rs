// src/models/mod.rs

//! Domain models for the harvester application.
//!
//! This module contains all data structures used throughout the
//! application, organized by their primary purpose.

mod config;
mod product;
mod profile;

// Re-export all public types
pub use config::{CrawlConfig, CrawlStats};
pub use product::{Candidate, ProductRecord};
pub use profile::{
    DiscoveryRules, FieldRules, FilterPolicy, MultiValuedRule, NavigationPolicy, SiteProfile,
};
