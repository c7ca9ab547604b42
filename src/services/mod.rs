//! Service layer for the harvester application.
//!
//! This module contains the extraction engine proper:
//! - Product link discovery (`discover_links`)
//! - Field extraction (`extract_record`)
//! - Heading-associated content collection (`heading_associated_texts`)
//! - Record validation (`is_acceptable`)
//! - Request pacing (`PacingScheduler`)

mod discovery;
mod extractor;
pub mod headings;
mod pacing;
mod validator;

pub use discovery::discover_links;
pub use extractor::extract_record;
pub use headings::heading_associated_texts;
pub use pacing::{PaceContext, PacingScheduler, SessionIdentity};
pub use validator::is_acceptable;
