//! Utility functions and helpers.

pub mod text;
pub mod url;

pub use text::{clamp_sentences, collapse_whitespace, contains_ci};
pub use url::{is_placeholder_image, product_id_from_url, resolve};
