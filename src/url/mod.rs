//! URL handling module for Docsift
//!
//! This module provides URL canonicalization, seed preparation and
//! same-domain filtering.

mod domain;
mod normalize;

pub use domain::{extract_domain, is_internal_link};
pub use normalize::{canonicalize, canonicalize_url, prepare_seed_url};
