//! Text normalization helpers
//!
//! Pure functions shared by the crawler, the structural parser and the
//! analyzer. Nothing in here touches the network or holds state.

mod clean;
mod sentences;

pub use clean::{clean_text, content_hash, title_case, truncate_chars};
pub use sentences::split_sentences;
