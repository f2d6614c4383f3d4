//! Name and link normalization.
//!
//! Turns raw captures from the input markup into filesystem-safe file names
//! and resolved request URLs. Everything here is pure and deterministic, so
//! re-running extraction on the same input yields the same names (which is
//! what makes skip-if-exists resuming work).

mod combine;
mod sanitize;

pub use combine::combine_base_url;
pub use sanitize::{normalize_name, NamingRules};

/// Undo the HTML escaping that shows up in copied markup.
pub(crate) fn decode_entities(raw: &str) -> String {
    raw.replace("&amp;", "&")
}

/// Normalizes a captured link. Relative links stay relative; they are joined
/// with the base URL only when a request is made.
pub fn normalize_link(raw: &str) -> String {
    decode_entities(raw)
}
