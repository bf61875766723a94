// ABOUTME: DOM cleaning and traversal for page classification.
// ABOUTME: Sanitizes raw HTML and walks the cleaned tree into path-grouped text and link nodes.

//! DOM utilities for page classification.
//!
//! [`sanitize`] strips scripting, styling noise and unknown markup from raw
//! HTML and parses the result. [`walker::collect`] walks the cleaned tree and
//! groups text and link nodes by their slash-joined tag path.

pub mod sanitize;
pub mod walker;

pub use sanitize::sanitize;
pub use walker::{collect, LinkNode, NodeIndex, PathGroups, TextNode};

/// Normalize whitespace in text (XPath `normalize-space()` semantics).
pub fn normalize_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
