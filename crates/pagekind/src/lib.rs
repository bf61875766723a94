// ABOUTME: Main library entry point for the pagekind list/content page classifier.
// ABOUTME: Re-exports the public API: Classifier, ClassifierBuilder, Label, Report, ClassifyError.

//! Pagekind - decides whether a rendered web page is a list page or a content page.
//!
//! The page is sanitized, walked depth-first into text and link nodes grouped
//! by tag path, scored with three kernel-weighted relational scores, and the
//! scores are compared by a fixed decision rule. A home-page URL adds a prior
//! in favour of list pages. Classification is pure: no I/O and no state is
//! kept between calls.
//!
//! # Example
//!
//! ```
//! use pagekind::{classify, Label};
//!
//! let html = "<article><p>A long enough paragraph of prose to read.</p></article>";
//! assert_eq!(classify(html, "").unwrap(), Label::ContentPage);
//! ```

pub mod classifier;
pub mod decision;
pub mod dom;
pub mod error;
pub mod kernel;
pub mod options;
pub mod result;
pub mod scoring;

pub use crate::classifier::Classifier;
pub use crate::decision::Label;
pub use crate::error::{ClassifyError, Result};
pub use crate::options::{ClassifierBuilder, Options};
pub use crate::result::{Report, ScoreTriple};

/// Classify a page with the default options.
pub fn classify(html: &str, url: &str) -> Result<Label> {
    Classifier::default().classify(html, url)
}

/// Score and classify a page with the default options.
pub fn analyze(html: &str, url: &str) -> Result<Report> {
    Classifier::default().analyze(html, url)
}
