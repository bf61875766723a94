// ABOUTME: Classifier tying sanitizer, walker, scoring and decision into one pure call.
// ABOUTME: Holds only immutable options; every call builds its own tree and node index.

use crate::decision::{self, Label};
use crate::dom;
use crate::error::Result;
use crate::options::{ClassifierBuilder, Options};
use crate::result::Report;
use crate::scoring;

/// Classifies pages as list pages or content pages.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    opts: Options,
}

impl Classifier {
    /// Create a new ClassifierBuilder for configuring the classifier.
    pub fn builder() -> ClassifierBuilder {
        ClassifierBuilder::new()
    }

    /// Create a new Classifier with the given options.
    pub fn new(opts: Options) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Score a page and decide its label.
    ///
    /// `url` is optional context (pass `""` when unknown); it only feeds the
    /// home-page prior.
    pub fn analyze(&self, html: &str, url: &str) -> Result<Report> {
        let doc = dom::sanitize(html)?;
        let index = dom::collect(&doc);
        let scores = scoring::score(&index);
        let url_prior = decision::url_prior(url, &self.opts);
        let label = decision::decide(&scores.with_link_bonus(url_prior));

        Ok(Report {
            url: url.to_string(),
            scores,
            url_prior,
            text_nodes: index.text_count(),
            link_nodes: index.link_count(),
            label,
        })
    }

    /// Decide whether a page is a list page or a content page.
    pub fn classify(&self, html: &str, url: &str) -> Result<Label> {
        self.analyze(html, url).map(|report| report.label)
    }
}
