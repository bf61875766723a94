// ABOUTME: Score triple and classification report returned by the classifier.
// ABOUTME: Both serialize with serde for machine-readable CLI output.

use serde::{Deserialize, Serialize};

use crate::decision::Label;

/// The three relational scores of one document.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreTriple {
    pub text_text: f64,
    pub link_link: f64,
    pub text_link: f64,
}

impl ScoreTriple {
    pub fn new(text_text: f64, link_link: f64, text_link: f64) -> Self {
        Self {
            text_text,
            link_link,
            text_link,
        }
    }

    /// The same scores with `bonus` added to the link-link score.
    pub fn with_link_bonus(self, bonus: f64) -> Self {
        Self {
            link_link: self.link_link + bonus,
            ..self
        }
    }
}

/// Everything the classifier computed for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub url: String,
    /// Scores before the URL prior.
    pub scores: ScoreTriple,
    /// Bonus added to the link-link score for the decision (0 when the URL is not a home page).
    pub url_prior: f64,
    pub text_nodes: usize,
    pub link_nodes: usize,
    pub label: Label,
}

impl Report {
    /// The scores the decision rule actually compared.
    pub fn decision_scores(&self) -> ScoreTriple {
        self.scores.with_link_bonus(self.url_prior)
    }
}
