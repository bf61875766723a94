// ABOUTME: Configuration options for the classifier including the home-page URL prior.
// ABOUTME: ClassifierBuilder provides a fluent API for constructing Classifier instances.

use crate::classifier::Classifier;

/// Bonus added to the link-link score when the page URL looks like a home page.
pub const DEFAULT_HOME_BONUS: f64 = 400.0;

/// URL paths treated as home/index pages.
pub const DEFAULT_HOME_PATHS: &[&str] = &["/", "/home/"];

/// Configuration options for the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub home_bonus: f64,
    pub home_paths: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            home_bonus: DEFAULT_HOME_BONUS,
            home_paths: DEFAULT_HOME_PATHS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Options {
    /// Returns true if `path` is one of the configured home paths.
    pub fn is_home_path(&self, path: &str) -> bool {
        self.home_paths.iter().any(|p| p == path)
    }
}

/// Builder for constructing Classifier instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ClassifierBuilder {
    opts: Options,
}

impl ClassifierBuilder {
    /// Create a new ClassifierBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the link-link bonus applied to home-page URLs.
    pub fn home_bonus(mut self, bonus: f64) -> Self {
        self.opts.home_bonus = bonus;
        self
    }

    /// Add a URL path that should receive the home-page bonus.
    pub fn home_path(mut self, path: impl Into<String>) -> Self {
        self.opts.home_paths.push(path.into());
        self
    }

    /// Replace the set of home-page URL paths.
    pub fn home_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opts.home_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Build the Classifier with the configured options.
    pub fn build(self) -> Classifier {
        Classifier::new(self.opts)
    }
}

impl Default for ClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}
