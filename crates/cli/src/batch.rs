// ABOUTME: Batch crawl driver: classifies a URL list, persists labels in batches, logs failures.
// ABOUTME: A failure for one URL is written to the error log and never stops the run.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pagekind::{Classifier, Label};

use crate::error::CrawlError;
use crate::fetch::PageSource;

/// Read the URL list: one entry per line, the URL is the first tab-separated column.
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read url list {}", path.display()))?;
    Ok(content
        .lines()
        .filter_map(|line| line.trim().split('\t').next())
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect())
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Buffers labels and appends them to the prediction file in batches.
pub struct PredictionSink {
    path: PathBuf,
    batch_size: usize,
    pending: Vec<(String, Label)>,
    written: usize,
}

impl PredictionSink {
    pub fn new(path: impl Into<PathBuf>, batch_size: usize) -> Self {
        Self {
            path: path.into(),
            batch_size: batch_size.max(1),
            pending: Vec::new(),
            written: 0,
        }
    }

    pub fn record(&mut self, url: &str, label: Label) {
        self.pending.push((url.to_string(), label));
    }

    /// Flush when `processed` URLs complete a batch.
    pub fn checkpoint(&mut self, processed: usize) -> io::Result<()> {
        if processed % self.batch_size == 0 {
            self.flush()?;
        }
        Ok(())
    }

    /// Append all pending labels as `url: label` lines.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let mut file = open_append(&self.path)?;
        for (url, label) in &self.pending {
            writeln!(file, "{}: {}", url, label)?;
        }
        self.written += self.pending.len();
        self.pending.clear();
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

/// Append-only log of failed URLs.
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append `url: stage<TAB>detail`.
    pub fn append(&self, url: &str, err: &CrawlError) -> io::Result<()> {
        let mut file = open_append(&self.path)?;
        writeln!(file, "{}: {}\t{}", url, err.stage(), err.detail())
    }
}

/// Counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub processed: usize,
    pub classified: usize,
    pub failed: usize,
}

/// Fetch, decode and classify one URL.
pub fn classify_url(
    source: &dyn PageSource,
    classifier: &Classifier,
    url: &str,
) -> Result<Label, CrawlError> {
    let html = source.fetch_html(url)?;
    Ok(classifier.classify(&html, url)?)
}

/// Classify every URL, flushing labels every batch and logging each failure.
pub fn run_batch(
    urls: &[String],
    source: &dyn PageSource,
    classifier: &Classifier,
    sink: &mut PredictionSink,
    errors: &ErrorLog,
) -> Result<BatchStats> {
    let mut stats = BatchStats::default();

    for url in urls {
        match classify_url(source, classifier, url) {
            Ok(label) => {
                tracing::debug!(%url, %label, "classified");
                sink.record(url, label);
                stats.classified += 1;
            }
            Err(err) => {
                tracing::warn!(%url, stage = err.stage(), error = %err.detail(), "url failed");
                errors
                    .append(url, &err)
                    .with_context(|| format!("failed to write error log {}", errors.path.display()))?;
                stats.failed += 1;
            }
        }

        stats.processed += 1;
        let before = sink.pending();
        sink.checkpoint(stats.processed)
            .with_context(|| format!("failed to write predictions {}", sink.path.display()))?;
        if before > 0 && sink.pending() == 0 {
            tracing::info!(processed = stats.processed, written = sink.written(), "batch saved");
        }
    }

    sink.flush()
        .with_context(|| format!("failed to write predictions {}", sink.path.display()))?;
    tracing::info!(
        processed = stats.processed,
        classified = stats.classified,
        failed = stats.failed,
        "batch run finished"
    );
    Ok(stats)
}
