// ABOUTME: CLI binary that classifies web pages as list pages or content pages.
// ABOUTME: Classifies an HTML file, fetched URLs, or a URL list in batch mode with persisted results.

mod batch;
mod error;
mod fetch;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use pagekind::{Classifier, Report};
use tracing_subscriber::EnvFilter;

use crate::batch::{ErrorLog, PredictionSink};
use crate::error::CrawlError;
use crate::fetch::{decode_html, Fetcher};

#[derive(Parser, Debug)]
#[command(name = "pagekind")]
#[command(about = "Classify web pages as list pages or content pages")]
struct Args {
    /// HTML file to classify ("-" reads stdin)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// Source URL of the HTML file (enables the home-page prior)
    #[arg(long = "url")]
    url: Option<String>,

    /// URL list to crawl in batch mode: one URL per line, first tab-separated column
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Number of leading entries of the URL list to skip
    #[arg(long, default_value_t = 0)]
    skip: usize,

    /// Save predictions after this many URLs
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    batch_size: u64,

    /// Prediction file, appended to (default: <input stem>_predict.txt)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Error log, appended to (default: <input stem>_err_log.txt)
    #[arg(long = "error-log")]
    error_log: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 1.5)]
    timeout: f64,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Link-link bonus for home-page URLs
    #[arg(long, default_value_t = pagekind::options::DEFAULT_HOME_BONUS)]
    home_bonus: f64,

    /// Print the full report with scores as JSON
    #[arg(long = "json")]
    json_output: bool,

    /// URLs to fetch and classify
    #[arg()]
    urls: Vec<String>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Format reports as `url: label` lines or JSON.
fn format_output(reports: &[Report], json_output: bool) -> Result<String> {
    if json_output {
        let out = if reports.len() == 1 {
            serde_json::to_string_pretty(&reports[0])?
        } else {
            serde_json::to_string_pretty(reports)?
        };
        return Ok(out);
    }
    Ok(reports
        .iter()
        .map(|r| {
            if r.url.is_empty() {
                r.label.to_string()
            } else {
                format!("{}: {}", r.url, r.label)
            }
        })
        .collect::<Vec<_>>()
        .join("\n"))
}

fn read_html_file(path: &Path) -> Result<String> {
    let bytes = if path == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).context("failed to read stdin")?;
        buf
    } else {
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
    };
    Ok(decode_html(&bytes, None)?)
}

fn fetcher(args: &Args) -> Result<Fetcher> {
    let timeout = Duration::try_from_secs_f64(args.timeout).context("invalid --timeout")?;
    Fetcher::new(timeout, args.insecure)
}

/// Default output path next to the current directory, named after the input list.
fn sibling_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pagekind".to_string());
    PathBuf::from(format!("{}_{}", stem, suffix))
}

fn run_html(args: &Args, path: &Path, classifier: &Classifier) -> Result<bool> {
    let html = read_html_file(path)?;
    let url = args.url.as_deref().unwrap_or("");
    let report = classifier
        .analyze(&html, url)
        .map_err(CrawlError::from)
        .with_context(|| format!("error classifying {}", path.display()))?;
    println!("{}", format_output(&[report], args.json_output)?);
    Ok(true)
}

fn run_urls(args: &Args, classifier: &Classifier) -> Result<bool> {
    let fetcher = fetcher(args)?;
    let mut reports = Vec::new();
    let mut ok = true;

    for url in &args.urls {
        let result = fetcher
            .fetch(url)
            .and_then(|fetched| fetched.text())
            .and_then(|html| classifier.analyze(&html, url).map_err(CrawlError::from));
        match result {
            Ok(report) => reports.push(report),
            Err(err) => {
                eprintln!("error classifying {}: {}", url, err);
                ok = false;
            }
        }
    }

    if !reports.is_empty() {
        println!("{}", format_output(&reports, args.json_output)?);
    }
    Ok(ok)
}

fn run_batch(args: &Args, input: &Path, classifier: &Classifier) -> Result<bool> {
    let urls = batch::read_url_list(input)?;
    let urls = urls.get(args.skip..).unwrap_or_default();
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| sibling_path(input, "predict.txt"));
    let error_log = args
        .error_log
        .clone()
        .unwrap_or_else(|| sibling_path(input, "err_log.txt"));

    tracing::info!(urls = urls.len(), output = %output.display(), "starting batch run");
    let fetcher = fetcher(args)?;
    let mut sink = PredictionSink::new(output, args.batch_size as usize);
    let stats = batch::run_batch(urls, &fetcher, classifier, &mut sink, &ErrorLog::new(error_log))?;

    println!(
        "processed {} urls: {} classified, {} failed",
        stats.processed, stats.classified, stats.failed
    );
    Ok(true)
}

fn run(args: &Args) -> Result<bool> {
    let classifier = Classifier::builder().home_bonus(args.home_bonus).build();

    if let Some(path) = &args.html {
        run_html(args, path, &classifier)
    } else if let Some(input) = &args.input {
        run_batch(args, input, &classifier)
    } else {
        run_urls(args, &classifier)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let modes = [args.html.is_some(), args.input.is_some(), !args.urls.is_empty()];
    match modes.iter().filter(|m| **m).count() {
        0 => {
            eprintln!("error: provide --html FILE, --input LIST, or at least one URL");
            return ExitCode::from(1);
        }
        1 => {}
        _ => {
            eprintln!("error: --html, --input and positional URLs are mutually exclusive");
            return ExitCode::from(1);
        }
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(1)
        }
    }
}
