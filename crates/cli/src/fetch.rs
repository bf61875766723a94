// ABOUTME: Page producer for the classifier: blocking HTTP fetch plus charset detection and decoding.
// ABOUTME: Maps transport failures to crawl stages and rejects bodies that do not decode cleanly.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::time::Duration;

use anyhow::Context;
use encoding_rs::Encoding;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::error::CrawlError;

const USER_AGENT: &str = concat!("pagekind/", env!("CARGO_PKG_VERSION"));

// Substrings of transport errors that point at the TLS layer.
const TLS_MARKERS: &[&str] = &["certificate", "tls", "ssl", "handshake"];

/// Source of decoded HTML for a URL.
pub trait PageSource {
    fn fetch_html(&self, url: &str) -> Result<String, CrawlError>;
}

/// Body and headers of a fetched page.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: u16,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Fetched {
    /// Decode the body using the Content-Type charset or detection.
    pub fn text(&self) -> Result<String, CrawlError> {
        decode_html(&self.body, self.content_type.as_deref())
    }
}

/// Blocking HTTP fetcher.
pub struct Fetcher {
    client: reqwest::blocking::Client,
}

impl Fetcher {
    /// Build a fetcher with a per-request timeout. `insecure` accepts invalid TLS certificates.
    pub fn new(timeout: Duration, insecure: bool) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .danger_accept_invalid_certs(insecure)
            .build()
            .context("failed to build http client")?;
        Ok(Self { client })
    }

    /// Fetch `url`. Non-2xx responses are returned like any other.
    pub fn fetch(&self, url: &str) -> Result<Fetched, CrawlError> {
        let parsed = Url::parse(url.trim()).map_err(|e| CrawlError::InvalidUrl(e.to_string()))?;
        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(CrawlError::InvalidUrl(format!(
                "unsupported scheme: {}",
                scheme
            )));
        }

        let response = self.client.get(parsed).send().map_err(transport_error)?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().map_err(transport_error)?;

        Ok(Fetched {
            status,
            final_url,
            content_type,
            body: body.to_vec(),
        })
    }
}

impl PageSource for Fetcher {
    fn fetch_html(&self, url: &str) -> Result<String, CrawlError> {
        let fetched = self.fetch(url)?;
        tracing::debug!(url, status = fetched.status, final_url = %fetched.final_url, "fetched");
        fetched.text()
    }
}

/// Classify a reqwest failure into a crawl stage.
fn transport_error(err: reqwest::Error) -> CrawlError {
    let message = error_chain(&err);
    if err.is_builder() {
        return CrawlError::InvalidUrl(message);
    }
    let lower = message.to_lowercase();
    if TLS_MARKERS.iter().any(|marker| lower.contains(marker)) {
        CrawlError::Tls(message)
    } else {
        CrawlError::Connection(message)
    }
}

/// Join an error and its sources into one line.
fn error_chain(err: &dyn StdError) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(inner) = source {
        parts.push(inner.to_string());
        source = inner.source();
    }
    parts.join(": ")
}

/// Decode HTML bytes to a String.
///
/// A byte-order mark wins, then the Content-Type charset, then chardetng
/// detection. Malformed sequences are an error rather than replaced.
pub fn decode_html(body: &[u8], content_type: Option<&str>) -> Result<String, CrawlError> {
    let (encoding, bom_len) = match Encoding::for_bom(body) {
        Some(found) => found,
        None => {
            let declared = content_type
                .and_then(extract_charset)
                .and_then(|charset| Encoding::for_label(charset.as_bytes()));
            (declared.unwrap_or_else(|| detect_encoding(body)), 0)
        }
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(&body[bom_len..])
        .map(Cow::into_owned)
        .ok_or_else(|| {
            CrawlError::Decode(format!("malformed {} byte sequence", encoding.name()))
        })
}

fn detect_encoding(body: &[u8]) -> &'static Encoding {
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    detector.guess(None, true)
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}
