// ABOUTME: Decision rule turning the three relational scores into a page label.
// ABOUTME: Applies the home-page URL prior to the link-link score before deciding.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::options::Options;
use crate::result::ScoreTriple;

/// The kind of page a document is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// A page dominated by links: index, category or search results.
    ListPage,
    /// A page dominated by prose: article, post or single item.
    ContentPage,
}

impl Label {
    pub fn is_list_page(&self) -> bool {
        *self == Label::ListPage
    }

    pub fn is_content_page(&self) -> bool {
        *self == Label::ContentPage
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Label::ListPage => "list page",
            Label::ContentPage => "content page",
        };
        write!(f, "{}", s)
    }
}

/// Path component of `url` as written, without query or fragment.
///
/// Nothing is normalized: `http://example.com` has the empty path, not `/`.
/// Scheme-less input counts only when it starts with `/` (a bare path or a
/// `//host/path` reference). Opaque URLs such as `mailto:` have no path.
pub fn url_path(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    let end = url.find(|c| c == '?' || c == '#').unwrap_or(url.len());
    let url = &url[..end];

    let rest = match Url::parse(url) {
        Ok(parsed) if parsed.cannot_be_a_base() => return None,
        Ok(parsed) => url.get(parsed.scheme().len() + 1..)?,
        Err(url::ParseError::RelativeUrlWithoutBase) if url.starts_with('/') => url,
        Err(_) => return None,
    };
    Some(strip_authority(rest).to_string())
}

fn strip_authority(rest: &str) -> &str {
    match rest.strip_prefix("//") {
        Some(after) => after.find('/').map_or("", |slash| &after[slash..]),
        None => rest,
    }
}

/// Bonus to add to the link-link score for `url` under `opts`.
pub fn url_prior(url: &str, opts: &Options) -> f64 {
    match url_path(url) {
        Some(path) if opts.is_home_path(&path) => opts.home_bonus,
        _ => 0.0,
    }
}

/// Decide the label from the scores, URL prior already applied.
///
/// When text-text falls between text-link and link-link the page is a content
/// page only if text-text outweighs the gap between the two link scores.
/// Otherwise text-text is compared with the mean of the link scores.
pub fn decide(scores: &ScoreTriple) -> Label {
    let ScoreTriple {
        text_text,
        link_link,
        text_link,
    } = *scores;

    if text_link <= text_text && text_text <= link_link {
        if link_link - text_link < text_text {
            Label::ContentPage
        } else {
            Label::ListPage
        }
    } else {
        let avg = (link_link + text_link) / 2.0;
        if avg > text_text {
            Label::ListPage
        } else {
            Label::ContentPage
        }
    }
}
