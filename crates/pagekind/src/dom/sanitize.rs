// ABOUTME: HTML sanitizer that removes scripting, styling noise and unknown markup before the walk.
// ABOUTME: Builds an ammonia policy that keeps the style attribute so hidden blocks stay detectable.

use std::collections::{HashMap, HashSet};

use html5ever::driver::{self, ParseOpts};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use scraper::{Html, HtmlTreeSink};

use crate::error::{ClassifyError, Result};

// Standard HTML vocabulary. Anything else is unwrapped into its parent.
const HTML_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "address", "applet", "area", "article", "aside", "audio", "b",
    "base", "basefont", "bdi", "bdo", "big", "blink", "blockquote", "body", "br", "button",
    "canvas", "caption", "center", "cite", "code", "col", "colgroup", "command", "datalist",
    "dd", "del", "details", "dfn", "dialog", "dir", "div", "dl", "dt", "em", "embed",
    "fieldset", "figcaption", "figure", "font", "footer", "form", "frame", "frameset", "h1",
    "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe",
    "img", "input", "ins", "isindex", "kbd", "keygen", "label", "layer", "legend", "li",
    "link", "map", "mark", "marquee", "menu", "meta", "meter", "multicol", "nav",
    "nobr", "noembed", "noframes", "nolayer", "noscript", "object", "ol", "optgroup",
    "option", "output", "p", "param", "plaintext", "pre", "progress", "q", "rb", "rp", "rt",
    "ruby", "s", "samp", "script", "section", "select", "small", "sound", "source", "spacer",
    "span", "strike", "strong", "style", "sub", "summary", "sup", "table", "tbody",
    "td", "textarea", "tfoot", "th", "thead", "time", "title", "tr", "track", "tt", "u", "ul",
    "var", "video", "wbr", "xmp",
];

// Removed together with everything inside them. Form controls, frames and
// applets go too.
const KILL_TAGS: &[&str] = &[
    "script", "style", "meta", "footer", "button", "input", "select", "textarea", "applet",
    "frame", "frameset",
];

// The tag goes, its content stays in place. Typographic noise first, then the
// form, embedding and blinking wrappers.
const UNWRAP_TAGS: &[&str] = &[
    "font", "strong", "b", "br", "em", "form", "iframe", "embed", "object", "param", "layer",
    "blink", "marquee",
];

// Attributes that survive cleaning. `style` is the one styling attribute kept,
// the walker reads it to find `display:none` blocks.
const SAFE_ATTRS: &[&str] = &[
    "abbr", "accept", "accept-charset", "accesskey", "action", "align", "alt", "axis",
    "border", "cellpadding", "cellspacing", "char", "charoff", "charset", "checked", "cite",
    "class", "clear", "color", "cols", "colspan", "compact", "coords", "datetime", "dir",
    "disabled", "enctype", "for", "frame", "headers", "height", "href", "hreflang", "hspace",
    "id", "ismap", "label", "lang", "longdesc", "maxlength", "media", "method", "multiple",
    "name", "nohref", "noshade", "nowrap", "prompt", "readonly", "rel", "rev", "rows",
    "rowspan", "rules", "scope", "selected", "shape", "size", "span", "src", "start",
    "summary", "tabindex", "target", "title", "type", "usemap", "valign", "value", "vspace",
    "width", "style",
];

/// Build the ammonia policy used to clean pages before classification.
///
/// - `script`, `style`, `meta`, `footer`, form controls, frames and applets are
///   dropped with their content.
/// - comments are stripped.
/// - `font`, `strong`, `b`, `br`, `em`, `form`, embedding wrappers and every
///   non-HTML tag are unwrapped, so their children are promoted into the parent
///   and vanish from tag paths.
/// - only [`SAFE_ATTRS`] survive on any element.
fn policy() -> ammonia::Builder<'static> {
    let tags: HashSet<&str> = HTML_TAGS
        .iter()
        .copied()
        .filter(|tag| !KILL_TAGS.contains(tag) && !UNWRAP_TAGS.contains(tag))
        .collect();

    let mut builder = ammonia::Builder::new();
    builder
        .tags(tags)
        .clean_content_tags(KILL_TAGS.iter().copied().collect())
        .tag_attributes(HashMap::new())
        .generic_attributes(SAFE_ATTRS.iter().copied().collect())
        .link_rel(None)
        .strip_comments(true);
    builder
}

/// Reject input that no HTML parser should be asked to build a tree from.
fn check_parseable(html: &str) -> Result<()> {
    if html.trim().is_empty() {
        return Err(ClassifyError::parse("document is empty"));
    }
    if let Some(c) = html
        .chars()
        .find(|c| c.is_ascii_control() && !c.is_ascii_whitespace())
    {
        return Err(ClassifyError::broken(format!(
            "input contains NULL bytes or control characters (U+{:04X})",
            c as u32
        )));
    }
    Ok(())
}

/// Clean raw HTML into the markup string the walker will see.
pub fn clean_html(html: &str) -> Result<String> {
    check_parseable(html)?;
    Ok(policy().clean(html).to_string())
}

/// Clean raw HTML and parse it into a document tree rooted at `<html>`.
pub fn sanitize(html: &str) -> Result<Html> {
    let cleaned = clean_html(html)?;
    Ok(parse_cleaned(&cleaned))
}

// The cleaner parses with scripting off, so `<noscript>` children come back as
// markup. The tree must be built the same way or they collapse into raw text.
fn parse_cleaned(cleaned: &str) -> Html {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    driver::parse_document(HtmlTreeSink::new(Html::new_document()), opts).one(cleaned)
}
