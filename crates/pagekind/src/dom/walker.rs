// ABOUTME: Depth-first tree walker that collects text and link nodes grouped by tag path.
// ABOUTME: Uses an explicit enter/exit event stack carrying the path, depth and visit index.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

use super::normalize_spaces;

// Runs of two or more whitespace characters are dropped outright, not collapsed.
static WHITESPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

// Digits, punctuation, dashes, quote/bullet marks and whitespace only.
static NOISE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r##"^[0-9—»›\s!"#$%&'()*+,\-./:;<=>?@\[\]^_`{|}~·]*$"##).unwrap()
});

const HIDDEN_STYLE: &str = "display:none;";
const FOOTER_CLASSES: &[&str] = &["foot", "footer"];

/// A text-bearing element: its visit index, normalized direct text and nesting depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub index: usize,
    pub text: String,
    /// Collected for completeness; scoring weights by path depth instead.
    pub depth: usize,
}

impl TextNode {
    /// Text length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// An anchor: its visit index, normalized full text and the tag path it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkNode {
    pub index: usize,
    pub text: String,
    pub path: String,
}

impl LinkNode {
    /// Text length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Nodes keyed by slash-joined tag path, each group in visit order.
pub type PathGroups<T> = BTreeMap<String, Vec<T>>;

/// Text and link nodes of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeIndex {
    pub texts: PathGroups<TextNode>,
    pub links: PathGroups<LinkNode>,
}

impl NodeIndex {
    /// All text nodes across groups, in visit order.
    pub fn text_nodes(&self) -> Vec<&TextNode> {
        let mut nodes: Vec<&TextNode> = self.texts.values().flatten().collect();
        nodes.sort_by_key(|node| node.index);
        nodes
    }

    /// All link nodes across groups, in visit order.
    pub fn link_nodes(&self) -> Vec<&LinkNode> {
        let mut nodes: Vec<&LinkNode> = self.links.values().flatten().collect();
        nodes.sort_by_key(|node| node.index);
        nodes
    }

    pub fn text_count(&self) -> usize {
        self.texts.values().map(Vec::len).sum()
    }

    pub fn link_count(&self) -> usize {
        self.links.values().map(Vec::len).sum()
    }
}

enum Event<'a> {
    Enter(ElementRef<'a>),
    Exit,
}

/// Traversal state threaded through the walk.
#[derive(Debug, Default)]
struct WalkState {
    path: String,
    depth: usize,
    index: usize,
}

impl WalkState {
    fn enter(&mut self, tag: &str) {
        self.path.push('/');
        self.path.push_str(tag);
    }

    fn advance(&mut self) {
        self.depth += 1;
        self.index += 1;
    }

    fn exit(&mut self) {
        let cut = self.path.rfind('/').unwrap_or(0);
        self.path.truncate(cut);
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Collect text and link nodes from a cleaned document.
pub fn collect(doc: &Html) -> NodeIndex {
    collect_from(doc.root_element())
}

/// Collect text and link nodes from the subtree rooted at `root`.
///
/// Every entered element takes one visit index and one depth level, including
/// elements whose subtree is skipped.
pub fn collect_from(root: ElementRef) -> NodeIndex {
    let mut index = NodeIndex::default();
    let mut state = WalkState::default();
    let mut stack = vec![Event::Enter(root)];

    while let Some(event) = stack.pop() {
        match event {
            Event::Enter(el) => {
                state.enter(el.value().name());
                let descend = visit(el, &state, &mut index);

                stack.push(Event::Exit);
                if descend {
                    let children: Vec<_> = el.children().filter_map(ElementRef::wrap).collect();
                    stack.extend(children.into_iter().rev().map(Event::Enter));
                }
                state.advance();
            }
            Event::Exit => state.exit(),
        }
    }

    index
}

/// Apply the first matching rule to an entered element. Returns whether to descend.
fn visit(el: ElementRef, state: &WalkState, index: &mut NodeIndex) -> bool {
    if is_hidden(&el) || is_footer(&el) {
        return false;
    }

    if el.value().name() == "a" {
        let text = normalize_spaces(&el.text().collect::<String>());
        index
            .links
            .entry(state.path.clone())
            .or_default()
            .push(LinkNode {
                index: state.index,
                text,
                path: state.path.clone(),
            });
        return false;
    }

    if let Some(raw) = direct_text(&el) {
        let text = normalize_direct_text(&raw);
        if !text.is_empty() && !is_noise(&text) {
            index
                .texts
                .entry(state.path.clone())
                .or_default()
                .push(TextNode {
                    index: state.index,
                    text,
                    depth: state.depth,
                });
        }
    }

    true
}

fn is_hidden(el: &ElementRef) -> bool {
    el.value()
        .attr("style")
        .map(|style| style.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .is_some_and(|style| style == HIDDEN_STYLE)
}

fn is_footer(el: &ElementRef) -> bool {
    el.value()
        .attr("class")
        .is_some_and(|class| FOOTER_CLASSES.contains(&class.trim()))
}

/// Concatenated text of the element's own text children, excluding descendants.
fn direct_text(el: &ElementRef) -> Option<String> {
    let mut texts = el
        .children()
        .filter_map(|child| child.value().as_text())
        .peekable();
    texts.peek()?;
    Some(texts.map(|t| &**t).collect())
}

/// Drop every run of two or more whitespace characters.
pub fn normalize_direct_text(text: &str) -> String {
    WHITESPACE_RUN_RE.replace_all(text, "").into_owned()
}

/// True when text holds nothing but digits, punctuation, bullets and whitespace.
pub fn is_noise(text: &str) -> bool {
    NOISE_RE.is_match(text)
}
