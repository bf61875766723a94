// ABOUTME: Relational scores over path-grouped nodes: text-text, link-link and text-link.
// ABOUTME: Aggregates kernel-weighted text lengths per tag path, weighted by path depth.

use crate::dom::{LinkNode, NodeIndex, PathGroups, TextNode};
use crate::kernel::{bandwidth, weight};
use crate::result::ScoreTriple;

/// Tie-break offset for links without text when looking for a text node's nearest link.
pub const EMPTY_LINK_TIEBREAK: f64 = 10.0;

/// Saturating weight `d / (1 + d)` where `d` is the number of `/` in `path`.
pub fn depth_weight(path: &str) -> f64 {
    let d = path.matches('/').count() as f64;
    d / (1.0 + d)
}

/// Compute all three scores for a document.
pub fn score(index: &NodeIndex) -> ScoreTriple {
    ScoreTriple {
        text_text: text_text_score(&index.texts),
        link_link: link_link_score(&index.links),
        text_link: text_link_score(&index.links, &index.texts),
    }
}

/// Relational score between text nodes sharing a tag path.
///
/// Each node contributes its own length weighted by its share of all page
/// text, plus the kernel-weighted lengths of the other nodes in its group.
pub fn text_text_score(texts: &PathGroups<TextNode>) -> f64 {
    // visit indices are unique, so every record counts once
    let total_len: usize = texts.values().flatten().map(TextNode::len).sum();
    if total_len == 0 {
        return 0.0;
    }

    texts
        .iter()
        .map(|(path, group)| {
            let bw = bandwidth(group.iter().map(|node| node.index));
            let group_score: f64 = group
                .iter()
                .enumerate()
                .map(|(i, node)| {
                    let len = node.len() as f64;
                    let self_weight = len / total_len as f64;
                    let others: f64 = group
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| *j != i)
                        .map(|(_, other)| weight(bw, other.index, node.index) * other.len() as f64)
                        .sum();
                    len * self_weight + others
                })
                .sum();
            depth_weight(path) * group_score
        })
        .sum()
}

/// Relational score between link nodes sharing a tag path.
///
/// Unlike [`text_text_score`] each node's own length is part of the kernel sum
/// (distance 0, weight 1).
pub fn link_link_score(links: &PathGroups<LinkNode>) -> f64 {
    links
        .iter()
        .map(|(group_path, group)| {
            let bw = bandwidth(group.iter().map(|link| link.index));
            let group_score: f64 = group
                .iter()
                .map(|link| kernel_link_sum(group, bw, link.index))
                .sum();
            depth_weight(group_path) * group_score
        })
        .sum()
}

/// Relational score between each text node and the link group nearest to it.
///
/// The whole neighbouring group is weighted against the text node, so
/// recurring navigation links near a block of prose add up.
pub fn text_link_score(links: &PathGroups<LinkNode>, texts: &PathGroups<TextNode>) -> f64 {
    if links.is_empty() {
        return 0.0;
    }

    let mut link_nodes: Vec<&LinkNode> = links.values().flatten().collect();
    link_nodes.sort_by_key(|link| link.index);
    let mut text_nodes: Vec<&TextNode> = texts.values().flatten().collect();
    text_nodes.sort_by_key(|node| node.index);

    let mut score = 0.0;
    for text in text_nodes {
        let Some(nearest) = nearest_link(&link_nodes, text.index) else {
            continue;
        };
        let Some(group) = links.get(&nearest.path) else {
            continue;
        };
        let bw = bandwidth(group.iter().map(|link| link.index));
        score += depth_weight(&nearest.path) * kernel_link_sum(group, bw, text.index);
    }
    score
}

/// Link nearest to `text_index` by `|link - text + tiebreak|`; the first minimum wins.
pub(crate) fn nearest_link<'a>(links: &[&'a LinkNode], text_index: usize) -> Option<&'a LinkNode> {
    let distance = |link: &LinkNode| {
        let tiebreak = if link.is_empty() {
            EMPTY_LINK_TIEBREAK
        } else {
            1.0 / link.len() as f64
        };
        (link.index as f64 - text_index as f64 + tiebreak).abs()
    };

    let mut best: Option<(&LinkNode, f64)> = None;
    for link in links.iter().copied() {
        let d = distance(link);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((link, d)),
        }
    }
    best.map(|(link, _)| link)
}

/// Kernel-weighted sum of link text lengths in `group` relative to `position`.
fn kernel_link_sum(group: &[LinkNode], bw: f64, position: usize) -> f64 {
    group
        .iter()
        .map(|link| weight(bw, link.index, position) * link.len() as f64)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    fn text(index: usize, text: &str) -> TextNode {
        TextNode {
            index,
            text: text.to_string(),
            depth: 0,
        }
    }

    fn link(index: usize, text: &str, path: &str) -> LinkNode {
        LinkNode {
            index,
            text: text.to_string(),
            path: path.to_string(),
        }
    }

    fn link_groups(links: Vec<LinkNode>) -> PathGroups<LinkNode> {
        let mut groups = PathGroups::new();
        for l in links {
            groups.entry(l.path.clone()).or_insert_with(Vec::new).push(l);
        }
        groups
    }

    #[test]
    fn test_depth_weight() {
        assert_eq!(depth_weight(""), 0.0);
        assert_eq!(depth_weight("/html"), 0.5);
        assert_eq!(depth_weight("/html/body/p"), 0.75);
    }

    #[test]
    fn test_depth_weight_is_increasing_and_bounded() {
        let mut path = String::new();
        let mut last = depth_weight(&path);
        for _ in 0..64 {
            path.push_str("/div");
            let w = depth_weight(&path);
            assert!(w > last);
            assert!((0.0..1.0).contains(&w));
            last = w;
        }
    }

    #[test]
    fn test_text_text_single_node() {
        let mut texts = PathGroups::new();
        texts.insert("/html/body/p".to_string(), vec![text(3, "0123456789")]);

        approx(text_text_score(&texts), 7.5);
    }

    #[test]
    fn test_text_text_pair() {
        let mut texts = PathGroups::new();
        texts.insert(
            "/html/body/div/p".to_string(),
            vec![text(4, &"a".repeat(10)), text(5, &"b".repeat(20))],
        );

        // bandwidth 0.5, so the pair weight is exp(-2)
        let pair = (-2.0f64).exp();
        let expected = 0.8 * ((100.0 + 400.0) / 30.0 + pair * 30.0);
        approx(text_text_score(&texts), expected);
    }

    #[test]
    fn test_text_text_self_term_is_separate() {
        let mut texts = PathGroups::new();
        texts.insert("/html/body/p".to_string(), vec![text(3, "prose")]);
        texts.insert("/html/body/div/p".to_string(), vec![text(9, "more prose")]);

        // single-node groups have no pairwise term, so the score is all self term
        let self_terms = 0.75 * 5.0 * (5.0 / 15.0) + 0.8 * 10.0 * (10.0 / 15.0);
        approx(text_text_score(&texts), self_terms);
        assert!(text_text_score(&texts) > 0.0);
    }

    #[test]
    fn test_text_text_empty() {
        assert_eq!(text_text_score(&PathGroups::new()), 0.0);
    }

    #[test]
    fn test_link_link_includes_self() {
        let links = link_groups(vec![link(6, "abcd", "/a/b"), link(8, "wxyz", "/a/b")]);

        // bandwidth 1, distance 2
        let pair = (-2.0f64).exp();
        approx(link_link_score(&links), (2.0 / 3.0) * (8.0 + 8.0 * pair));
    }

    #[test]
    fn test_link_link_single_link() {
        let links = link_groups(vec![link(4, "More", "/html/body/a")]);
        approx(link_link_score(&links), 3.0);
    }

    #[test]
    fn test_no_links_scores_zero() {
        let mut texts = PathGroups::new();
        texts.insert("/html/body/p".to_string(), vec![text(3, "words")]);

        assert_eq!(link_link_score(&PathGroups::new()), 0.0);
        assert_eq!(text_link_score(&PathGroups::new(), &texts), 0.0);
    }

    #[test]
    fn test_nearest_link_prefers_preceding_link() {
        let before = link(4, "ab", "/x/a");
        let after = link(6, "abcd", "/x/y/a");
        let links = vec![&before, &after];

        // |4 - 5 + 1/2| = 0.5 beats |6 - 5 + 1/4| = 1.25
        assert_eq!(nearest_link(&links, 5), Some(&before));
    }

    #[test]
    fn test_nearest_link_empty_text_tiebreak() {
        let empty = link(4, "", "/x/a");
        let far = link(9, "x", "/x/y/a");
        let links = vec![&empty, &far];

        // |4 - 5 + 10| = 9 loses to |9 - 5 + 1| = 5
        assert_eq!(nearest_link(&links, 5), Some(&far));
    }

    #[test]
    fn test_nearest_link_first_minimum_wins() {
        let first = link(3, "ab", "/x/a");
        let second = link(3, "cd", "/x/y/a");
        let links = vec![&first, &second];

        assert_eq!(nearest_link(&links, 7), Some(&first));
        assert_eq!(nearest_link(&[], 7), None);
    }

    #[test]
    fn test_text_link_uses_whole_neighbouring_group() {
        let links = link_groups(vec![
            link(3, "cd", "/x/a"),
            link(4, "ab", "/x/a"),
            link(6, "abcd", "/x/y/a"),
        ]);
        let mut texts = PathGroups::new();
        texts.insert("/x/p".to_string(), vec![text(5, "text")]);

        // group /x/a has bandwidth 0.5: distances 1 and 2 from the text node
        let expected = (2.0 / 3.0) * (2.0 * (-2.0f64).exp() + 2.0 * (-8.0f64).exp());
        approx(text_link_score(&links, &texts), expected);
    }

    #[test]
    fn test_score_triple() {
        let mut index = NodeIndex::default();
        index
            .texts
            .insert("/html/body/p".to_string(), vec![text(3, &"x".repeat(40))]);
        index.links = link_groups(vec![link(4, "More", "/html/body/a")]);

        let scores = score(&index);
        approx(scores.text_text, 30.0);
        approx(scores.link_link, 3.0);
        approx(scores.text_link, 0.0);
    }
}
