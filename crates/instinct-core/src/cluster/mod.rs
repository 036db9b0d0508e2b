//! Lexical clustering of instincts by trigger text.
//!
//! Every trigger is reduced to a keyword set. Two instincts are linked when
//! the Jaccard similarity of their keyword sets reaches [`LINK_THRESHOLD`],
//! and linked components (single linkage) form clusters.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Instinct;

/// Minimum keyword Jaccard similarity for two instincts to be linked.
pub const LINK_THRESHOLD: f64 = 0.25;

/// Tokens shorter than this are dropped.
const MIN_TOKEN_LEN: usize = 2;

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9][a-z0-9_-]*").expect("token pattern is valid"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "when", "creating", "new", "a", "the", "in", "for", "of", "with", "to", "an", "is", "are",
        "on", "at", "by", "as", "it", "and", "or",
    ]
    .into_iter()
    .collect()
});

/// A group of instincts with overlapping trigger keywords.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Members sorted by ID.
    pub members: Vec<Instinct>,
    /// Label tokens, sorted.
    pub keywords: Vec<String>,
    /// Mean confidence of the members.
    pub avg_confidence: f64,
}

impl Cluster {
    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Significant keywords of `text`: lowercased, stop-words and short tokens
/// removed, deduplicated and sorted.
pub fn trigger_keywords(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let set: BTreeSet<&str> = TOKEN_PATTERN
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| t.len() >= MIN_TOKEN_LEN && !STOP_WORDS.contains(t))
        .collect();
    set.into_iter().map(str::to_string).collect()
}

/// Jaccard similarity of two keyword sets, 0.0 when both are empty.
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    set_a.intersection(&set_b).count() as f64 / union as f64
}

/// Disjoint-set forest over indices.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Join two sets, keeping the smaller index as root.
    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            let (keep, merge) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[merge] = keep;
        }
    }
}

/// Group `instincts` into clusters of at least `min_cluster_size` members.
///
/// Confidence is used as given, so callers pass decayed copies. The output
/// depends only on the input set, not its order.
pub fn cluster_by_trigger(instincts: &[Instinct], min_cluster_size: usize) -> Vec<Cluster> {
    let min_size = min_cluster_size.max(1);
    if instincts.len() < min_size {
        return Vec::new();
    }

    let mut sorted: Vec<&Instinct> = instincts.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));
    let keywords: Vec<Vec<String>> = sorted.iter().map(|i| trigger_keywords(&i.trigger)).collect();

    let n = sorted.len();
    let mut forest = UnionFind::new(n);
    for i in 0..n {
        if keywords[i].is_empty() {
            continue;
        }
        for j in (i + 1)..n {
            if !keywords[j].is_empty() && jaccard(&keywords[i], &keywords[j]) >= LINK_THRESHOLD {
                forest.union(i, j);
            }
        }
    }

    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in 0..n {
        let root = forest.find(i);
        groups.entry(root).or_default().push(i);
    }

    let mut clusters: Vec<Cluster> = groups
        .into_values()
        .filter(|idx| idx.len() >= min_size)
        .map(|idx| {
            let member_keywords: Vec<&Vec<String>> = idx.iter().map(|&i| &keywords[i]).collect();
            let members: Vec<Instinct> = idx.iter().map(|&i| sorted[i].clone()).collect();
            let avg_confidence =
                members.iter().map(|m| m.confidence).sum::<f64>() / members.len() as f64;
            Cluster {
                keywords: label_keywords(&member_keywords),
                members,
                avg_confidence,
            }
        })
        .collect();

    clusters.sort_by(|a, b| {
        b.len()
            .cmp(&a.len())
            .then_with(|| a.keywords.cmp(&b.keywords))
            .then_with(|| a.members[0].id.cmp(&b.members[0].id))
    });
    clusters
}

/// Tokens held by a strict majority of members, or the most frequent tokens
/// when none reaches a majority.
fn label_keywords(member_keywords: &[&Vec<String>]) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for kws in member_keywords {
        for kw in kws.iter() {
            *counts.entry(kw.as_str()).or_default() += 1;
        }
    }

    let total = member_keywords.len();
    let majority: Vec<String> = counts
        .iter()
        .filter(|(_, &c)| c * 2 > total)
        .map(|(k, _)| k.to_string())
        .collect();
    if !majority.is_empty() {
        return majority;
    }

    let Some(&top) = counts.values().max() else {
        return Vec::new();
    };
    counts
        .into_iter()
        .filter(|(_, c)| *c == top)
        .map(|(k, _)| k.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inst(id: &str, trigger: &str, confidence: f64) -> Instinct {
        Instinct::new(id, trigger, "", confidence)
    }

    #[test]
    fn test_trigger_keywords_drops_stop_words() {
        assert_eq!(
            trigger_keywords("When creating a new Test for the API"),
            vec!["api", "test"]
        );
        assert_eq!(trigger_keywords("x y z"), Vec::<String>::new());
        assert_eq!(
            trigger_keywords("writing go-style error_wrapping, writing"),
            vec!["error_wrapping", "go-style", "writing"]
        );
    }

    #[test]
    fn test_jaccard() {
        let a = vec!["go".to_string(), "tests".to_string()];
        let b = vec!["go".to_string(), "errors".to_string()];
        assert!((jaccard(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(jaccard(&[], &[]), 0.0);
        assert_eq!(jaccard(&a, &a), 1.0);
    }

    #[test]
    fn test_cluster_groups_related_triggers() {
        let instincts = vec![
            inst("t1", "when writing go tests", 0.6),
            inst("t2", "when running go tests", 0.8),
            inst("t3", "go tests fail", 0.7),
            inst("d1", "deploying docker images", 0.9),
        ];
        let clusters = cluster_by_trigger(&instincts, 3);
        assert_eq!(clusters.len(), 1);

        let ids: Vec<&str> = clusters[0].members.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);
        assert_eq!(clusters[0].keywords, vec!["go", "tests"]);
        assert!((clusters[0].avg_confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_cluster_below_min_total_is_empty() {
        let instincts = vec![inst("a", "go tests", 0.5), inst("b", "go tests", 0.5)];
        assert!(cluster_by_trigger(&instincts, 3).is_empty());
    }

    #[test]
    fn test_single_linkage_chains() {
        // a-b share "alpha beta", b-c share "gamma delta"; a and c share nothing.
        let instincts = vec![
            inst("a", "alpha beta", 0.5),
            inst("b", "alpha beta gamma delta", 0.5),
            inst("c", "gamma delta", 0.5),
        ];
        let clusters = cluster_by_trigger(&instincts, 3);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 3);
    }

    #[test]
    fn test_keywordless_triggers_never_link() {
        let instincts = vec![
            inst("a", "when a new", 0.5),
            inst("b", "for the", 0.5),
            inst("c", "in it", 0.5),
        ];
        assert!(cluster_by_trigger(&instincts, 2).is_empty());
    }

    #[test]
    fn test_order_independent() {
        let forward = vec![
            inst("a", "commit messages", 0.5),
            inst("b", "commit hooks", 0.6),
            inst("c", "writing commit messages", 0.7),
            inst("d", "review pull requests", 0.4),
            inst("e", "pull requests review", 0.3),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(cluster_by_trigger(&forward, 2), cluster_by_trigger(&reversed, 2));
    }

    #[test]
    fn test_clusters_sorted_by_size() {
        let instincts = vec![
            inst("a", "review requests", 0.5),
            inst("b", "review requests", 0.5),
            inst("c", "commit hooks", 0.5),
            inst("d", "commit hooks", 0.5),
            inst("e", "commit hooks", 0.5),
        ];
        let clusters = cluster_by_trigger(&instincts, 2);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].keywords, vec!["commit", "hooks"]);
        assert_eq!(clusters[1].keywords, vec!["requests", "review"]);
    }

    #[test]
    fn test_label_falls_back_to_most_frequent() {
        let a = vec!["alpha".to_string(), "beta".to_string()];
        let b = vec!["beta".to_string(), "gamma".to_string()];
        let c = vec!["gamma".to_string(), "delta".to_string()];
        let d = vec!["delta".to_string(), "alpha".to_string()];
        // Every token appears in exactly half of the members.
        assert_eq!(
            label_keywords(&[&a, &b, &c, &d]),
            vec!["alpha", "beta", "delta", "gamma"]
        );
    }
}
