//! Connected components of the co-occurrence graph.

use indexmap::{IndexMap, IndexSet};

use crate::reports::{ClusterSet, CoOccurrence};

/// Group co-occurring terms into clusters.
///
/// Every pair is one undirected edge; counts are ignored. Components are
/// found by depth-first traversal, starting from terms in the order they
/// first appear in `pairs`, and numbered in discovery order. Terms without
/// any pair are not clustered.
#[tracing::instrument(skip_all, fields(pairs = pairs.len()))]
pub fn build_clusters(pairs: &[CoOccurrence]) -> ClusterSet {
    let mut adjacency: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
    for CoOccurrence { pair: [a, b], .. } in pairs {
        adjacency.entry(a.as_str()).or_default().insert(b.as_str());
        adjacency.entry(b.as_str()).or_default().insert(a.as_str());
    }

    let mut visited: IndexSet<&str> = IndexSet::with_capacity(adjacency.len());
    let mut clusters: Vec<Vec<String>> = Vec::new();

    for &start in adjacency.keys() {
        if visited.contains(start) {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            component.push(node.to_string());
            if let Some(neighbours) = adjacency.get(node) {
                stack.extend(neighbours.iter().filter(|n| !visited.contains(*n)));
            }
        }
        clusters.push(component);
    }

    let term_cluster_map = clusters
        .iter()
        .enumerate()
        .flat_map(|(id, terms)| terms.iter().map(move |t| (t.clone(), id)))
        .collect();

    ClusterSet {
        clusters,
        term_cluster_map,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: &str, b: &str) -> CoOccurrence {
        CoOccurrence {
            pair: [a.to_string(), b.to_string()],
            count: 1,
        }
    }

    #[test]
    fn empty_pairs_no_clusters() {
        let set = build_clusters(&[]);
        assert!(set.clusters.is_empty());
        assert!(set.term_cluster_map.is_empty());
    }

    #[test]
    fn transitive_pairs_join() {
        let set = build_clusters(&[pair("a", "b"), pair("b", "c"), pair("x", "y")]);
        assert_eq!(set.clusters.len(), 2);
        let mut first = set.clusters[0].clone();
        first.sort();
        assert_eq!(first, vec!["a", "b", "c"]);
        assert_eq!(set.term_cluster_map["a"], 0);
        assert_eq!(set.term_cluster_map["c"], 0);
        assert_eq!(set.term_cluster_map["x"], 1);
    }

    #[test]
    fn discovery_starts_from_first_seen_term() {
        let set = build_clusters(&[pair("m", "n"), pair("a", "b")]);
        assert_eq!(set.clusters[0][0], "m");
        assert_eq!(set.clusters[1][0], "a");
    }

    #[test]
    fn partition_is_consistent() {
        let pairs = [
            pair("a", "b"),
            pair("c", "d"),
            pair("b", "c"),
            pair("e", "f"),
            pair("a", "d"),
        ];
        let set = build_clusters(&pairs);
        let total: usize = set.clusters.iter().map(Vec::len).sum();
        assert_eq!(total, set.term_cluster_map.len());
        for (id, terms) in set.clusters.iter().enumerate() {
            for t in terms {
                assert_eq!(set.term_cluster_map[t], id);
            }
        }
    }
}
