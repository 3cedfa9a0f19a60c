//! Relationship graph over skill metadata
//!
//! Nodes are skills; edges are derived from shared category, shared tags, and
//! declared dependency/related links. Category and tag edges are undirected
//! (symmetric similarity); dependency and declared-related edges point from
//! the declaring skill to its target.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::skills::model::Skill;

/// Weight contributed by a shared category.
const CATEGORY_WEIGHT: f32 = 1.0;
/// Weight contributed per shared tag (additive, capped at `EDGE_WEIGHT_CAP`).
const TAG_WEIGHT: f32 = 0.3;
/// Weight contributed by a declared dependency or related-skill link.
const DECLARED_WEIGHT: f32 = 0.6;
/// Maximum weight of any single edge.
const EDGE_WEIGHT_CAP: f32 = 1.0;

/// Edge kind. At most one edge of a given kind exists between a node pair;
/// repeated same-kind signals merge into the edge weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Category,
    Tag,
    Dependency,
    DeclaredRelated,
}

impl EdgeKind {
    pub fn is_directed(self) -> bool {
        matches!(self, Self::Dependency | Self::DeclaredRelated)
    }
}

/// Graph-side projection of a skill.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub skill_id: String,
    pub category: String,
    pub tags: Vec<String>,
    pub dependency_ids: Vec<String>,
    pub related_ids: Vec<String>,
}

impl GraphNode {
    fn from_skill(skill: &Skill) -> Self {
        Self {
            skill_id: skill.id.clone(),
            category: skill.category.clone(),
            tags: skill.tags.clone(),
            dependency_ids: skill.dependencies.clone(),
            related_ids: skill.related.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct EdgeKey {
    from: String,
    to: String,
    kind: EdgeKind,
}

impl EdgeKey {
    /// Canonical key: undirected kinds store endpoints in sorted order so the
    /// pair maps to a single edge regardless of insertion direction.
    fn new(from: &str, to: &str, kind: EdgeKind) -> Self {
        if !kind.is_directed() && to < from {
            return Self {
                from: to.to_string(),
                to: from.to_string(),
                kind,
            };
        }
        Self {
            from: from.to_string(),
            to: to.to_string(),
            kind,
        }
    }
}

/// The relationship graph.
#[derive(Default)]
pub struct RelationshipGraph {
    nodes: BTreeMap<String, GraphNode>,
    edges: BTreeMap<EdgeKey, f32>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, skill_id: &str) -> bool {
        self.nodes.contains_key(skill_id)
    }

    /// (Re)create the node for `skill` and recompute its edges against every
    /// other current node. Recomputing rather than patching trades redundant
    /// work for correctness; reindexing is rare relative to search.
    pub fn upsert_node(&mut self, skill: &Skill) {
        self.remove_node(&skill.id);

        let node = GraphNode::from_skill(skill);
        let others: Vec<GraphNode> = self.nodes.values().cloned().collect();
        for other in others {
            // No self-edges; upsert removed any previous incarnation of this id.
            debug_assert_ne!(other.skill_id, node.skill_id);

            if !node.category.is_empty() && node.category == other.category {
                self.set_edge(
                    &node.skill_id,
                    &other.skill_id,
                    EdgeKind::Category,
                    CATEGORY_WEIGHT,
                );
            }

            let shared_tags = node
                .tags
                .iter()
                .filter(|tag| other.tags.contains(tag))
                .count();
            if shared_tags > 0 {
                let weight = (TAG_WEIGHT * shared_tags as f32).min(EDGE_WEIGHT_CAP);
                self.set_edge(&node.skill_id, &other.skill_id, EdgeKind::Tag, weight);
            }

            if declares(&node.dependency_ids, &other) {
                self.set_edge(
                    &node.skill_id,
                    &other.skill_id,
                    EdgeKind::Dependency,
                    DECLARED_WEIGHT,
                );
            }
            if declares(&other.dependency_ids, &node) {
                self.set_edge(
                    &other.skill_id,
                    &node.skill_id,
                    EdgeKind::Dependency,
                    DECLARED_WEIGHT,
                );
            }

            if declares(&node.related_ids, &other) {
                self.set_edge(
                    &node.skill_id,
                    &other.skill_id,
                    EdgeKind::DeclaredRelated,
                    DECLARED_WEIGHT,
                );
            }
            if declares(&other.related_ids, &node) {
                self.set_edge(
                    &other.skill_id,
                    &node.skill_id,
                    EdgeKind::DeclaredRelated,
                    DECLARED_WEIGHT,
                );
            }
        }

        self.nodes.insert(node.skill_id.clone(), node);
    }

    /// Remove the node and all edges touching it. No-op if absent.
    pub fn remove_node(&mut self, skill_id: &str) {
        self.nodes.remove(skill_id);
        self.edges
            .retain(|key, _| key.from != skill_id && key.to != skill_id);
    }

    /// Nodes reachable from `skill_id` within `max_hops`, with cumulative
    /// weight = product of traversed edge weights. Keeps the strongest path
    /// to each node; excludes the start node.
    pub fn neighbors(&self, skill_id: &str, max_hops: usize) -> Vec<(String, f32)> {
        if max_hops == 0 || !self.nodes.contains_key(skill_id) {
            return Vec::new();
        }

        let adjacency = self.adjacency();
        let mut best: BTreeMap<String, f32> = BTreeMap::new();
        let mut frontier: Vec<(String, f32)> = vec![(skill_id.to_string(), 1.0)];

        for _ in 0..max_hops {
            let mut next = Vec::new();
            for (node, cumulative) in frontier {
                let Some(neighbors) = adjacency.get(&node) else {
                    continue;
                };
                for (neighbor, weight) in neighbors {
                    if neighbor == skill_id {
                        continue;
                    }
                    let reached = cumulative * weight;
                    let improved = best
                        .get(neighbor)
                        .is_none_or(|&existing| reached > existing);
                    if improved {
                        best.insert(neighbor.clone(), reached);
                        next.push((neighbor.clone(), reached));
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        let mut results: Vec<(String, f32)> = best.into_iter().collect();
        results.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        results
    }

    /// Strongest cumulative weight from `from` to `to` within `max_hops`,
    /// or 0 when unreachable.
    pub fn proximity(&self, from: &str, to: &str, max_hops: usize) -> f32 {
        self.neighbors(from, max_hops)
            .into_iter()
            .find(|(id, _)| id == to)
            .map_or(0.0, |(_, weight)| weight)
    }

    fn set_edge(&mut self, from: &str, to: &str, kind: EdgeKind, weight: f32) {
        self.edges.insert(EdgeKey::new(from, to, kind), weight);
    }

    /// Traversal view: per-node outgoing neighbors with the combined weight
    /// of all edge kinds joining the pair, capped at `EDGE_WEIGHT_CAP`.
    /// Undirected edges are traversable both ways, directed edges only
    /// forward.
    fn adjacency(&self) -> BTreeMap<String, BTreeMap<String, f32>> {
        let mut adjacency: BTreeMap<String, BTreeMap<String, f32>> = BTreeMap::new();
        let mut add = |from: &str, to: &str, weight: f32| {
            let entry = adjacency
                .entry(from.to_string())
                .or_default()
                .entry(to.to_string())
                .or_insert(0.0);
            *entry = (*entry + weight).min(EDGE_WEIGHT_CAP);
        };

        for (key, weight) in &self.edges {
            add(&key.from, &key.to, *weight);
            if !key.kind.is_directed() {
                add(&key.to, &key.from, *weight);
            }
        }
        adjacency
    }
}

/// Whether a declared dependency/related list references the target node.
fn declares(declared: &[String], target: &GraphNode) -> bool {
    declared.iter().any(|d| d == &target.skill_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(id: &str, category: &str, tags: &[&str]) -> Skill {
        let mut s = Skill::new(id, id);
        s.category = category.to_string();
        s.tags = tags.iter().map(|t| (*t).to_string()).collect();
        s
    }

    #[test]
    fn shared_category_creates_single_full_weight_edge() {
        let mut graph = RelationshipGraph::new();
        graph.upsert_node(&skill("a", "testing", &[]));
        graph.upsert_node(&skill("b", "testing", &[]));

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbors("a", 1), vec![("b".to_string(), 1.0)]);
        assert_eq!(graph.neighbors("b", 1), vec![("a".to_string(), 1.0)]);
    }

    #[test]
    fn empty_categories_do_not_link() {
        let mut graph = RelationshipGraph::new();
        graph.upsert_node(&skill("a", "", &[]));
        graph.upsert_node(&skill("b", "", &[]));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn shared_tags_are_additive_and_capped() {
        let mut graph = RelationshipGraph::new();
        graph.upsert_node(&skill("a", "x", &["rust", "cli"]));
        graph.upsert_node(&skill("b", "y", &["rust", "cli"]));

        // Two shared tags: one tag edge of weight 0.6, no duplicates
        assert_eq!(graph.edge_count(), 1);
        let neighbors = graph.neighbors("a", 1);
        assert!((neighbors[0].1 - 0.6).abs() < 1e-6);

        // Four shared tags would be 1.2 uncapped; edge caps at 1.0
        graph.upsert_node(&skill("c", "x1", &["t1", "t2", "t3", "t4"]));
        graph.upsert_node(&skill("d", "y1", &["t1", "t2", "t3", "t4"]));
        let weight = graph.proximity("c", "d", 1);
        assert!((weight - 1.0).abs() < 1e-6);
    }

    #[test]
    fn dependency_edges_are_directed() {
        let mut graph = RelationshipGraph::new();
        let mut a = skill("a", "one", &[]);
        a.dependencies = vec!["b".to_string()];
        graph.upsert_node(&a);
        graph.upsert_node(&skill("b", "two", &[]));

        assert_eq!(graph.edge_count(), 1);
        let forward = graph.neighbors("a", 1);
        assert_eq!(forward.len(), 1);
        assert!((forward[0].1 - 0.6).abs() < 1e-6);
        // Declarer is not reachable from the target
        assert!(graph.neighbors("b", 1).is_empty());
    }

    #[test]
    fn dependency_resolves_when_target_indexed_later() {
        let mut graph = RelationshipGraph::new();
        let mut a = skill("a", "one", &[]);
        a.dependencies = vec!["b".to_string()];
        graph.upsert_node(&a);
        // Target did not exist yet; the edge appears when b is upserted
        assert_eq!(graph.edge_count(), 0);

        graph.upsert_node(&skill("b", "two", &[]));
        assert_eq!(graph.edge_count(), 1);
        assert!((graph.proximity("a", "b", 1) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn related_links_create_declared_related_edges() {
        let mut graph = RelationshipGraph::new();
        let mut a = skill("a", "one", &[]);
        a.related = vec!["b".to_string()];
        graph.upsert_node(&a);
        graph.upsert_node(&skill("b", "two", &[]));

        assert_eq!(graph.edge_count(), 1);
        assert!((graph.proximity("a", "b", 1) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn upsert_replaces_stale_edges() {
        let mut graph = RelationshipGraph::new();
        graph.upsert_node(&skill("a", "testing", &[]));
        graph.upsert_node(&skill("b", "testing", &[]));
        assert_eq!(graph.edge_count(), 1);

        // Category change severs the link
        graph.upsert_node(&skill("a", "deployment", &[]));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn remove_node_drops_touching_edges() {
        let mut graph = RelationshipGraph::new();
        graph.upsert_node(&skill("a", "testing", &["rust"]));
        graph.upsert_node(&skill("b", "testing", &["rust"]));
        graph.upsert_node(&skill("c", "testing", &[]));
        assert_eq!(graph.node_count(), 3);
        // a-b: category + tag; a-c and b-c: category
        assert_eq!(graph.edge_count(), 4);

        graph.remove_node("a");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.neighbors("b", 1).iter().all(|(id, _)| id != "a"));
    }

    #[test]
    fn two_hop_weight_is_product_of_edges() {
        let mut graph = RelationshipGraph::new();
        // a -tags- b -tags- c, no direct a-c link
        graph.upsert_node(&skill("a", "ca", &["shared-ab"]));
        graph.upsert_node(&skill("b", "cb", &["shared-ab", "shared-bc"]));
        graph.upsert_node(&skill("c", "cc", &["shared-bc"]));

        let neighbors = graph.neighbors("a", 2);
        assert_eq!(neighbors.len(), 2);
        let c = neighbors.iter().find(|(id, _)| id == "c").unwrap();
        assert!((c.1 - 0.09).abs() < 1e-6);

        // One hop does not reach c
        assert_eq!(graph.neighbors("a", 1).len(), 1);
    }

    #[test]
    fn best_path_wins_on_multiple_routes() {
        let mut graph = RelationshipGraph::new();
        // a and d share a category (direct, 1.0) and also connect via b
        // with tag edges (0.3 * 0.3 = 0.09); the direct path must win.
        graph.upsert_node(&skill("a", "shared", &["ab"]));
        graph.upsert_node(&skill("b", "other", &["ab", "bd"]));
        graph.upsert_node(&skill("d", "shared", &["bd"]));

        let neighbors = graph.neighbors("a", 2);
        let d = neighbors.iter().find(|(id, _)| id == "d").unwrap();
        assert!((d.1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn combined_kinds_cap_traversal_weight() {
        let mut graph = RelationshipGraph::new();
        // Same category (1.0) plus shared tag (0.3) still traverses as 1.0
        graph.upsert_node(&skill("a", "shared", &["t"]));
        graph.upsert_node(&skill("b", "shared", &["t"]));

        assert_eq!(graph.edge_count(), 2);
        assert!((graph.proximity("a", "b", 1) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn neighbors_excludes_self_and_unknown_nodes() {
        let mut graph = RelationshipGraph::new();
        graph.upsert_node(&skill("a", "testing", &[]));
        graph.upsert_node(&skill("b", "testing", &[]));

        assert!(graph.neighbors("a", 2).iter().all(|(id, _)| id != "a"));
        assert!(graph.neighbors("ghost", 2).is_empty());
    }

    #[test]
    fn neighbors_sorted_by_weight_then_id() {
        let mut graph = RelationshipGraph::new();
        graph.upsert_node(&skill("seed", "shared", &["t"]));
        graph.upsert_node(&skill("zeta", "shared", &[]));
        graph.upsert_node(&skill("alpha", "shared", &[]));
        graph.upsert_node(&skill("tagged", "other", &["t"]));

        let neighbors = graph.neighbors("seed", 1);
        let ids: Vec<&str> = neighbors.iter().map(|(id, _)| id.as_str()).collect();
        // alpha/zeta tie at 1.0 (category), tagged trails at 0.3
        assert_eq!(ids, vec!["alpha", "zeta", "tagged"]);
    }
}
