//! Hybrid score fusion
//!
//! Combines vector similarity and graph proximity into one ranking value
//! using a normalized weight pair. Presets are a closed enumeration; the
//! string names accepted on the CLI resolve to constant weight pairs.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SksError;
use crate::skills::model::Skill;

/// Hard cap on result count regardless of the caller's request.
pub const MAX_SEARCH_LIMIT: usize = 50;
/// Vector phase over-fetch factor: candidates = k * this.
pub const VECTOR_CANDIDATE_FACTOR: usize = 2;
/// Hop budget for the graph-proximity phase.
pub const GRAPH_PROXIMITY_HOPS: usize = 2;
/// Fused scores are floored here so exact-zero ties cannot mask ordering.
pub const SCORE_FLOOR: f32 = 1e-6;

/// Query input: raw text to embed, or a pre-computed embedding.
#[derive(Debug, Clone)]
pub enum SearchQuery {
    Text(String),
    Embedding(Vec<f32>),
}

/// Weight pair for fusing the two retrieval signals.
///
/// Weights live in [0, 1] and need not sum to 1; fusion normalizes by their
/// sum. A zero/zero pair falls back to vector-only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HybridWeights {
    pub vector_weight: f32,
    pub graph_weight: f32,
}

impl HybridWeights {
    pub fn new(vector_weight: f32, graph_weight: f32) -> Self {
        Self {
            vector_weight: vector_weight.clamp(0.0, 1.0),
            graph_weight: graph_weight.clamp(0.0, 1.0),
        }
    }

    /// Normalized (vector, graph) pair summing to 1.
    pub fn normalized(self) -> (f32, f32) {
        let sum = self.vector_weight + self.graph_weight;
        if sum <= 0.0 {
            (1.0, 0.0)
        } else {
            (self.vector_weight / sum, self.graph_weight / sum)
        }
    }
}

/// Named weighting presets plus an explicit custom variant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WeightPreset {
    /// Lean on embedding similarity (0.9 / 0.1)
    SemanticFocused,
    /// The default 70/30 split
    #[default]
    Balanced,
    /// Lean on graph proximity (0.4 / 0.6)
    GraphFocused,
    /// Caller-supplied weights
    Custom(HybridWeights),
}

impl WeightPreset {
    pub fn weights(self) -> HybridWeights {
        match self {
            Self::SemanticFocused => HybridWeights::new(0.9, 0.1),
            Self::Balanced => HybridWeights::new(0.7, 0.3),
            Self::GraphFocused => HybridWeights::new(0.4, 0.6),
            Self::Custom(weights) => weights,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SemanticFocused => "semantic_focused",
            Self::Balanced => "balanced",
            Self::GraphFocused => "graph_focused",
            Self::Custom(_) => "custom",
        }
    }
}

impl FromStr for WeightPreset {
    type Err = SksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "semantic_focused" | "semantic" => Ok(Self::SemanticFocused),
            "balanced" => Ok(Self::Balanced),
            "graph_focused" | "graph" => Ok(Self::GraphFocused),
            other => Err(SksError::InvalidRequest(format!(
                "unknown weight preset: {other}"
            ))),
        }
    }
}

/// Which signal produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Vector,
    Graph,
    Hybrid,
}

impl MatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vector => "vector",
            Self::Graph => "graph",
            Self::Hybrid => "hybrid",
        }
    }

    /// Match type implied by a normalized weight pair.
    pub fn for_weights(normalized: (f32, f32)) -> Self {
        let (vector, graph) = normalized;
        if graph == 0.0 {
            Self::Vector
        } else if vector == 0.0 {
            Self::Graph
        } else {
            Self::Hybrid
        }
    }
}

/// One ranked search result. Transient: produced per query, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredSkill {
    pub skill: Skill,
    pub score: f32,
    pub match_type: MatchType,
}

/// Fuse one candidate's signals: dot product of the normalized weight pair
/// with (vector_similarity, graph_score), floored and clamped.
pub fn fuse(vector_similarity: f32, graph_score: f32, normalized: (f32, f32)) -> f32 {
    let (vector_weight, graph_weight) = normalized;
    let fused = vector_weight * vector_similarity + graph_weight * graph_score;
    fused.clamp(SCORE_FLOOR, 1.0)
}

/// Normalize raw graph-proximity scores to [0, 1] by the strongest signal in
/// the candidate set. All zeros stay zeros.
pub fn normalize_graph_scores(raw: &[f32]) -> Vec<f32> {
    let max = raw.iter().copied().fold(0.0f32, f32::max);
    if max <= 0.0 {
        return vec![0.0; raw.len()];
    }
    raw.iter().map(|score| score / max).collect()
}

/// Deterministic result ordering: score descending, ties by ascending id.
pub fn sort_scored(results: &mut [ScoredSkill]) {
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.skill.id.cmp(&b.skill.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_weights_sum_to_one() {
        let (v, g) = HybridWeights::new(0.7, 0.3).normalized();
        assert!((v + g - 1.0).abs() < 1e-6);
        assert!((v - 0.7).abs() < 1e-6);

        // Non-unit sums normalize too
        let (v, g) = HybridWeights::new(0.5, 0.5).normalized();
        assert!((v - 0.5).abs() < 1e-6);
        assert!((g - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_zero_falls_back_to_vector_only() {
        let (v, g) = HybridWeights::new(0.0, 0.0).normalized();
        assert_eq!((v, g), (1.0, 0.0));
        assert_eq!(MatchType::for_weights((v, g)), MatchType::Vector);
    }

    #[test]
    fn weights_clamp_to_unit_interval() {
        let weights = HybridWeights::new(1.5, -0.3);
        assert_eq!(weights.vector_weight, 1.0);
        assert_eq!(weights.graph_weight, 0.0);
    }

    #[test]
    fn preset_values() {
        assert_eq!(
            WeightPreset::SemanticFocused.weights(),
            HybridWeights::new(0.9, 0.1)
        );
        assert_eq!(WeightPreset::Balanced.weights(), HybridWeights::new(0.7, 0.3));
        assert_eq!(
            WeightPreset::GraphFocused.weights(),
            HybridWeights::new(0.4, 0.6)
        );
    }

    #[test]
    fn preset_parsing() {
        assert_eq!(
            "semantic_focused".parse::<WeightPreset>().unwrap(),
            WeightPreset::SemanticFocused
        );
        assert_eq!(
            "graph-focused".parse::<WeightPreset>().unwrap(),
            WeightPreset::GraphFocused
        );
        assert_eq!(
            "Balanced".parse::<WeightPreset>().unwrap(),
            WeightPreset::Balanced
        );
        assert!("bogus".parse::<WeightPreset>().is_err());
    }

    #[test]
    fn match_type_from_weights() {
        assert_eq!(
            MatchType::for_weights(HybridWeights::new(1.0, 0.0).normalized()),
            MatchType::Vector
        );
        assert_eq!(
            MatchType::for_weights(HybridWeights::new(0.0, 1.0).normalized()),
            MatchType::Graph
        );
        assert_eq!(
            MatchType::for_weights(HybridWeights::new(0.7, 0.3).normalized()),
            MatchType::Hybrid
        );
    }

    #[test]
    fn fuse_is_weighted_dot_product() {
        let normalized = HybridWeights::new(0.7, 0.3).normalized();
        let fused = fuse(0.8, 0.5, normalized);
        assert!((fused - (0.7 * 0.8 + 0.3 * 0.5)).abs() < 1e-6);
    }

    #[test]
    fn fuse_floors_at_epsilon() {
        let normalized = HybridWeights::new(1.0, 0.0).normalized();
        assert_eq!(fuse(0.0, 0.0, normalized), SCORE_FLOOR);
    }

    #[test]
    fn fuse_caps_at_one() {
        let normalized = HybridWeights::new(1.0, 0.0).normalized();
        assert_eq!(fuse(1.5, 0.0, normalized), 1.0);
    }

    #[test]
    fn graph_normalization_divides_by_max() {
        let normalized = normalize_graph_scores(&[0.5, 1.0, 0.0]);
        assert_eq!(normalized, vec![0.5, 1.0, 0.0]);

        let normalized = normalize_graph_scores(&[0.3, 0.6]);
        assert!((normalized[0] - 0.5).abs() < 1e-6);
        assert!((normalized[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn graph_normalization_all_zero_stays_zero() {
        assert_eq!(normalize_graph_scores(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn sort_breaks_ties_by_id() {
        let make = |id: &str, score: f32| ScoredSkill {
            skill: Skill::new(id, id),
            score,
            match_type: MatchType::Hybrid,
        };
        let mut results = vec![make("zeta", 0.5), make("alpha", 0.5), make("top", 0.9)];
        sort_scored(&mut results);

        let ids: Vec<&str> = results.iter().map(|r| r.skill.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "alpha", "zeta"]);
    }
}
