//! Skill recommendation
//!
//! Two mutually exclusive modes selected by input:
//!
//! - **Project-based**: detect the project's toolchain, synthesize a query
//!   from it, and run a semantic-leaning hybrid search.
//! - **Skill-based**: take the seed skill's graph neighborhood directly —
//!   the intent is "structurally close to this one", not textual
//!   similarity, so there is no vector phase.

pub mod toolchain;

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{Result, SksError};
use crate::index::engine::IndexingEngine;
use crate::search::filters::SearchFilters;
use crate::search::scorer::{ScoredSkill, SearchQuery, WeightPreset};
use crate::skills::manager::SkillSource;

pub use toolchain::{MarkerDetector, ToolchainDetector, ToolchainInfo};

/// Graph hop budget for skill-based recommendations.
const SKILL_NEIGHBORHOOD_HOPS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    ProjectBased,
    SkillBased,
}

impl RecommendationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProjectBased => "project_based",
            Self::SkillBased => "skill_based",
        }
    }
}

/// Context attached to a recommendation response.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecommendContext {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub detected_toolchains: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_skill: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub recommendation_type: RecommendationType,
    pub recommendations: Vec<ScoredSkill>,
    pub context: RecommendContext,
}

#[derive(Debug, Clone, Default)]
pub struct RecommendRequest {
    pub project_path: Option<PathBuf>,
    pub seed_skill_id: Option<String>,
    pub limit: usize,
}

/// Route a recommendation request to the matching mode.
///
/// At least one of `project_path`/`seed_skill_id` is required; when both are
/// supplied the project wins and the skill hint is ignored.
pub fn recommend(
    engine: &IndexingEngine,
    detector: &dyn ToolchainDetector,
    request: &RecommendRequest,
) -> Result<Recommendation> {
    match (&request.project_path, &request.seed_skill_id) {
        (Some(path), _) => project_based(engine, detector, path, request.limit),
        (None, Some(skill_id)) => skill_based(engine, skill_id, request.limit),
        (None, None) => Err(SksError::InvalidRequest(
            "either project_path or seed_skill_id is required".to_string(),
        )),
    }
}

fn project_based(
    engine: &IndexingEngine,
    detector: &dyn ToolchainDetector,
    path: &std::path::Path,
    limit: usize,
) -> Result<Recommendation> {
    if !path.exists() {
        return Err(SksError::PathNotFound(path.display().to_string()));
    }

    let info = detector.detect(path);
    let query = synthesize_query(&info);

    let recommendations = engine.search(
        &SearchQuery::Text(query),
        limit,
        WeightPreset::SemanticFocused,
        &SearchFilters::new(),
    )?;

    Ok(Recommendation {
        recommendation_type: RecommendationType::ProjectBased,
        recommendations,
        context: RecommendContext {
            detected_toolchains: info.languages(),
            confidence: Some(info.confidence),
            base_skill: None,
        },
    })
}

fn skill_based(
    engine: &IndexingEngine,
    skill_id: &str,
    limit: usize,
) -> Result<Recommendation> {
    // Resolve through the skill manager so an unknown id fails before any
    // graph work.
    let seed = engine
        .skill_source()
        .load_skill(skill_id)?
        .ok_or_else(|| SksError::SkillNotFound(skill_id.to_string()))?;

    let mut recommendations = engine.related(&seed.id, SKILL_NEIGHBORHOOD_HOPS)?;
    recommendations.truncate(limit);

    Ok(Recommendation {
        recommendation_type: RecommendationType::SkillBased,
        recommendations,
        context: RecommendContext {
            detected_toolchains: Vec::new(),
            confidence: None,
            base_skill: Some(seed.id),
        },
    })
}

/// Pseudo-query for a detected toolchain, fed to the semantic search phase.
fn synthesize_query(info: &ToolchainInfo) -> String {
    let mut parts = info.languages();
    parts.extend(info.frameworks.iter().cloned());
    if parts.is_empty() {
        return "general software development workflow".to_string();
    }
    parts.push("development workflow best practices".to_string());
    parts.join(" ")
}
