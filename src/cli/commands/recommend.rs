//! sks recommend - Recommend skills for a project or seed skill

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;
use crate::recommend::{self, RecommendRequest};

#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Recommend for a project directory (toolchain-driven)
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Recommend skills related to this seed skill
    #[arg(long)]
    pub skill: Option<String>,

    /// Maximum number of recommendations
    #[arg(long, short = 'n', default_value = "5")]
    pub limit: usize,
}

pub fn run(ctx: &AppContext, args: &RecommendArgs) -> Result<()> {
    super::hydrate(ctx)?;

    let request = RecommendRequest {
        project_path: args.project.clone(),
        seed_skill_id: args.skill.clone(),
        limit: args.limit,
    };
    let result = recommend::recommend(&ctx.engine, &ctx.detector, &request)?;

    if ctx.robot_mode {
        let recommendations: Vec<serde_json::Value> = result
            .recommendations
            .iter()
            .map(|r| {
                serde_json::json!({
                    "id": r.skill.id,
                    "name": r.skill.name,
                    "description": r.skill.description,
                    "score": r.score,
                    "match_type": r.match_type.as_str(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({
                "status": "completed",
                "recommendation_type": result.recommendation_type.as_str(),
                "recommendations": recommendations,
                "context": result.context,
            })
        );
        return Ok(());
    }

    println!(
        "{} recommendations ({})",
        result.recommendations.len(),
        result.recommendation_type.as_str()
    );
    if !result.context.detected_toolchains.is_empty() {
        println!(
            "  detected: {} (confidence {:.2})",
            result.context.detected_toolchains.join(", "),
            result.context.confidence.unwrap_or(0.0)
        );
    }
    println!();
    for rec in &result.recommendations {
        println!(
            "  {:30} {:>7.3}  {}",
            rec.skill.id.cyan(),
            rec.score,
            rec.skill.description
        );
    }
    if result.recommendations.is_empty() {
        println!("  {}", "nothing to recommend".dimmed());
    }
    Ok(())
}
