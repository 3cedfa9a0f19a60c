//! sks search - Search for skills

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;
use crate::search::filters::SearchFilters;
use crate::search::scorer::{SearchQuery, WeightPreset};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Maximum number of results (capped at 50)
    #[arg(long, short = 'n', default_value = "10")]
    pub limit: usize,

    /// Filter by category
    #[arg(long)]
    pub category: Option<String>,

    /// Filter by tag (repeatable, any-match)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Filter by toolchain (e.g. python, rust)
    #[arg(long)]
    pub toolchain: Option<String>,

    /// Weighting preset: semantic_focused, balanced, graph_focused
    #[arg(long, default_value = "balanced")]
    pub preset: String,
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let preset: WeightPreset = args.preset.parse()?;

    let mut filters = SearchFilters::new();
    if let Some(category) = &args.category {
        filters = filters.with_category(category.as_str());
    }
    if !args.tags.is_empty() {
        filters = filters.with_tags(args.tags.clone());
    }
    if let Some(toolchain) = &args.toolchain {
        filters = filters.with_toolchain(toolchain.as_str());
    }

    super::hydrate(ctx)?;
    let results = ctx.engine.search(
        &SearchQuery::Text(args.query.clone()),
        args.limit,
        preset,
        &filters,
    )?;

    if ctx.robot_mode {
        let skills: Vec<serde_json::Value> = results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "id": r.skill.id,
                    "name": r.skill.name,
                    "description": r.skill.description,
                    "category": r.skill.category,
                    "tags": r.skill.tags,
                    "score": r.score,
                    "match_type": r.match_type.as_str(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({
                "status": "completed",
                "query": args.query,
                "count": skills.len(),
                "skills": skills,
            })
        );
        return Ok(());
    }

    if results.is_empty() {
        println!("{}", "No matching skills".yellow());
        return Ok(());
    }

    println!(
        "{:30} {:>7} {:>8}  {}",
        "SKILL".bold(),
        "SCORE".bold(),
        "MATCH".bold(),
        "DESCRIPTION".bold()
    );
    println!("{}", "─".repeat(78).dimmed());
    for result in &results {
        let description: String = result.skill.description.chars().take(36).collect();
        println!(
            "{:30} {:>7.3} {:>8}  {}",
            result.skill.id.cyan(),
            result.score,
            result.match_type.as_str(),
            description
        );
    }
    Ok(())
}
