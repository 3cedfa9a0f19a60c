//! sks list - List indexed skills grouped by category

use clap::Args;
use colored::Colorize;
use itertools::Itertools;

use crate::app::AppContext;
use crate::error::Result;
use crate::skills::manager::SkillSource;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show skills in this category
    #[arg(long)]
    pub category: Option<String>,
}

pub fn run(ctx: &AppContext, args: &ListArgs) -> Result<()> {
    let mut skills = ctx.skills.discover_skills()?;
    if let Some(category) = &args.category {
        skills.retain(|s| s.category.eq_ignore_ascii_case(category));
    }
    skills.sort_by(|a, b| a.id.cmp(&b.id));

    let by_category = skills
        .iter()
        .into_group_map_by(|s| s.category.clone());
    let mut categories: Vec<_> = by_category.into_iter().collect();
    categories.sort_by(|a, b| a.0.cmp(&b.0));

    if ctx.robot_mode {
        let payload: Vec<serde_json::Value> = categories
            .iter()
            .map(|(category, members)| {
                serde_json::json!({
                    "name": if category.is_empty() { "(uncategorized)" } else { category.as_str() },
                    "count": members.len(),
                    "skills": members.iter().map(|s| s.id.clone()).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({
                "status": "completed",
                "total_skills": skills.len(),
                "total_categories": categories.len(),
                "categories": payload,
            })
        );
        return Ok(());
    }

    if skills.is_empty() {
        println!("{}", "No skills found".yellow());
        return Ok(());
    }

    for (category, members) in &categories {
        let heading = if category.is_empty() {
            "(uncategorized)"
        } else {
            category.as_str()
        };
        println!("{} ({})", heading.bold(), members.len());
        for skill in members {
            println!("  {:30} {}", skill.id.cyan(), skill.description);
        }
        println!();
    }
    Ok(())
}
