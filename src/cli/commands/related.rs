//! sks related - Show skills related to a given skill

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct RelatedArgs {
    /// Skill id to start from
    pub skill_id: String,

    /// Maximum graph distance to traverse
    #[arg(long, default_value = "2")]
    pub max_hops: usize,
}

pub fn run(ctx: &AppContext, args: &RelatedArgs) -> Result<()> {
    super::hydrate(ctx)?;
    let results = ctx.engine.related(&args.skill_id, args.max_hops)?;

    if ctx.robot_mode {
        let skills: Vec<serde_json::Value> = results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "id": r.skill.id,
                    "name": r.skill.name,
                    "score": r.score,
                    "match_type": r.match_type.as_str(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({
                "status": "completed",
                "skill_id": args.skill_id,
                "count": skills.len(),
                "related": skills,
            })
        );
        return Ok(());
    }

    if results.is_empty() {
        println!("{}", "No related skills".yellow());
        return Ok(());
    }

    for result in &results {
        println!(
            "  {:30} {:>7.3}  {}",
            result.skill.id.cyan(),
            result.score,
            result.skill.description
        );
    }
    Ok(())
}
