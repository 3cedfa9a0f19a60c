//! sks show - Show skill details

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::{Result, SksError};
use crate::skills::manager::SkillSource;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Skill id
    pub skill_id: String,
}

pub fn run(ctx: &AppContext, args: &ShowArgs) -> Result<()> {
    let skill = ctx
        .skills
        .load_skill(&args.skill_id)?
        .ok_or_else(|| SksError::SkillNotFound(args.skill_id.clone()))?;

    if ctx.robot_mode {
        println!(
            "{}",
            serde_json::json!({
                "status": "completed",
                "skill": skill,
            })
        );
        return Ok(());
    }

    println!("{} ({})", skill.name.bold(), skill.id.cyan());
    println!("{}", skill.description);
    println!();
    println!("  category:     {}", skill.category);
    println!("  tags:         {}", skill.tags.join(", "));
    if !skill.dependencies.is_empty() {
        println!("  dependencies: {}", skill.dependencies.join(", "));
    }
    if !skill.related.is_empty() {
        println!("  related:      {}", skill.related.join(", "));
    }
    println!("  version:      {}", skill.version);
    if let Some(author) = &skill.author {
        println!("  author:       {author}");
    }
    println!("  source:       {}", skill.source_path.display());
    println!();
    println!("{}", skill.instructions);
    Ok(())
}
