//! sks stats - Show index statistics

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;

#[derive(Args, Debug, Default)]
pub struct StatsArgs {}

pub fn run(ctx: &AppContext, _args: &StatsArgs) -> Result<()> {
    super::hydrate(ctx)?;
    let stats = ctx.engine.stats()?;

    if ctx.robot_mode {
        println!(
            "{}",
            serde_json::json!({
                "status": "completed",
                "stats": stats,
            })
        );
        return Ok(());
    }

    println!("{}", "Index statistics".bold());
    println!("  total skills:      {}", stats.total_skills);
    println!("  vector store size: {} bytes", stats.vector_store_size);
    println!("  graph nodes:       {}", stats.graph_nodes);
    println!("  graph edges:       {}", stats.graph_edges);
    println!(
        "  last indexed:      {}",
        stats.last_indexed_at.as_deref().unwrap_or("never")
    );
    Ok(())
}
