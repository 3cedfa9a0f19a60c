//! sks index - Reindex skills from configured paths

use std::time::Instant;

use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app::AppContext;
use crate::error::{Result, SksError};
use crate::index::lock::IndexLock;

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Force full re-index, ignoring fingerprints
    #[arg(long, short)]
    pub force: bool,
}

pub fn run(ctx: &AppContext, args: &IndexArgs) -> Result<()> {
    // Reindexing is a single exclusive-writer operation
    let lock = IndexLock::try_acquire(&ctx.sks_root)?;
    let _lock = lock.ok_or_else(|| {
        SksError::LockFailed(
            "could not acquire index lock; another process may be indexing".to_string(),
        )
    })?;

    let start = Instant::now();

    if ctx.robot_mode {
        let stats = ctx.engine.reindex_all(args.force)?;
        println!(
            "{}",
            serde_json::json!({
                "status": "completed",
                "forced": args.force,
                "stats": stats,
                "elapsed_ms": start.elapsed().as_millis() as u64,
            })
        );
        return Ok(());
    }

    println!("{}", "Indexing skills...".bold());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("embedding and graphing corpus");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let stats = ctx.engine.reindex_all(args.force)?;
    spinner.finish_and_clear();

    let elapsed = start.elapsed();
    println!();
    println!(
        "{} Indexed {} skills in {:.2}s",
        "✓".green().bold(),
        stats.total_skills,
        elapsed.as_secs_f64()
    );
    println!(
        "  {} graph nodes, {} edges, {} vector bytes",
        stats.graph_nodes, stats.graph_edges, stats.vector_store_size
    );
    if stats.total_skills == 0 {
        println!();
        println!("{}", "No skills found under configured paths".yellow());
    }
    Ok(())
}
