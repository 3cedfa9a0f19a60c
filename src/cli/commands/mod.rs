pub mod index;
pub mod init;
pub mod list;
pub mod recommend;
pub mod related;
pub mod search;
pub mod show;
pub mod stats;

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

/// Populate the in-memory indexes from the corpus before a read command.
///
/// Fingerprints persist across invocations but the vector index and graph do
/// not, so a fresh process rebuilds them with an incremental pass.
fn hydrate(ctx: &AppContext) -> Result<()> {
    ctx.engine.reindex_all(false)?;
    Ok(())
}

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Init(args) => init::run_without_context(ctx.robot_mode, args),
        Commands::Index(args) => index::run(ctx, args),
        Commands::Search(args) => search::run(ctx, args),
        Commands::Recommend(args) => recommend::run(ctx, args),
        Commands::Related(args) => related::run(ctx, args),
        Commands::Show(args) => show::run(ctx, args),
        Commands::List(args) => list::run(ctx, args),
        Commands::Stats(args) => stats::run(ctx, args),
    }
}
