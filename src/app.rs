//! Application context
//!
//! One explicit context object built in `main` and passed by reference to
//! every command. There are no module-level singletons: "not configured"
//! means the sks root does not exist yet and surfaces as `NotConfigured`
//! at construction time.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{Result, SksError};
use crate::index::engine::IndexingEngine;
use crate::index::snapshot::SnapshotTracker;
use crate::recommend::MarkerDetector;
use crate::search::embeddings::build_embedder;
use crate::skills::manager::{SkillManager, SkillSource};

pub struct AppContext {
    pub config: Config,
    pub sks_root: PathBuf,
    pub robot_mode: bool,
    pub engine: Arc<IndexingEngine>,
    pub skills: Arc<SkillManager>,
    pub detector: MarkerDetector,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let sks_root = resolve_root();
        if !sks_root.exists() {
            return Err(SksError::NotConfigured(format!(
                "{} does not exist; run `sks init` first",
                sks_root.display()
            )));
        }

        let config = Config::load(cli.config.as_deref(), &sks_root)?;

        let skills = Arc::new(SkillManager::new(config.skill_paths.resolved(&sks_root)));
        let embedder = build_embedder(&config.search)?;
        let tracker = SnapshotTracker::open(&sks_root.join("index").join("snapshots.db"))?;
        let engine = Arc::new(IndexingEngine::new(
            Arc::clone(&skills) as Arc<dyn SkillSource>,
            embedder,
            tracker,
            Duration::from_secs(config.index.embed_timeout_secs),
        ));

        Ok(Self {
            config,
            sks_root,
            robot_mode: cli.robot,
            engine,
            skills,
            detector: MarkerDetector::new(),
        })
    }
}

/// The sks root directory: `SKS_ROOT` if set, else `~/.skillset`.
pub fn resolve_root() -> PathBuf {
    if let Ok(root) = std::env::var("SKS_ROOT") {
        return PathBuf::from(root);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".skillset")
}
