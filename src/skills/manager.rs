//! Skill discovery and loading

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::Result;
use crate::skills::frontmatter::parse_skill_md;
use crate::skills::model::Skill;

/// Corpus access contract consumed by the indexing engine.
///
/// `discover_skills` enumerates the full corpus; `load_skill` resolves a
/// single id. Implementations must be safe to call from multiple threads.
pub trait SkillSource: Send + Sync {
    fn discover_skills(&self) -> Result<Vec<Skill>>;

    fn load_skill(&self, id: &str) -> Result<Option<Skill>>;
}

/// File-based skill manager walking configured roots for SKILL.md files.
pub struct SkillManager {
    roots: Vec<PathBuf>,
}

impl SkillManager {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn discover_in_root(&self, root: &Path, skills: &mut Vec<Skill>) {
        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() || entry.file_name() != "SKILL.md" {
                continue;
            }

            let path = entry.path();
            let repo_id = repo_id_for(root, path);
            match std::fs::read_to_string(path) {
                Ok(content) => match parse_skill_md(&content, path, &repo_id) {
                    Ok(skill) => skills.push(skill),
                    Err(err) => warn!("skipping invalid skill {}: {err}", path.display()),
                },
                Err(err) => warn!("skipping unreadable skill {}: {err}", path.display()),
            }
        }
    }
}

impl SkillSource for SkillManager {
    fn discover_skills(&self) -> Result<Vec<Skill>> {
        let mut skills = Vec::new();
        for root in &self.roots {
            if !root.exists() {
                debug!("skill root {} does not exist, skipping", root.display());
                continue;
            }
            self.discover_in_root(root, &mut skills);
        }
        Ok(skills)
    }

    fn load_skill(&self, id: &str) -> Result<Option<Skill>> {
        Ok(self.discover_skills()?.into_iter().find(|s| s.id == id))
    }
}

/// Collection name for a skill file: the first directory component under the
/// discovery root, falling back to the root's own name.
fn repo_id_for(root: &Path, skill_path: &Path) -> String {
    let fallback = || {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    let Ok(relative) = skill_path.strip_prefix(root) else {
        return fallback();
    };
    let mut components = relative.components();
    let first = components.next();
    // A SKILL.md directly under the root has no collection directory.
    if components.next().is_none() {
        return fallback();
    }
    first
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .unwrap_or_else(fallback)
}
