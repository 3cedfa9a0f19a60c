use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SksError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub skill_paths: SkillPathsConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub index: IndexConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, sks_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("SKS_CONFIG").ok().map(PathBuf::from));

        let path = explicit.unwrap_or_else(|| sks_root.join("config.toml"));
        if let Some(patch) = Self::load_patch(&path)? {
            config.merge_patch(patch);
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| SksError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| SksError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.skill_paths {
            self.skill_paths.merge(patch);
        }
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.index {
            self.index.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(backend) = std::env::var("SKS_EMBEDDING_BACKEND") {
            self.search.embedding_backend = backend;
        }
        if let Ok(dims) = std::env::var("SKS_EMBEDDING_DIMS") {
            self.search.embedding_dims = dims
                .parse()
                .map_err(|_| SksError::Config(format!("invalid SKS_EMBEDDING_DIMS: {dims}")))?;
        }
        if let Ok(endpoint) = std::env::var("SKS_EMBEDDING_API_ENDPOINT") {
            self.search.api_endpoint = Some(endpoint);
        }
        if let Ok(secs) = std::env::var("SKS_EMBED_TIMEOUT_SECS") {
            self.index.embed_timeout_secs = secs
                .parse()
                .map_err(|_| SksError::Config(format!("invalid SKS_EMBED_TIMEOUT_SECS: {secs}")))?;
        }
        Ok(())
    }

    /// Write the default configuration to `path` (used by `sks init`).
    pub fn write_default(path: &Path) -> Result<()> {
        let config = Self::default();
        let raw = toml::to_string_pretty(&config)
            .map_err(|err| SksError::Config(format!("serialize default config: {err}")))?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}

/// Skill discovery roots. Relative entries are resolved against the sks root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillPathsConfig {
    #[serde(default)]
    pub roots: Vec<String>,
}

impl Default for SkillPathsConfig {
    fn default() -> Self {
        Self {
            roots: vec!["skills".to_string()],
        }
    }
}

impl SkillPathsConfig {
    fn merge(&mut self, patch: SkillPathsPatch) {
        if let Some(roots) = patch.roots {
            self.roots = roots;
        }
    }

    /// Resolve configured roots against the sks root directory.
    pub fn resolved(&self, sks_root: &Path) -> Vec<PathBuf> {
        self.roots
            .iter()
            .map(|entry| {
                let p = PathBuf::from(entry);
                if p.is_absolute() { p } else { sks_root.join(p) }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub embedding_backend: String,
    #[serde(default)]
    pub embedding_dims: u32,
    /// Endpoint for the `api` embedding backend.
    #[serde(default)]
    pub api_endpoint: Option<String>,
    /// Model name sent to the `api` embedding backend.
    #[serde(default)]
    pub api_model: String,
    /// Query-embedding LRU cache capacity.
    #[serde(default)]
    pub cache_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            embedding_backend: "hash".to_string(),
            embedding_dims: 384,
            api_endpoint: None,
            api_model: "default".to_string(),
            cache_size: 128,
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(value) = patch.embedding_backend {
            self.embedding_backend = value;
        }
        if let Some(value) = patch.embedding_dims {
            self.embedding_dims = value;
        }
        if let Some(value) = patch.api_endpoint {
            self.api_endpoint = Some(value);
        }
        if let Some(value) = patch.api_model {
            self.api_model = value;
        }
        if let Some(value) = patch.cache_size {
            self.cache_size = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Per-skill embedding timeout during reindex, in seconds.
    #[serde(default)]
    pub embed_timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            embed_timeout_secs: 10,
        }
    }
}

impl IndexConfig {
    fn merge(&mut self, patch: IndexPatch) {
        if let Some(value) = patch.embed_timeout_secs {
            self.embed_timeout_secs = value;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    skill_paths: Option<SkillPathsPatch>,
    search: Option<SearchPatch>,
    index: Option<IndexPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct SkillPathsPatch {
    roots: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchPatch {
    embedding_backend: Option<String>,
    embedding_dims: Option<u32>,
    api_endpoint: Option<String>,
    api_model: Option<String>,
    cache_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct IndexPatch {
    embed_timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.search.embedding_backend, "hash");
        assert_eq!(config.search.embedding_dims, 384);
        assert_eq!(config.index.embed_timeout_secs, 10);
        assert_eq!(config.skill_paths.roots, vec!["skills"]);
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(None, dir.path()).unwrap();
        assert_eq!(config.search.embedding_dims, 384);
    }

    #[test]
    fn partial_patch_merges_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[search]\nembedding_dims = 64\n",
        )
        .unwrap();

        let config = Config::load(None, dir.path()).unwrap();
        assert_eq!(config.search.embedding_dims, 64);
        // Untouched sections keep defaults
        assert_eq!(config.search.embedding_backend, "hash");
        assert_eq!(config.index.embed_timeout_secs, 10);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "not = [valid").unwrap();

        let err = Config::load(None, dir.path()).unwrap_err();
        assert!(matches!(err, SksError::Config(_)));
    }

    #[test]
    fn resolved_roots_join_relative_entries() {
        let paths = SkillPathsConfig {
            roots: vec!["skills".to_string(), "/abs/skills".to_string()],
        };
        let resolved = paths.resolved(Path::new("/root/.skillset"));
        assert_eq!(resolved[0], Path::new("/root/.skillset/skills"));
        assert_eq!(resolved[1], Path::new("/abs/skills"));
    }

    #[test]
    fn write_default_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::write_default(&path).unwrap();

        let config = Config::load(Some(&path), dir.path()).unwrap();
        assert_eq!(config.search.embedding_dims, 384);
    }
}
