//! Skill data structure

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A skill loaded from the corpus.
///
/// Immutable value type: the indexing engine replaces whole `Skill` records,
/// callers never mutate fields in place. `id` is unique across the corpus at
/// any point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    /// Stable unique identifier (kebab-case)
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Short description
    pub description: String,
    /// Markdown instruction body
    pub instructions: String,
    /// Single category (e.g. "testing")
    #[serde(default)]
    pub category: String,
    /// Tags for categorization
    #[serde(default)]
    pub tags: Vec<String>,
    /// Declared dependencies on other skills (ids or names)
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Declared related-skill links (ids or names)
    #[serde(default)]
    pub related: Vec<String>,
    /// Usage examples
    #[serde(default)]
    pub examples: Vec<String>,
    /// Path to the SKILL.md this was loaded from
    pub source_path: PathBuf,
    /// Repository/collection the skill belongs to
    #[serde(default)]
    pub repo_id: String,
    /// Version string
    #[serde(default)]
    pub version: String,
    /// Author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Free-form compatibility note (e.g. "python >= 3.10")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<String>,
    /// Unrecognized frontmatter keys, preserved for forward compatibility
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Skill {
    /// Create a minimal skill with the given id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            instructions: String::new(),
            category: String::new(),
            tags: vec![],
            dependencies: vec![],
            related: vec![],
            examples: vec![],
            source_path: PathBuf::new(),
            repo_id: String::new(),
            version: "0.1.0".to_string(),
            author: None,
            compatibility: None,
            extra: BTreeMap::new(),
        }
    }

    /// The text fed to the embedding provider for this skill.
    pub fn embedding_text(&self) -> String {
        let mut text = String::with_capacity(
            self.name.len() + self.description.len() + self.instructions.len() + 64,
        );
        text.push_str(&self.name);
        text.push('\n');
        text.push_str(&self.description);
        text.push('\n');
        text.push_str(&self.category);
        for tag in &self.tags {
            text.push(' ');
            text.push_str(tag);
        }
        text.push('\n');
        text.push_str(&self.instructions);
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_text_contains_metadata_and_body() {
        let mut skill = Skill::new("pytest-skill", "pytest");
        skill.description = "Professional pytest testing".to_string();
        skill.category = "testing".to_string();
        skill.tags = vec!["python".to_string(), "tdd".to_string()];
        skill.instructions = "# Pytest\n\nUse fixtures.".to_string();

        let text = skill.embedding_text();
        assert!(text.contains("pytest"));
        assert!(text.contains("testing python tdd"));
        assert!(text.contains("Use fixtures."));
    }
}
