//! Shared fixtures for integration tests

use std::path::{Path, PathBuf};

/// Write a SKILL.md under `root/<repo>/<id>/SKILL.md` and return its path.
pub fn write_skill_md(root: &Path, repo: &str, id: &str, frontmatter_body: &str) -> PathBuf {
    let dir = root.join(repo).join(id);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("SKILL.md");
    std::fs::write(&path, frontmatter_body).unwrap();
    path
}

/// A minimal valid SKILL.md with the given metadata.
pub fn skill_md(name: &str, description: &str, category: &str, tags: &[&str]) -> String {
    let tags_yaml = if tags.is_empty() {
        "tags: []".to_string()
    } else {
        format!("tags: [{}]", tags.join(", "))
    };
    format!(
        "---\n\
         name: {name}\n\
         description: {description}\n\
         category: {category}\n\
         {tags_yaml}\n\
         ---\n\
         # {name}\n\n\
         Instructions for {name}.\n"
    )
}
