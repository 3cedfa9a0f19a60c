//! SKILL.md frontmatter parsing
//!
//! A SKILL.md is YAML frontmatter delimited by `---` lines followed by the
//! markdown instruction body. Unknown frontmatter keys are preserved in
//! `Skill::extra` rather than rejected.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, SksError};
use crate::skills::model::Skill;

static ID_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Normalize a skill name into a kebab-case id.
///
/// "FastAPI Testing" -> "fastapi-testing", "skill_with_underscores" ->
/// "skill-with-underscores".
pub fn normalize_skill_id(name: &str) -> String {
    let lowered = name.to_lowercase();
    ID_SEPARATORS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

#[derive(Debug, Default, Deserialize)]
struct Frontmatter {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    related: Vec<String>,
    #[serde(default)]
    examples: Vec<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    compatibility: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

/// Parse a SKILL.md into a `Skill`.
///
/// `repo_id` identifies the collection the file was discovered under.
pub fn parse_skill_md(content: &str, source_path: &Path, repo_id: &str) -> Result<Skill> {
    let (raw_frontmatter, body) = split_frontmatter(content).ok_or_else(|| {
        SksError::InvalidSkill(format!(
            "{}: missing YAML frontmatter",
            source_path.display()
        ))
    })?;

    let fm: Frontmatter = serde_yaml::from_str(raw_frontmatter).map_err(|err| {
        SksError::InvalidSkill(format!("{}: {err}", source_path.display()))
    })?;

    if fm.name.trim().is_empty() {
        return Err(SksError::InvalidSkill(format!(
            "{}: missing skill name",
            source_path.display()
        )));
    }

    let id = fm
        .id
        .as_deref()
        .map(normalize_skill_id)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| normalize_skill_id(&fm.name));
    if id.is_empty() {
        return Err(SksError::InvalidSkill(format!(
            "{}: name normalizes to an empty id",
            source_path.display()
        )));
    }

    let extra = fm
        .extra
        .into_iter()
        .filter_map(|(key, value)| yaml_to_string(&value).map(|v| (key, v)))
        .collect();

    Ok(Skill {
        id,
        name: fm.name.trim().to_string(),
        description: fm.description.trim().to_string(),
        instructions: body.trim().to_string(),
        category: fm.category.trim().to_string(),
        tags: fm.tags,
        dependencies: fm.dependencies.iter().map(|d| normalize_skill_id(d)).collect(),
        related: fm.related.iter().map(|r| normalize_skill_id(r)).collect(),
        examples: fm.examples,
        source_path: source_path.to_path_buf(),
        repo_id: repo_id.to_string(),
        version: fm.version.unwrap_or_else(|| "0.1.0".to_string()),
        author: fm.author,
        compatibility: fm.compatibility,
        extra,
    })
}

fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n"))?;
    let end = rest.find("\n---")?;
    let frontmatter = &rest[..end];
    let body = rest[end + 4..].trim_start_matches('\r');
    let body = body.strip_prefix('\n').unwrap_or(body);
    Some((frontmatter, body))
}

fn yaml_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(content: &str) -> Result<Skill> {
        parse_skill_md(content, &PathBuf::from("/corpus/test/SKILL.md"), "corpus")
    }

    #[test]
    fn parse_full_frontmatter() {
        let skill = parse(
            "---\n\
             name: Pytest Testing\n\
             description: Professional pytest testing\n\
             category: testing\n\
             tags: [python, pytest]\n\
             dependencies: [\"Python Basics\"]\n\
             related: [unittest]\n\
             version: 1.2.0\n\
             author: Test Author\n\
             ---\n\
             # Pytest\n\nUse fixtures.\n",
        )
        .unwrap();

        assert_eq!(skill.id, "pytest-testing");
        assert_eq!(skill.name, "Pytest Testing");
        assert_eq!(skill.category, "testing");
        assert_eq!(skill.tags, vec!["python", "pytest"]);
        assert_eq!(skill.dependencies, vec!["python-basics"]);
        assert_eq!(skill.related, vec!["unittest"]);
        assert_eq!(skill.version, "1.2.0");
        assert_eq!(skill.author.as_deref(), Some("Test Author"));
        assert!(skill.instructions.starts_with("# Pytest"));
        assert_eq!(skill.repo_id, "corpus");
    }

    #[test]
    fn explicit_id_wins_over_name() {
        let skill = parse(
            "---\nid: custom-id\nname: Something Else\ndescription: d\n---\nbody\n",
        )
        .unwrap();
        assert_eq!(skill.id, "custom-id");
    }

    #[test]
    fn unknown_keys_land_in_extra() {
        let skill = parse(
            "---\nname: extras\ndescription: d\nmaturity: beta\npriority: 3\n---\nbody\n",
        )
        .unwrap();
        assert_eq!(skill.extra.get("maturity").map(String::as_str), Some("beta"));
        assert_eq!(skill.extra.get("priority").map(String::as_str), Some("3"));
    }

    #[test]
    fn missing_frontmatter_is_invalid() {
        let err = parse("# Just a markdown file\n").unwrap_err();
        assert!(matches!(err, SksError::InvalidSkill(_)));
    }

    #[test]
    fn missing_name_is_invalid() {
        let err = parse("---\ndescription: d\n---\nbody\n").unwrap_err();
        assert!(matches!(err, SksError::InvalidSkill(_)));
    }

    #[test]
    fn id_normalization_cases() {
        assert_eq!(normalize_skill_id("FastAPI Testing"), "fastapi-testing");
        assert_eq!(normalize_skill_id("My Cool Skill!"), "my-cool-skill");
        assert_eq!(
            normalize_skill_id("skill_with_underscores"),
            "skill-with-underscores"
        );
        assert_eq!(normalize_skill_id("Multiple   Spaces"), "multiple-spaces");
    }
}
