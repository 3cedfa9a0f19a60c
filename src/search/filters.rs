//! Search filters for post-fusion result filtering
//!
//! Filters narrow fused candidates before truncation:
//! - Category (exact, case-insensitive)
//! - Tags (any-match, case-insensitive)
//! - Toolchain (tag/category exact match, or substring of the compatibility
//!   note)

use crate::skills::model::Skill;

/// Search filters for narrowing results
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    /// Filter by toolchain (e.g. "python", "rust")
    pub toolchain: Option<String>,
    /// Filter by category
    pub category: Option<String>,
    /// Filter by tags (any-match - skill must have at least one matching tag)
    pub tags: Vec<String>,
}

impl SearchFilters {
    /// Create new empty filters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set toolchain filter
    pub fn with_toolchain(mut self, toolchain: impl Into<String>) -> Self {
        self.toolchain = Some(toolchain.into());
        self
    }

    /// Set category filter
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set tags filter
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Check if any filters are set
    pub fn is_empty(&self) -> bool {
        self.toolchain.is_none() && self.category.is_none() && self.tags.is_empty()
    }

    /// Check if a skill passes all filters
    pub fn matches(&self, skill: &Skill) -> bool {
        if let Some(ref category) = self.category {
            if !skill.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }

        if !self.tags.is_empty() {
            let any_match = self.tags.iter().any(|wanted| {
                skill
                    .tags
                    .iter()
                    .any(|tag| tag.eq_ignore_ascii_case(wanted))
            });
            if !any_match {
                return false;
            }
        }

        if let Some(ref toolchain) = self.toolchain {
            if !matches_toolchain(skill, toolchain) {
                return false;
            }
        }

        true
    }
}

fn matches_toolchain(skill: &Skill, toolchain: &str) -> bool {
    let needle = toolchain.to_lowercase();

    if skill.category.eq_ignore_ascii_case(&needle) {
        return true;
    }
    if skill.tags.iter().any(|tag| tag.eq_ignore_ascii_case(&needle)) {
        return true;
    }
    skill
        .compatibility
        .as_deref()
        .is_some_and(|compat| compat.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_skill(category: &str, tags: &[&str], compatibility: Option<&str>) -> Skill {
        let mut skill = Skill::new("test-skill", "Test Skill");
        skill.category = category.to_string();
        skill.tags = tags.iter().map(|t| (*t).to_string()).collect();
        skill.compatibility = compatibility.map(String::from);
        skill
    }

    #[test]
    fn empty_filters_match_all() {
        let filters = SearchFilters::new();
        assert!(filters.is_empty());
        assert!(filters.matches(&make_skill("testing", &["rust"], None)));
    }

    #[test]
    fn category_filter_is_case_insensitive_exact() {
        let filters = SearchFilters::new().with_category("Testing");
        assert!(filters.matches(&make_skill("testing", &[], None)));
        assert!(!filters.matches(&make_skill("deployment", &[], None)));
        // No substring match on category
        assert!(!filters.matches(&make_skill("testing-extras", &[], None)));
    }

    #[test]
    fn tags_filter_any_match() {
        let filters =
            SearchFilters::new().with_tags(vec!["rust".to_string(), "cli".to_string()]);

        assert!(filters.matches(&make_skill("x", &["rust", "web"], None)));
        assert!(filters.matches(&make_skill("x", &["CLI"], None)));
        assert!(!filters.matches(&make_skill("x", &["python"], None)));
    }

    #[test]
    fn toolchain_matches_tags_category_or_compatibility() {
        let filters = SearchFilters::new().with_toolchain("python");

        assert!(filters.matches(&make_skill("x", &["python"], None)));
        assert!(filters.matches(&make_skill("python", &[], None)));
        assert!(filters.matches(&make_skill("x", &[], Some("Python >= 3.10"))));
        assert!(!filters.matches(&make_skill("x", &["rust"], None)));
    }

    #[test]
    fn combined_filters_all_apply() {
        let filters = SearchFilters::new()
            .with_category("testing")
            .with_tags(vec!["rust".to_string()]);

        assert!(filters.matches(&make_skill("testing", &["rust"], None)));
        assert!(!filters.matches(&make_skill("testing", &["python"], None)));
        assert!(!filters.matches(&make_skill("deployment", &["rust"], None)));
    }
}
