//! Toolchain detection from project marker files
//!
//! Identifies project languages by scanning for marker files like
//! `Cargo.toml` or `package.json`, each with a confidence score, then sniffs
//! well-known frameworks out of the manifests it finds.

use std::path::Path;

use serde::Serialize;

/// Summary of a detected project toolchain.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolchainInfo {
    pub primary_language: Option<String>,
    pub secondary_languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub confidence: f32,
}

impl ToolchainInfo {
    /// All detected language names, primary first.
    pub fn languages(&self) -> Vec<String> {
        let mut languages = Vec::new();
        if let Some(primary) = &self.primary_language {
            languages.push(primary.clone());
        }
        languages.extend(self.secondary_languages.iter().cloned());
        languages
    }
}

/// Toolchain detection contract consumed by the recommendation router.
pub trait ToolchainDetector: Send + Sync {
    fn detect(&self, path: &Path) -> ToolchainInfo;
}

/// A marker file that indicates a language.
#[derive(Debug, Clone)]
struct LanguageMarker {
    /// File name or `*.ext` suffix pattern to match.
    pattern: &'static str,
    language: &'static str,
    /// How definitively this marker identifies the language (0.0-1.0).
    confidence: f32,
}

impl LanguageMarker {
    const fn new(pattern: &'static str, language: &'static str, confidence: f32) -> Self {
        Self {
            pattern,
            language,
            confidence,
        }
    }

    fn matches(&self, filename: &str) -> bool {
        if let Some(suffix) = self.pattern.strip_prefix('*') {
            filename.ends_with(suffix)
        } else {
            self.pattern == filename
        }
    }
}

/// Framework names sniffed from a manifest file's contents.
struct FrameworkProbe {
    manifest: &'static str,
    frameworks: &'static [&'static str],
}

/// Default detector with a built-in marker registry.
#[derive(Default)]
pub struct MarkerDetector;

impl MarkerDetector {
    pub fn new() -> Self {
        Self
    }
}

impl ToolchainDetector for MarkerDetector {
    fn detect(&self, path: &Path) -> ToolchainInfo {
        let filenames = list_filenames(path);

        // Highest-confidence marker per language
        let mut detected: Vec<(&'static str, f32)> = Vec::new();
        for marker in MARKERS {
            if !filenames.iter().any(|name| marker.matches(name)) {
                continue;
            }
            match detected.iter_mut().find(|(lang, _)| *lang == marker.language) {
                Some((_, confidence)) => *confidence = confidence.max(marker.confidence),
                None => detected.push((marker.language, marker.confidence)),
            }
        }
        detected.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });

        let mut languages = detected.iter().map(|(lang, _)| (*lang).to_string());
        let primary_language = languages.next();
        let secondary_languages: Vec<String> = languages.collect();
        let confidence = detected.first().map_or(0.0, |(_, c)| *c);

        ToolchainInfo {
            primary_language,
            secondary_languages,
            frameworks: sniff_frameworks(path, &filenames),
            confidence,
        }
    }
}

fn list_filenames(path: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(path) else {
        return Vec::new();
    };
    entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .collect()
}

fn sniff_frameworks(path: &Path, filenames: &[String]) -> Vec<String> {
    let mut frameworks = Vec::new();
    for probe in PROBES {
        if !filenames.iter().any(|name| name == probe.manifest) {
            continue;
        }
        let Ok(content) = std::fs::read_to_string(path.join(probe.manifest)) else {
            continue;
        };
        let lowered = content.to_lowercase();
        for framework in probe.frameworks {
            if lowered.contains(framework) && !frameworks.contains(&(*framework).to_string()) {
                frameworks.push((*framework).to_string());
            }
        }
    }
    frameworks.sort();
    frameworks
}

const MARKERS: &[LanguageMarker] = &[
    // Rust - definitive
    LanguageMarker::new("Cargo.toml", "rust", 1.0),
    // Node.js / JavaScript
    LanguageMarker::new("package.json", "javascript", 0.9),
    LanguageMarker::new("package-lock.json", "javascript", 0.8),
    LanguageMarker::new("yarn.lock", "javascript", 0.8),
    LanguageMarker::new("pnpm-lock.yaml", "javascript", 0.8),
    LanguageMarker::new("tsconfig.json", "typescript", 0.9),
    // Python
    LanguageMarker::new("pyproject.toml", "python", 1.0),
    LanguageMarker::new("setup.py", "python", 0.9),
    LanguageMarker::new("requirements.txt", "python", 0.8),
    LanguageMarker::new("Pipfile", "python", 0.9),
    LanguageMarker::new("uv.lock", "python", 0.9),
    // Go - definitive
    LanguageMarker::new("go.mod", "go", 1.0),
    LanguageMarker::new("go.sum", "go", 0.8),
    // Java / JVM
    LanguageMarker::new("pom.xml", "java", 1.0),
    LanguageMarker::new("build.gradle", "java", 0.9),
    LanguageMarker::new("build.gradle.kts", "kotlin", 0.9),
    // C# / .NET
    LanguageMarker::new("*.csproj", "csharp", 1.0),
    LanguageMarker::new("*.sln", "csharp", 0.9),
    // Ruby
    LanguageMarker::new("Gemfile", "ruby", 1.0),
    LanguageMarker::new("*.gemspec", "ruby", 0.9),
    // Elixir
    LanguageMarker::new("mix.exs", "elixir", 1.0),
    // PHP
    LanguageMarker::new("composer.json", "php", 1.0),
    // Swift
    LanguageMarker::new("Package.swift", "swift", 1.0),
    // C/C++
    LanguageMarker::new("CMakeLists.txt", "cpp", 0.9),
    LanguageMarker::new("meson.build", "cpp", 0.8),
    LanguageMarker::new("Makefile", "c", 0.6),
    // Zig
    LanguageMarker::new("build.zig", "zig", 1.0),
];

const PROBES: &[FrameworkProbe] = &[
    FrameworkProbe {
        manifest: "package.json",
        frameworks: &["react", "next", "vue", "svelte", "express", "jest", "vitest"],
    },
    FrameworkProbe {
        manifest: "pyproject.toml",
        frameworks: &["django", "fastapi", "flask", "pytest"],
    },
    FrameworkProbe {
        manifest: "requirements.txt",
        frameworks: &["django", "fastapi", "flask", "pytest"],
    },
    FrameworkProbe {
        manifest: "Cargo.toml",
        frameworks: &["axum", "actix-web", "tokio", "rocket"],
    },
    FrameworkProbe {
        manifest: "go.mod",
        frameworks: &["gin", "echo", "fiber"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn setup_project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let mut file = File::create(dir.path().join(name)).unwrap();
            write!(file, "{content}").unwrap();
        }
        dir
    }

    #[test]
    fn detect_rust_project() {
        let dir = setup_project(&[("Cargo.toml", "[package]\nname = \"x\"\n")]);
        let info = MarkerDetector::new().detect(dir.path());

        assert_eq!(info.primary_language.as_deref(), Some("rust"));
        assert!((info.confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn detect_python_project_with_frameworks() {
        let dir = setup_project(&[(
            "pyproject.toml",
            "[project]\ndependencies = [\"fastapi\", \"pytest\"]\n",
        )]);
        let info = MarkerDetector::new().detect(dir.path());

        assert_eq!(info.primary_language.as_deref(), Some("python"));
        assert_eq!(info.frameworks, vec!["fastapi", "pytest"]);
    }

    #[test]
    fn detect_multi_language_project() {
        let dir = setup_project(&[
            ("Cargo.toml", "[package]\n"),
            ("package.json", "{\"dependencies\": {\"react\": \"18\"}}"),
        ]);
        let info = MarkerDetector::new().detect(dir.path());

        // Rust marker is definitive, JS trails as secondary
        assert_eq!(info.primary_language.as_deref(), Some("rust"));
        assert!(info
            .secondary_languages
            .contains(&"javascript".to_string()));
        assert!(info.frameworks.contains(&"react".to_string()));
    }

    #[test]
    fn suffix_markers_match() {
        let dir = setup_project(&[("MyApp.csproj", "<Project/>")]);
        let info = MarkerDetector::new().detect(dir.path());
        assert_eq!(info.primary_language.as_deref(), Some("csharp"));
    }

    #[test]
    fn empty_directory_detects_nothing() {
        let dir = TempDir::new().unwrap();
        let info = MarkerDetector::new().detect(dir.path());

        assert!(info.primary_language.is_none());
        assert!(info.secondary_languages.is_empty());
        assert_eq!(info.confidence, 0.0);
    }

    #[test]
    fn languages_lists_primary_first() {
        let info = ToolchainInfo {
            primary_language: Some("python".to_string()),
            secondary_languages: vec!["javascript".to_string()],
            frameworks: vec![],
            confidence: 0.9,
        };
        assert_eq!(info.languages(), vec!["python", "javascript"]);
    }

    #[test]
    fn highest_confidence_marker_wins_per_language() {
        // Both requirements.txt (0.8) and pyproject.toml (1.0) present
        let dir = setup_project(&[
            ("requirements.txt", "flask\n"),
            ("pyproject.toml", "[project]\n"),
        ]);
        let info = MarkerDetector::new().detect(dir.path());
        assert!((info.confidence - 1.0).abs() < 1e-6);
        assert_eq!(info.secondary_languages.len(), 0);
    }
}
