//! uscript_options: lint options and the `uscript.json` project file.
//!
//! Every field has a default, so a partial or missing configuration file
//! behaves like the full default one.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project configuration file looked up by the batch driver.
pub const CONFIG_FILE_NAME: &str = "uscript.json";

/// How one level of indentation is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    #[default]
    Tab,
    Space,
}

/// Rule toggles and formatting settings for the lint engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LintOptions {
    pub indent_style: IndentStyle,
    /// Spaces per level when `indent_style` is `space`.
    pub indent_size: u8,

    // -- Whole-tree rules --
    pub parse_errors: bool,
    pub class_name_matches_file: bool,
    pub newline_before_function: bool,
    pub redundant_default_value: bool,
    pub return_value: bool,
    pub unused_local: bool,
    pub condition_spacing: bool,
    pub missing_semicolon: bool,
    pub indentation: bool,

    // -- Token rules --
    pub keyword_casing: bool,
    pub literal_casing: bool,
    pub string_escapes: bool,
    pub name_literal: bool,
    pub brace_on_own_line: bool,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            indent_style: IndentStyle::Tab,
            indent_size: 4,
            parse_errors: true,
            class_name_matches_file: true,
            newline_before_function: true,
            redundant_default_value: true,
            return_value: true,
            unused_local: true,
            condition_spacing: true,
            missing_semicolon: true,
            indentation: true,
            keyword_casing: true,
            literal_casing: true,
            string_escapes: true,
            name_literal: true,
            brace_on_own_line: true,
        }
    }
}

impl LintOptions {
    /// Options with every rule switched off.
    pub fn none() -> Self {
        Self {
            parse_errors: false,
            class_name_matches_file: false,
            newline_before_function: false,
            redundant_default_value: false,
            return_value: false,
            unused_local: false,
            condition_spacing: false,
            missing_semicolon: false,
            indentation: false,
            keyword_casing: false,
            literal_casing: false,
            string_escapes: false,
            name_literal: false,
            brace_on_own_line: false,
            ..Self::default()
        }
    }

    /// The text of one indentation level.
    pub fn indent_unit(&self) -> String {
        match self.indent_style {
            IndentStyle::Tab => "\t".to_string(),
            IndentStyle::Space => " ".repeat(self.indent_size as usize),
        }
    }

    /// The whitespace for `level` indentation levels.
    pub fn indent(&self, level: u32) -> String {
        self.indent_unit().repeat(level as usize)
    }
}

/// The `uscript.json` file structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    /// Directories or files to scan, relative to the configuration file.
    pub include: Vec<String>,
    /// Paths containing any of these substrings are skipped.
    pub exclude: Vec<String>,
    /// File extensions treated as source, without the dot.
    pub extensions: Vec<String>,
    /// Worker threads; `None` uses one per core.
    pub jobs: Option<usize>,
    pub lint: LintOptions,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            include: vec![".".to_string()],
            exclude: Vec::new(),
            extensions: vec!["uc".to_string()],
            jobs: None,
            lint: LintOptions::default(),
        }
    }
}

impl ProjectConfig {
    /// Whether a path has one of the configured source extensions.
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Whether a path matches one of the exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let text = path.to_string_lossy().replace('\\', "/");
        self.exclude.iter().any(|pattern| !pattern.is_empty() && text.contains(pattern.as_str()))
    }
}

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("indentSize must be between 1 and 16, got {0}")]
    InvalidIndentSize(u8),
}

/// Parse a `uscript.json` document.
pub fn parse_project_config(content: &str, path: &Path) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if !(1..=16).contains(&config.lint.indent_size) {
        return Err(ConfigError::InvalidIndentSize(config.lint.indent_size));
    }
    Ok(config)
}

/// Load a configuration file. A missing file yields the defaults.
pub fn load_project_config(path: &Path) -> Result<ProjectConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_project_config(&content, path),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(ProjectConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Walk up from `start` looking for `uscript.json`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_project_config(
            r#"{ "exclude": ["Generated"], "lint": { "unusedLocal": false, "indentStyle": "space" } }"#,
            Path::new("uscript.json"),
        )
        .unwrap();
        assert_eq!(config.extensions, vec!["uc"]);
        assert_eq!(config.exclude, vec!["Generated"]);
        assert!(!config.lint.unused_local);
        assert!(config.lint.indentation);
        assert_eq!(config.lint.indent_unit(), "    ");
    }

    #[test]
    fn test_malformed_config() {
        let err = parse_project_config("{ \"jobs\": \"many\" }", Path::new("uscript.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let err = parse_project_config(r#"{ "lint": { "indentSize": 0 } }"#, Path::new("uscript.json")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidIndentSize(0)));
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = load_project_config(Path::new("definitely/not/here/uscript.json")).unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_source_filters() {
        let config = ProjectConfig {
            exclude: vec!["Classes/Old".to_string()],
            ..ProjectConfig::default()
        };
        assert!(config.is_source_file(Path::new("Game/Classes/Pawn.UC")));
        assert!(!config.is_source_file(Path::new("Game/Classes/Pawn.txt")));
        assert!(config.is_excluded(Path::new("Game/Classes/Old/Pawn.uc")));
        assert!(!config.is_excluded(Path::new("Game/Classes/Pawn.uc")));
    }

    #[test]
    fn test_indent_levels() {
        let options = LintOptions::default();
        assert_eq!(options.indent(2), "\t\t");
        assert!(!LintOptions::none().indentation);
        assert_eq!(LintOptions::none().indent_style, IndentStyle::Tab);
    }
}
