//! Project configuration loaded from `.broomrc.toml`.
//!
//! The file is optional and lives in the analysed directory. Every value it
//! sets can be overridden on the command line.
//!
//! # Example Configuration
//!
//! ```toml
//! [scanner]
//! ignore = ["build", "migrations"]
//!
//! [search]
//! workers = 8
//!
//! [output]
//! format = "table"
//! color = false
//! ```

use serde::Deserialize;
use std::path::Path;

/// File name looked up in the analysed root.
pub const CONFIG_FILE: &str = ".broomrc.toml";

/// Root configuration structure. All sections are optional.
#[derive(Debug, Deserialize, Default)]
pub struct BroomConfig {
    /// Directory walking.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Usage search.
    #[serde(default)]
    pub search: SearchConfig,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Scanner configuration controlling file discovery.
#[derive(Debug, Deserialize, Default)]
pub struct ScannerConfig {
    /// Extra directory names pruned during the walk, on top of the built-in
    /// `.git`, `__pycache__`, `.venv`, `venv` and `node_modules`.
    ///
    /// A trailing `/` is accepted and ignored.
    #[serde(default)]
    pub ignore: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchConfig {
    /// Maximum number of concurrent searches. Defaults to one per CPU.
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Output formatting preferences.
///
/// Distinct from the runtime `OutputConfig` in the output module, which
/// drives rendering. `--format` and `--no-color` take precedence.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Default report format: `console`, `json`, `table`, `vimgrep` or `graphviz`.
    #[serde(default)]
    pub format: Option<String>,

    /// Force colors on or off. Unset means auto-detect from the terminal.
    #[serde(default)]
    pub color: Option<bool>,
}

impl BroomConfig {
    /// Load `.broomrc.toml` from `root`.
    ///
    /// A missing file yields defaults. Read and parse errors are logged as
    /// warnings and also yield defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    pub fn ignored_dirs(&self) -> &[String] {
        &self.scanner.ignore
    }

    pub fn workers(&self) -> Option<usize> {
        self.search.workers
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Returns the configured value, or `None` to use auto-detection.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = BroomConfig::default();
        assert!(config.ignored_dirs().is_empty());
        assert!(config.workers().is_none());
        assert!(config.default_format().is_none());
        assert!(config.use_color().is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[scanner]
ignore = ["build/", "migrations"]

[search]
workers = 4

[output]
format = "json"
color = false
"#;
        let config: BroomConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.ignored_dirs(), ["build/", "migrations"]);
        assert_eq!(config.workers(), Some(4));
        assert_eq!(config.default_format(), Some("json"));
        assert_eq!(config.use_color(), Some(false));
    }

    #[test]
    fn test_partial_config() {
        let config: BroomConfig = toml::from_str("[search]\nworkers = 2\n").unwrap();
        assert_eq!(config.workers(), Some(2));
        assert!(config.ignored_dirs().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = BroomConfig::load(dir.path());
        assert!(config.default_format().is_none());
    }

    #[test]
    fn test_load_from_root() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[output]\nformat = \"vimgrep\"\n",
        )
        .unwrap();
        let config = BroomConfig::load(dir.path());
        assert_eq!(config.default_format(), Some("vimgrep"));
    }

    #[test]
    fn test_load_invalid_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[search\nworkers = ").unwrap();
        let config = BroomConfig::load(dir.path());
        assert!(config.workers().is_none());
    }
}
