use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub target_directory: PathBuf,
    pub ignore_patterns: Vec<String>,
    pub file_extensions: Vec<String>,
    pub max_file_size: usize,
    pub respect_gitignore: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_directory: PathBuf::from("."),
            ignore_patterns: vec![
                ".git".to_string(),
                ".gradle".to_string(),
                ".idea".to_string(),
                "build".to_string(),
                "out".to_string(),
                "*.class".to_string(),
            ],
            file_extensions: vec!["kt".to_string()],
            max_file_size: 1024 * 1024, // 1MB
            respect_gitignore: true,
        }
    }
}

impl Config {
    /// Config rooted at `target_directory`, everything else default.
    pub fn for_directory(target_directory: impl Into<PathBuf>) -> Self {
        Self {
            target_directory: target_directory.into(),
            ..Self::default()
        }
    }

    /// Get the default config file path (~/.koin-graph.toml)
    pub fn default_config_path() -> crate::Result<PathBuf> {
        let home_dir = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(PathBuf::from(home_dir).join(".koin-graph.toml"))
    }

    /// Load config from the default location, falling back to defaults if the file doesn't exist
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            info!("Loading configuration from {}", config_path.display());
            Self::from_file(&config_path)
        } else {
            info!("No config file found at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    /// Load config from a specific file path
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to a file
    pub fn to_file(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Whether `extension` (without the dot) is one of the scanned source extensions
    pub fn is_source_extension(&self, extension: &str) -> bool {
        self.file_extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }

    /// Create a config file with all available options documented
    pub fn create_documented_config() -> String {
        r#"# koin-graph configuration file
# Controls which files are scanned for Koin modules and class declarations

# Directory to scan (defaults to current directory)
target_directory = "."

# Patterns to ignore while walking the tree: directory names,
# "*.ext" globs, or simple wildcards such as "generated*"
ignore_patterns = [
    ".git",
    ".gradle",
    ".idea",
    "build",
    "out",
    "*.class"
]

# Extensions of Kotlin sources (module files and class lookups)
file_extensions = ["kt"]

# Files larger than this many bytes are skipped (default 1MB)
max_file_size = 1048576

# Honor .gitignore, global git excludes and .git/info/exclude
respect_gitignore = true
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_documented_config_parses_to_defaults() {
        let parsed: Config = toml::from_str(&Config::create_documented_config()).unwrap();
        let defaults = Config::default();

        assert_eq!(parsed.target_directory, defaults.target_directory);
        assert_eq!(parsed.ignore_patterns, defaults.ignore_patterns);
        assert_eq!(parsed.file_extensions, defaults.file_extensions);
        assert_eq!(parsed.max_file_size, defaults.max_file_size);
        assert_eq!(parsed.respect_gitignore, defaults.respect_gitignore);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("koin-graph.toml");
        std::fs::write(&path, "target_directory = \"app/src\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.target_directory, PathBuf::from("app/src"));
        assert_eq!(config.file_extensions, vec!["kt".to_string()]);
        assert!(config.respect_gitignore);
    }

    #[test]
    fn test_to_file_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::for_directory("/projects/app");
        config.max_file_size = 42;

        config.to_file(&path).unwrap();
        let reloaded = Config::from_file(&path).unwrap();
        assert_eq!(reloaded.target_directory, PathBuf::from("/projects/app"));
        assert_eq!(reloaded.max_file_size, 42);
    }

    #[test]
    fn test_source_extension_is_case_insensitive() {
        let config = Config::default();
        assert!(config.is_source_extension("kt"));
        assert!(config.is_source_extension("KT"));
        assert!(!config.is_source_extension("java"));
    }
}
