//! Path management for decp-budget
//!
//! ## Path Resolution Order
//!
//! 1. `--base-dir` on the command line (if given)
//! 2. `DECP_BUDGET_HOME` environment variable (if set)
//! 3. The current working directory
//!
//! Relative input and output paths from the settings file are resolved
//! against the base directory.

use std::path::{Path, PathBuf};

use crate::error::DecpError;

/// Environment variable overriding the base directory
pub const HOME_ENV_VAR: &str = "DECP_BUDGET_HOME";

/// Manages all paths used by decp-budget
#[derive(Debug, Clone)]
pub struct DecpPaths {
    /// Directory that relative data paths are resolved against
    base_dir: PathBuf,
    /// Explicit settings file, if one was given
    settings_override: Option<PathBuf>,
}

impl DecpPaths {
    /// Create a new DecpPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no base directory is given and the current
    /// directory cannot be determined.
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self, DecpError> {
        let base_dir = match base_dir {
            Some(dir) => dir,
            None => match std::env::var(HOME_ENV_VAR) {
                Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
                _ => std::env::current_dir().map_err(|e| {
                    DecpError::Config(format!("Could not determine current directory: {}", e))
                })?,
            },
        };

        Ok(Self::with_base_dir(base_dir))
    }

    /// Create DecpPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            settings_override: None,
        }
    }

    /// Use an explicit settings file instead of the default location
    pub fn with_settings_file(mut self, path: PathBuf) -> Self {
        self.settings_override = Some(path);
        self
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        match &self.settings_override {
            Some(path) => self.resolve(path),
            None => self.base_dir.join("decp-budget.json"),
        }
    }

    /// Resolve a configured path against the base directory
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Check if a settings file exists
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DecpPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(
            paths.settings_file(),
            temp_dir.path().join("decp-budget.json")
        );
    }

    #[test]
    fn test_explicit_base_dir_wins() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DecpPaths::new(Some(temp_dir.path().to_path_buf())).unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());
    }

    #[test]
    fn test_resolve() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DecpPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(
            paths.resolve("data/decp/decp_augmente.csv"),
            temp_dir.path().join("data/decp/decp_augmente.csv")
        );

        let absolute = temp_dir.path().join("elsewhere.csv");
        assert_eq!(paths.resolve(&absolute), absolute);
    }

    #[test]
    fn test_settings_override() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DecpPaths::with_base_dir(temp_dir.path().to_path_buf())
            .with_settings_file(PathBuf::from("conf/run.json"));
        assert_eq!(paths.settings_file(), temp_dir.path().join("conf/run.json"));
        assert!(!paths.is_initialized());
    }
}
