//! Loader configuration.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding [`LoaderConfig::source_root`].
pub const SOURCE_ROOT_VAR: &str = "DECLAPI_SOURCE_ROOT";

/// Environment variable overriding [`LoaderConfig::extensions`], as a
/// comma-separated list.
pub const EXTENSIONS_VAR: &str = "DECLAPI_EXTENSIONS";

/// Where declaration sources live and which files hold them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Directory scanned recursively for declaration sources.
    pub source_root: PathBuf,
    /// File extensions (without the dot) that are scanned.
    pub extensions: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("data").join("api"),
            extensions: vec!["ts".to_string()],
        }
    }
}

impl LoaderConfig {
    /// Configuration rooted at `<project root>/data/api`.
    #[must_use]
    pub fn for_project(project_root: impl Into<PathBuf>) -> Self {
        Self::default().with_source_root(project_root.into().join("data").join("api"))
    }

    /// The default configuration, with [`SOURCE_ROOT_VAR`] and
    /// [`EXTENSIONS_VAR`] applied when set.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(root) = env::var_os(SOURCE_ROOT_VAR) {
            config.source_root = PathBuf::from(root);
        }
        if let Ok(extensions) = env::var(EXTENSIONS_VAR) {
            let parsed = parse_extensions(&extensions);
            if !parsed.is_empty() {
                config.extensions = parsed;
            }
        }
        config
    }

    /// Sets the source root.
    #[must_use]
    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = root.into();
        self
    }

    /// Replaces the scanned extensions.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one scanned extension.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extensions.push(extension.into());
        self
    }
}

fn parse_extensions(list: &str) -> Vec<String> {
    list.split(',')
        .map(|e| e.trim().trim_start_matches('.'))
        .filter(|e| !e.is_empty())
        .map(ToString::to_string)
        .collect()
}
