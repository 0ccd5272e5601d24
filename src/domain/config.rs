use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::ArtifactKind;

/// The location of the configuration file, relative to the workspace root.
pub const CONFIG_PATH: &str = ".reqspec/config.toml";

/// Workspace configuration.
///
/// Controls how snapshot files are discovered and where exports go by
/// default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The file name suffix of snapshot files, without the leading dot.
    extension: String,

    /// Paths matching this regular expression are skipped during discovery.
    omit: Option<String>,

    /// Whether discovery descends into subdirectories.
    pub recursive: bool,

    /// Default destination directory for exports.
    ///
    /// When unset, exports go to a `generated` directory next to the source.
    pub destination: Option<PathBuf>,

    /// The artifact kind exported when none is given.
    pub export_kind: ArtifactKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            omit: None,
            recursive: true,
            destination: None,
            export_kind: ArtifactKind::Goal,
        }
    }
}

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("failed to access config file {path}: {source}")]
    Io {
        /// The config file path.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// The file is not valid TOML, or has unexpected fields.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// The config file path.
        path: PathBuf,
        /// The underlying error.
        source: toml::de::Error,
    },
    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// The omit pattern is not a valid regular expression.
    #[error("invalid omit pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the configuration for a workspace root, falling back to the
    /// defaults if the root has no config file.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub fn load_or_default(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_PATH);
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// Parent directories are created if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, content).map_err(io_error)
    }

    /// The file name suffix of snapshot files, without the leading dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Sets the snapshot file suffix. A leading dot is stripped.
    pub fn set_extension(&mut self, extension: &str) {
        self.extension = extension.trim_start_matches('.').to_string();
    }

    /// The raw omit pattern, if configured.
    #[must_use]
    pub fn omit(&self) -> Option<&str> {
        self.omit.as_deref()
    }

    /// Sets the omit pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if the pattern is not a valid regular
    /// expression. The previous pattern is kept.
    pub fn set_omit(&mut self, pattern: Option<String>) -> Result<(), ConfigError> {
        if let Some(pattern) = &pattern {
            regex::Regex::new(pattern)?;
        }
        self.omit = pattern;
        Ok(())
    }

    /// The compiled omit pattern, if configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if the stored pattern is invalid.
    pub fn omit_pattern(&self) -> Result<Option<regex::Regex>, ConfigError> {
        Ok(self.omit.as_deref().map(regex::Regex::new).transpose()?)
    }
}

fn default_extension() -> String {
    "reqspec.yaml".to_string()
}

const fn default_recursive() -> bool {
    true
}

const fn default_export_kind() -> ArtifactKind {
    ArtifactKind::Goal
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_extension")]
        extension: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        omit: Option<String>,

        #[serde(default = "default_recursive")]
        recursive: bool,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        destination: Option<PathBuf>,

        #[serde(default = "default_export_kind")]
        export_kind: ArtifactKind,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                extension,
                omit,
                recursive,
                destination,
                export_kind,
            } => Self {
                extension,
                omit,
                recursive,
                destination,
                export_kind,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            extension: config.extension,
            omit: config.omit,
            recursive: config.recursive,
            destination: config.destination,
            export_kind: config.export_kind,
        }
    }
}
