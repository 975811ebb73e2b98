//! Pipeline configuration.
//!
//! Everything the generation pipeline needs to know about its environment is
//! carried by [`GeneratorConfig`]. Environment variables and the current user
//! are read by the binary and copied in here, so library code never consults
//! process-global state.

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Image providing `protoc` with the Go, Twirp and OpenAPI 3 plugins.
pub const DEFAULT_TOOLS_IMAGE: &str = "ghcr.io/ttab/elephant-twirptools:v8.1.3-1";

/// Module holding shared protobuf definitions that services may import.
pub const DEFAULT_DEPENDENCY_MODULE: &str = "github.com/ttab/elephant-api";

pub const DEFAULT_PACKAGE_PREFIX: &str = "ttab";

pub const DEFAULT_DOMAIN: &str = "tt.se";

/// Numeric user and group that generated files should be owned by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub uid: u32,
    pub gid: u32,
}

impl UserIdentity {
    /// Identity of the running process.
    #[cfg(unix)]
    pub fn current() -> Option<Self> {
        use nix::unistd::{getgid, getuid};

        Some(Self {
            uid: getuid().as_raw(),
            gid: getgid().as_raw(),
        })
    }

    #[cfg(not(unix))]
    pub fn current() -> Option<Self> {
        None
    }
}

/// Settings for service generation and stub scaffolding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Project directory; mounted into the tools container
    pub project_root: PathBuf,
    /// Container image used to run protoc
    pub tools_image: String,
    /// First component of the protobuf package in generated stubs
    pub package_prefix: String,
    /// Domain used for the production and staging server URLs
    pub domain: String,
    /// Go module with shared protobuf definitions, `None` disables the lookup
    pub dependency_module: Option<String>,
    /// Version written to the API documentation instead of the git tag
    pub version_override: Option<String>,
    /// Owner for generated files, `None` runs the container as its default user
    pub user: Option<UserIdentity>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            tools_image: DEFAULT_TOOLS_IMAGE.to_string(),
            package_prefix: DEFAULT_PACKAGE_PREFIX.to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
            dependency_module: Some(DEFAULT_DEPENDENCY_MODULE.to_string()),
            version_override: None,
            user: None,
        }
    }
}

impl GeneratorConfig {
    /// Creates a default configuration rooted at `project_root`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    /// Loads a configuration from a YAML file. Missing keys take their
    /// default values.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());

        let content =
            fs::read_to_string(path).map_err(|e| Error::io("read config file", path, e))?;

        Self::from_yaml_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub(crate) fn from_yaml_str(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// The configured version override, ignoring empty strings.
    pub fn version_override(&self) -> Option<&str> {
        self.version_override
            .as_deref()
            .filter(|version| !version.is_empty())
    }
}
