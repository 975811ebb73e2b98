//! Lookup of the shared protobuf dependency module.
//!
//! Services may import definitions from a shared Go module. When the module
//! is a dependency of the project, its checkout directory is mounted into the
//! tools container and added to protoc's include path.

use crate::runner::CommandRunner;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Outcome of a dependency lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyLookup {
    /// No module configured
    NotConfigured,
    /// The module's directory on disk
    Found(PathBuf),
    /// The lookup failed: not a dependency, not downloaded, or no `go` tool
    Unavailable { module: String, reason: String },
}

impl DependencyLookup {
    /// The extra include directory, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            DependencyLookup::Found(path) => Some(path),
            _ => None,
        }
    }
}

/// Locates `module` with `go list -m -f {{.Dir}}`, run in `project_root` so
/// the project's own `go.mod` decides the version.
///
/// Failures are reported as [`DependencyLookup::Unavailable`], never as an
/// error.
pub fn resolve_dependency<R: CommandRunner + ?Sized>(
    runner: &R,
    project_root: &Path,
    module: Option<&str>,
) -> DependencyLookup {
    let Some(module) = module.filter(|m| !m.is_empty()) else {
        debug!("No dependency module configured");
        return DependencyLookup::NotConfigured;
    };

    let args = ["list", "-m", "-f", "{{.Dir}}", module].map(String::from);
    let reason = match runner.output(project_root, "go", &args) {
        Ok(dir) if !dir.trim().is_empty() => {
            let dir = PathBuf::from(dir.trim());
            info!("Using protobuf definitions from {} at {}", module, dir.display());
            return DependencyLookup::Found(dir);
        }
        Ok(_) => "module has no local directory".to_string(),
        Err(e) => e.to_string(),
    };

    debug!("Dependency {} not available: {}", module, reason);

    DependencyLookup::Unavailable {
        module: module.to_string(),
        reason,
    }
}
