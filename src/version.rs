//! Version string for generated API documentation.

use crate::runner::CommandRunner;
use log::{debug, warn};
use std::path::Path;

/// Version used when neither an override nor a git tag is available.
pub const FALLBACK_VERSION: &str = "v0.0.0";

/// Where a resolved version came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSource {
    /// Taken verbatim from configuration
    Override,
    /// Nearest tag reported by `git describe`
    Tag,
    /// `git describe` failed; the reason is kept for logging
    Fallback { reason: String },
}

/// A non-empty version string together with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub value: String,
    pub source: VersionSource,
}

/// Resolves the documentation version.
///
/// A non-empty `version_override` wins. Otherwise the nearest reachable git
/// tag of the repository containing `project_root` is used, and any failure
/// of that lookup falls back to [`FALLBACK_VERSION`].
pub fn resolve_version<R: CommandRunner + ?Sized>(
    runner: &R,
    project_root: &Path,
    version_override: Option<&str>,
) -> ResolvedVersion {
    if let Some(version) = version_override.filter(|v| !v.is_empty()) {
        debug!("Using version override {}", version);
        return ResolvedVersion {
            value: version.to_string(),
            source: VersionSource::Override,
        };
    }

    let args = ["describe", "--tags", "HEAD"].map(String::from);
    let reason = match runner.output(project_root, "git", &args) {
        Ok(out) if !out.trim().is_empty() => {
            let value = out.trim().to_string();
            debug!("Using version {} from git", value);
            return ResolvedVersion {
                value,
                source: VersionSource::Tag,
            };
        }
        Ok(_) => "git describe printed nothing".to_string(),
        Err(e) => e.to_string(),
    };

    warn!("Could not describe version from git ({}), using {}", reason, FALLBACK_VERSION);

    ResolvedVersion {
        value: FALLBACK_VERSION.to_string(),
        source: VersionSource::Fallback { reason },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use std::cell::RefCell;

    const PROJECT: &str = "/srv/projects/news";

    /// Answers every `output` call with a fixed result and records arguments.
    struct FixedRunner {
        answer: fn() -> Result<String>,
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl FixedRunner {
        fn new(answer: fn() -> Result<String>) -> Self {
            Self {
                answer,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for FixedRunner {
        fn run(&self, _program: &str, _args: &[String]) -> Result<()> {
            unreachable!("version lookup only captures output")
        }

        fn output(&self, dir: &Path, program: &str, args: &[String]) -> Result<String> {
            let mut call = vec![dir.display().to_string(), program.to_string()];
            call.extend(args.iter().cloned());
            self.calls.borrow_mut().push(call);
            (self.answer)()
        }
    }

    #[test]
    fn test_override_wins_without_running_git() {
        let runner = FixedRunner::new(|| Ok("v9.9.9".to_string()));
        let resolved = resolve_version(&runner, Path::new(PROJECT), Some("v2.0.0-rc1"));

        assert_eq!(resolved.value, "v2.0.0-rc1");
        assert_eq!(resolved.source, VersionSource::Override);
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_tag_is_used_and_trimmed() {
        let runner = FixedRunner::new(|| Ok("v1.4.0-3-gabc1234 \n".to_string()));
        let resolved = resolve_version(&runner, Path::new(PROJECT), None);

        assert_eq!(resolved.value, "v1.4.0-3-gabc1234");
        assert_eq!(resolved.source, VersionSource::Tag);
        assert_eq!(
            runner.calls.borrow()[0],
            vec![PROJECT, "git", "describe", "--tags", "HEAD"]
        );
    }

    #[test]
    fn test_git_failure_falls_back() {
        let runner = FixedRunner::new(|| {
            Err(Error::CommandFailed {
                command: "git describe --tags HEAD".to_string(),
                code: Some(128),
            })
        });
        let resolved = resolve_version(&runner, Path::new(PROJECT), None);

        assert_eq!(resolved.value, "v0.0.0");
        assert!(matches!(resolved.source, VersionSource::Fallback { .. }));
    }

    #[test]
    fn test_empty_git_output_falls_back() {
        let runner = FixedRunner::new(|| Ok(String::new()));
        let resolved = resolve_version(&runner, Path::new(PROJECT), None);

        assert_eq!(resolved.value, FALLBACK_VERSION);
    }

    #[test]
    fn test_empty_override_asks_git() {
        let runner = FixedRunner::new(|| Ok("v3.1.0".to_string()));
        let resolved = resolve_version(&runner, Path::new(PROJECT), Some(""));

        assert_eq!(resolved.value, "v3.1.0");
        assert_eq!(runner.calls.borrow().len(), 1);
    }
}
