//! protoc invocation inside the tools container.
//!
//! The project directory is mounted at [`CONTAINER_WORKDIR`] and used as the
//! working directory, so every path handed to protoc is relative to the
//! project root. The shared dependency directory, when one was found, is
//! mounted at its own absolute path so the same path works on both sides.

use crate::config::{GeneratorConfig, UserIdentity};
use crate::error::{Error, Result};
use crate::fsutil::ensure_directory;
use crate::runner::CommandRunner;
use crate::scanner::ServiceDefinition;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Mount point of the project inside the container.
pub const CONTAINER_WORKDIR: &str = "/usr/src";

/// Directory that receives the OpenAPI documents.
pub const DOCS_DIR: &str = "docs";

/// Path of the OpenAPI document generated for `service`, relative to the
/// project root.
pub fn openapi_path(service: &str) -> PathBuf {
    Path::new(DOCS_DIR).join(format!("{}-openapi.json", service))
}

/// Everything needed to generate one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub service: ServiceDefinition,
    pub version: String,
    /// Protocol root relative to the project root
    pub proto_root: PathBuf,
    /// Extra include directory from the shared dependency module
    pub dependency_dir: Option<PathBuf>,
}

impl GenerationRequest {
    /// Arguments for protoc, starting after the program name.
    pub fn protoc_args(&self) -> Vec<String> {
        let root = self.proto_root.display().to_string();

        let mut args = vec!["-I".to_string(), root.clone()];

        if let Some(dir) = &self.dependency_dir {
            args.push("-I".to_string());
            args.push(dir.display().to_string());
        }

        args.push(format!("--go_out={}", root));
        args.push("--go_opt=paths=source_relative".to_string());
        args.push(format!("--twirp_out={}", root));
        args.push("--twirp_opt=paths=source_relative".to_string());
        args.push(format!("--openapi3_out=./{}", DOCS_DIR));
        args.push(format!(
            "--openapi3_opt=application={},version={}",
            self.service.name, self.version
        ));

        args.extend(
            self.service
                .proto_files
                .iter()
                .map(|p| p.display().to_string()),
        );

        args
    }
}

/// `docker run` wrapper for the tools image.
#[derive(Debug, Clone)]
pub struct ToolsContainer {
    image: String,
    project_root: PathBuf,
    user: Option<UserIdentity>,
}

impl ToolsContainer {
    /// Builds the container settings from the configuration. The project
    /// root is made absolute since docker only accepts absolute bind mounts.
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let project_root = std::path::absolute(&config.project_root)
            .map_err(|e| Error::io("resolve project directory", &config.project_root, e))?;

        Ok(Self {
            image: config.tools_image.clone(),
            project_root,
            user: config.user,
        })
    }

    /// Absolute project directory mounted into the container.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Arguments for `docker` running `command` in the tools image, with each
    /// of `extra_mounts` bound read/write at its own path.
    pub fn docker_args(&self, extra_mounts: &[&Path], command: &[String]) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "--rm".to_string(),
            "-v".to_string(),
            format!("{}:{}", self.project_root.display(), CONTAINER_WORKDIR),
            "-w".to_string(),
            CONTAINER_WORKDIR.to_string(),
        ];

        if let Some(user) = self.user {
            args.push("-u".to_string());
            args.push(format!("{}:{}", user.uid, user.gid));
        }

        for mount in extra_mounts {
            args.push("-v".to_string());
            args.push(format!("{0}:{0}", mount.display()));
        }

        args.push(self.image.clone());
        args.extend(command.iter().cloned());
        args
    }

    /// Runs `command` in the tools image.
    pub fn run<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        extra_mounts: &[&Path],
        command: &[String],
    ) -> Result<()> {
        runner.run("docker", &self.docker_args(extra_mounts, command))
    }
}

/// Runs protoc for one service.
///
/// Creates the service directory and the docs directory first. Returns the
/// project-relative path of the OpenAPI document protoc was asked to write.
pub fn invoke<R: CommandRunner + ?Sized>(
    runner: &R,
    container: &ToolsContainer,
    request: &GenerationRequest,
) -> Result<PathBuf> {
    let name = &request.service.name;
    let project_root = &container.project_root;

    ensure_directory(&project_root.join(&request.proto_root).join(name))?;
    ensure_directory(&project_root.join(DOCS_DIR))?;

    let mut command = vec!["protoc".to_string()];
    command.extend(request.protoc_args());
    debug!("protoc arguments for {}: {:?}", name, &command[1..]);

    let mounts: Vec<&Path> = request.dependency_dir.as_deref().into_iter().collect();

    info!("Running protoc for service {} (version {})", name, request.version);
    container.run(runner, &mounts, &command)?;

    Ok(openapi_path(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::command_line;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
        fail: bool,
    }

    impl CommandRunner for Recorder {
        fn run(&self, program: &str, args: &[String]) -> Result<()> {
            self.calls.borrow_mut().push(command_line(program, args));
            if self.fail {
                return Err(Error::CommandFailed {
                    command: program.to_string(),
                    code: Some(1),
                });
            }
            Ok(())
        }

        fn output(&self, _dir: &Path, _program: &str, _args: &[String]) -> Result<String> {
            Ok(String::new())
        }
    }

    fn request(dependency_dir: Option<&str>) -> GenerationRequest {
        GenerationRequest {
            service: ServiceDefinition {
                name: "news".to_string(),
                proto_files: vec![PathBuf::from("rpc/news/service.proto")],
            },
            version: "v1.2.0".to_string(),
            proto_root: PathBuf::from("rpc"),
            dependency_dir: dependency_dir.map(PathBuf::from),
        }
    }

    fn container(root: &Path, user: Option<UserIdentity>) -> ToolsContainer {
        let config = GeneratorConfig {
            tools_image: "tools:test".to_string(),
            user,
            ..GeneratorConfig::new(root)
        };
        ToolsContainer::new(&config).unwrap()
    }

    #[test]
    fn test_protoc_args() {
        assert_eq!(
            request(None).protoc_args(),
            vec![
                "-I",
                "rpc",
                "--go_out=rpc",
                "--go_opt=paths=source_relative",
                "--twirp_out=rpc",
                "--twirp_opt=paths=source_relative",
                "--openapi3_out=./docs",
                "--openapi3_opt=application=news,version=v1.2.0",
                "rpc/news/service.proto",
            ]
        );
    }

    #[test]
    fn test_protoc_args_with_dependency() {
        let args = request(Some("/go/pkg/mod/elephant-api@v1")).protoc_args();

        assert_eq!(&args[..4], &["-I", "rpc", "-I", "/go/pkg/mod/elephant-api@v1"]);
    }

    #[test]
    fn test_docker_args() {
        let temp_dir = TempDir::new().unwrap();
        let container = container(temp_dir.path(), Some(UserIdentity { uid: 1000, gid: 1001 }));
        let dep = Path::new("/deps/api");

        let args = container.docker_args(&[dep], &["protoc".to_string()]);

        assert_eq!(
            args,
            vec![
                "run".to_string(),
                "--rm".to_string(),
                "-v".to_string(),
                format!("{}:/usr/src", temp_dir.path().display()),
                "-w".to_string(),
                "/usr/src".to_string(),
                "-u".to_string(),
                "1000:1001".to_string(),
                "-v".to_string(),
                "/deps/api:/deps/api".to_string(),
                "tools:test".to_string(),
                "protoc".to_string(),
            ]
        );
    }

    #[test]
    fn test_docker_args_without_user() {
        let temp_dir = TempDir::new().unwrap();
        let args = container(temp_dir.path(), None).docker_args(&[], &[]);

        assert!(!args.contains(&"-u".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("tools:test"));
    }

    #[test]
    fn test_invoke_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Recorder::default();

        let doc = invoke(&runner, &container(temp_dir.path(), None), &request(None)).unwrap();

        assert_eq!(doc, PathBuf::from("docs/news-openapi.json"));
        assert!(temp_dir.path().join("rpc/news").is_dir());
        assert!(temp_dir.path().join("docs").is_dir());

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("docker run --rm"));
        assert!(calls[0].contains("tools:test protoc -I rpc"));
    }

    #[test]
    fn test_invoke_mounts_dependency() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Recorder::default();

        invoke(
            &runner,
            &container(temp_dir.path(), None),
            &request(Some("/deps/api")),
        )
        .unwrap();

        let calls = runner.calls.borrow();
        assert!(calls[0].contains("-v /deps/api:/deps/api tools:test"));
    }

    #[test]
    fn test_invoke_propagates_failure() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Recorder {
            fail: true,
            ..Recorder::default()
        };

        let result = invoke(&runner, &container(temp_dir.path(), None), &request(None));

        assert!(matches!(result, Err(Error::CommandFailed { .. })));
    }

    #[test]
    fn test_invoke_fails_when_docs_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("docs"), "oops").unwrap();
        let runner = Recorder::default();

        let result = invoke(&runner, &container(temp_dir.path(), None), &request(None));

        assert!(matches!(result, Err(Error::NotADirectory(_))));
        assert!(runner.calls.borrow().is_empty());
    }
}
