//! The service generation pipeline.
//!
//! A run resolves the version and the shared dependency once, then for each
//! service invokes protoc and rewrites the resulting OpenAPI document.
//! Services are processed one at a time and the run stops at the first
//! failure. Outputs of services that already completed are left in place.

use crate::config::GeneratorConfig;
use crate::dependency::{resolve_dependency, DependencyLookup};
use crate::error::{Error, Result};
use crate::invoker::{invoke, GenerationRequest, ToolsContainer};
use crate::openapi::rewrite_servers;
use crate::runner::CommandRunner;
use crate::scanner::{ServiceDefinition, ServiceScanner};
use crate::stub::write_stub;
use crate::version::{resolve_version, ResolvedVersion};
use log::{info, warn};
use std::path::PathBuf;

/// Summary of a completed generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub version: ResolvedVersion,
    pub dependency: DependencyLookup,
    /// Generated services in processing order
    pub services: Vec<String>,
}

/// Entry point for generation and scaffolding.
pub struct Pipeline<'r, R: CommandRunner + ?Sized> {
    config: GeneratorConfig,
    runner: &'r R,
}

impl<'r, R: CommandRunner + ?Sized> Pipeline<'r, R> {
    pub fn new(config: GeneratorConfig, runner: &'r R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn scanner(&self) -> ServiceScanner {
        ServiceScanner::new(self.config.project_root.clone())
    }

    /// Lists the services in the project, sorted by name.
    pub fn discover(&self) -> Result<Vec<ServiceDefinition>> {
        self.scanner().scan()
    }

    /// Generates every service in the project.
    pub fn generate_all(&self) -> Result<GenerationReport> {
        let scanner = self.scanner();
        let services = scanner.scan()?;

        if services.is_empty() {
            warn!(
                "No services found under {}",
                self.config.project_root.join(scanner.proto_root()).display()
            );
        }

        self.generate_services(&scanner, services)
    }

    /// Generates a single service by directory name. Any name discovery
    /// would accept is valid here.
    pub fn generate(&self, name: &str) -> Result<GenerationReport> {
        let scanner = self.scanner();
        let service = scanner.service(name)?;

        self.generate_services(&scanner, vec![service])
    }

    /// Writes a new service stub, returning the path of the definition.
    pub fn stub(&self, application: &str, service: &str, method: &str) -> Result<PathBuf> {
        write_stub(
            &self.config.project_root,
            &self.config.package_prefix,
            application,
            service,
            method,
        )
    }

    /// Runs `command` in the tools image with the project mounted.
    pub fn tools(&self, command: &[String]) -> Result<()> {
        ToolsContainer::new(&self.config)?.run(self.runner, &[], command)
    }

    fn generate_services(
        &self,
        scanner: &ServiceScanner,
        services: Vec<ServiceDefinition>,
    ) -> Result<GenerationReport> {
        let container = ToolsContainer::new(&self.config)?;
        let root = container.project_root();
        let version = resolve_version(self.runner, root, self.config.version_override());
        let dependency =
            resolve_dependency(self.runner, root, self.config.dependency_module.as_deref());

        let mut generated = Vec::with_capacity(services.len());

        for service in services {
            let name = service.name.clone();
            let request = GenerationRequest {
                service,
                version: version.value.clone(),
                proto_root: scanner.proto_root().to_path_buf(),
                dependency_dir: dependency.path().map(PathBuf::from),
            };

            self.generate_one(&container, &request)
                .map_err(|e| Error::for_service(&name, e))?;

            info!("Generated service {}", name);
            generated.push(name);
        }

        Ok(GenerationReport {
            version,
            dependency,
            services: generated,
        })
    }

    fn generate_one(&self, container: &ToolsContainer, request: &GenerationRequest) -> Result<()> {
        let document = invoke(self.runner, container, request)?;

        rewrite_servers(
            &self.config.project_root.join(document),
            &request.service.name,
            &self.config.domain,
        )
    }
}
