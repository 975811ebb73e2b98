use crate::error::{Error, Result};
use log::debug;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Name of the file that marks a directory as a service.
pub const SERVICE_FILE: &str = "service.proto";

/// Conventional directory holding service directories.
pub const RPC_DIR: &str = "rpc";

/// A service found in the project tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    /// Service name, taken from the directory name
    pub name: String,
    /// Protobuf files of the service relative to the project root,
    /// `service.proto` first
    pub proto_files: Vec<PathBuf>,
}

/// Scanner for service directories.
///
/// Services live in the immediate subdirectories of the protocol root, which
/// is `rpc/` when the project has one and the project root otherwise. A
/// subdirectory is a service when it contains a `service.proto` file.
///
/// # Example
///
/// ```no_run
/// use rpc_scaffold::scanner::ServiceScanner;
/// use std::path::PathBuf;
///
/// let scanner = ServiceScanner::new(PathBuf::from("./my-project"));
/// for service in scanner.scan().unwrap() {
///     println!("{}: {} files", service.name, service.proto_files.len());
/// }
/// ```
pub struct ServiceScanner {
    project_root: PathBuf,
    proto_root: PathBuf,
}

impl ServiceScanner {
    /// Creates a scanner for `project_root`, choosing the protocol root once.
    pub fn new(project_root: PathBuf) -> Self {
        let proto_root = proto_root(&project_root);
        Self {
            project_root,
            proto_root,
        }
    }

    /// Protocol root relative to the project root: `rpc` or `.`.
    pub fn proto_root(&self) -> &Path {
        &self.proto_root
    }

    /// Lists all services, sorted by name.
    ///
    /// # Errors
    ///
    /// Any unreadable directory aborts the scan; no partial result is returned.
    pub fn scan(&self) -> Result<Vec<ServiceDefinition>> {
        let root = self.project_root.join(&self.proto_root);
        debug!("Scanning {} for services", root.display());

        let mut services = Vec::new();

        for entry in WalkDir::new(&root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'))
        {
            let entry = entry.map_err(|source| Error::Discovery {
                path: root.clone(),
                source,
            })?;

            if !entry.file_type().is_dir() || !entry.path().join(SERVICE_FILE).is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            let proto_files = self.proto_files(&name)?;

            debug!("Found service {} with {} proto files", name, proto_files.len());
            services.push(ServiceDefinition { name, proto_files });
        }

        Ok(services)
    }

    /// Describes a single service by name, whether or not its directory
    /// exists yet.
    ///
    /// # Errors
    ///
    /// The name must be one that [`scan`](Self::scan) could report: a single
    /// path component that is not hidden.
    pub fn service(&self, name: &str) -> Result<ServiceDefinition> {
        if !is_service_dir_name(name) {
            return Err(Error::InvalidServiceDir(name.to_string()));
        }

        let dir = self.project_root.join(&self.proto_root).join(name);
        let proto_files = if dir.is_dir() {
            self.proto_files(name)?
        } else {
            vec![self.proto_root.join(name).join(SERVICE_FILE)]
        };

        Ok(ServiceDefinition {
            name: name.to_string(),
            proto_files,
        })
    }

    fn proto_files(&self, service: &str) -> Result<Vec<PathBuf>> {
        let relative_dir = self.proto_root.join(service);
        let dir = self.project_root.join(&relative_dir);

        let mut others = Vec::new();

        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| Error::Discovery {
                path: dir.clone(),
                source,
            })?;

            let file_name = entry.file_name().to_string_lossy();
            let is_proto = entry.path().extension().and_then(|s| s.to_str()) == Some("proto");

            if entry.file_type().is_file() && is_proto && file_name != SERVICE_FILE {
                others.push(relative_dir.join(entry.file_name()));
            }
        }

        let mut files = vec![relative_dir.join(SERVICE_FILE)];
        files.extend(others);
        Ok(files)
    }
}

fn is_service_dir_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.starts_with('.')
        && !name.contains(['/', '\\'])
}

/// Picks the protocol root for a project: `rpc` if it is a directory,
/// otherwise the project root itself.
pub fn proto_root(project_root: &Path) -> PathBuf {
    if project_root.join(RPC_DIR).is_dir() {
        PathBuf::from(RPC_DIR)
    } else {
        PathBuf::from(".")
    }
}
