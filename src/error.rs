use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Identifier kinds checked by the name validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Application,
    Service,
    Method,
}

impl std::fmt::Display for NameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            NameKind::Application => write!(f, "application"),
            NameKind::Service => write!(f, "service"),
            NameKind::Method => write!(f, "method"),
        }
    }
}

/// Error types for the library
#[derive(Error, Debug)]
pub enum Error {
    #[error("{kind} {rule} (got {name:?})")]
    InvalidName {
        kind: NameKind,
        name: String,
        rule: &'static str,
    },

    #[error("service name must be a plain directory name (got {0:?})")]
    InvalidServiceDir(String),

    #[error("failed to list services under {}: {source}", path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to start {program}: {source}")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command `{command}` failed with {}", exit_description(*code))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("generate service {service}: {source}")]
    Service {
        service: String,
        #[source]
        source: Box<Error>,
    },

    #[error("{action} {}: {source}", path.display())]
    Document {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} does not contain a JSON object", .0.display())]
    NotAnObject(PathBuf),

    #[error("templating error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl Error {
    /// Wraps an error with the name of the service being processed.
    pub fn for_service(service: &str, source: Error) -> Self {
        Error::Service {
            service: service.to_string(),
            source: Box::new(source),
        }
    }

    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

fn exit_description(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
