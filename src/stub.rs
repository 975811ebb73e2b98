//! Service stub scaffolding.

use crate::error::Result;
use crate::fsutil::{ensure_directory, write_file};
use crate::naming::validate_stub_names;
use crate::scanner::{RPC_DIR, SERVICE_FILE};
use log::info;
use minijinja::Environment;
use serde::Serialize;
use std::path::{Path, PathBuf};

const STUB_TEMPLATE: &str = r#"syntax = "proto3";

package {{ prefix }}.{{ application }};

option go_package = "./rpc/{{ application }}";

service {{ service }} {
  rpc {{ method }}({{ method }}Request) returns ({{ method }}Response);
}

message {{ method }}Request {
  string param = 1;
}

message {{ method }}Response {}
"#;

/// Names substituted into the stub template.
#[derive(Debug, Clone, Serialize)]
pub struct StubContext<'a> {
    pub prefix: &'a str,
    pub application: &'a str,
    pub service: &'a str,
    pub method: &'a str,
}

/// Renders the service definition for a stub.
pub fn render_stub(context: &StubContext<'_>) -> Result<String> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.add_template("service.proto", STUB_TEMPLATE)?;

    let rendered = env.get_template("service.proto")?.render(context)?;
    Ok(rendered)
}

/// Writes `rpc/<application>/service.proto` under `project_root` with one
/// service and one method, replacing any existing definition.
///
/// Returns the path of the written file.
pub fn write_stub(
    project_root: &Path,
    package_prefix: &str,
    application: &str,
    service: &str,
    method: &str,
) -> Result<PathBuf> {
    validate_stub_names(application, service, method)?;

    let dir = project_root.join(RPC_DIR).join(application);
    ensure_directory(&dir)?;

    let content = render_stub(&StubContext {
        prefix: package_prefix,
        application,
        service,
        method,
    })?;

    let path = dir.join(SERVICE_FILE);
    write_file(&path, content.as_bytes())?;

    info!("Wrote stub for {}.{} to {}", service, method, path.display());
    Ok(path)
}
