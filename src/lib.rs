//! rpc-scaffold - Twirp service generation and scaffolding.
//!
//! This library drives protoc, running inside a tools container, to generate Go
//! bindings, Twirp service bindings and OpenAPI 3 documentation for the
//! protobuf services in a project. It also scaffolds new services from a
//! fixed template.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Finds service directories under `rpc/` (or the project root)
//! 2. [`version`] - Resolves the documentation version from config or git
//! 3. [`dependency`] - Locates the shared protobuf module, if the project uses it
//! 4. [`invoker`] - Builds and runs the containerized protoc invocation
//! 5. [`openapi`] - Injects deployment servers into the generated documents
//! 6. [`naming`] and [`stub`] - Validate names and write new service stubs
//! 7. [`pipeline`] - Ties the steps together
//!
//! External programs are reached through [`runner::CommandRunner`].
//!
//! # Example Usage
//!
//! ```no_run
//! use rpc_scaffold::{config::GeneratorConfig, pipeline::Pipeline, runner::SystemRunner};
//!
//! let config = GeneratorConfig::new("./my-service");
//! let pipeline = Pipeline::new(config, &SystemRunner);
//!
//! pipeline.stub("news", "Reader", "Fetch").unwrap();
//! let report = pipeline.generate_all().unwrap();
//! println!("Generated {:?} at {}", report.services, report.version.value);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod config;
pub mod dependency;
pub mod error;
pub mod fsutil;
pub mod invoker;
pub mod naming;
pub mod openapi;
pub mod pipeline;
pub mod runner;
pub mod scanner;
pub mod stub;
pub mod version;
