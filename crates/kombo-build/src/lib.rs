//! Build pipeline for the Koala Kombo browser bundle.
//!
//! Turns the game library into a directory a static file server can host:
//!
//! 1. [`toolchain`]: make sure the wasm target is installed
//! 2. [`compile`]: release build of the library for that target
//! 3. [`bindgen`]: generate the JavaScript glue module with wasm-bindgen
//! 4. [`stage`]: copy the resource registry and write `index.html`
//!
//! [`Pipeline`] runs the steps in order and stops at the first failure.
//! Serving the result lives in the `kombo-server` crate.

pub mod bindgen;
pub mod compile;
pub mod config;
pub mod error;
pub mod html;
pub mod pipeline;
pub mod runner;
pub mod stage;
pub mod toolchain;

pub use bindgen::BoundModule;
pub use compile::WasmArtifact;
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use pipeline::{BuildOutput, LogReporter, Pipeline, PipelineError, Reporter, Step};
pub use runner::{CommandRunner, Finished, Invocation, SystemRunner};
pub use stage::StageReport;
pub use toolchain::Toolchain;
