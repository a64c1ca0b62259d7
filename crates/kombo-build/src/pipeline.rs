//! Ordered execution of the build steps.
//!
//! ```text
//! Provision ──▶ Compile ──▶ Bind ──▶ Stage ──▶ (Serve, run by the caller)
//! ```
//!
//! Each step either succeeds and hands its output to the next, or fails and
//! ends the run. Nothing is retried or rolled back; a half-written staging
//! directory is simply overwritten by the next run.

use std::fmt;
use std::time::{Duration, Instant};

use crate::bindgen::{BoundModule, generate_bindings};
use crate::compile::{WasmArtifact, compile_library};
use crate::config::PipelineConfig;
use crate::error::Error;
use crate::runner::CommandRunner;
use crate::stage::{StageReport, prepare_staging, stage_assets};
use crate::toolchain::{Toolchain, provision_target};

/// A pipeline step, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Provision,
    Compile,
    Bind,
    Stage,
    Serve,
}

impl Step {
    /// Steps run by [`Pipeline::build`].
    pub const BUILD: [Step; 4] = [Step::Provision, Step::Compile, Step::Bind, Step::Stage];

    /// Progress label shown to the operator.
    pub fn label(&self) -> &'static str {
        match self {
            Step::Provision => "Provisioning target",
            Step::Compile => "Compiling library",
            Step::Bind => "Generating bindings",
            Step::Stage => "Staging assets",
            Step::Serve => "Serving",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Provision => "provision",
            Step::Compile => "compile",
            Step::Bind => "bind",
            Step::Stage => "stage",
            Step::Serve => "serve",
        };
        f.write_str(name)
    }
}

/// A failed step and its cause.
#[derive(Debug, thiserror::Error)]
#[error("{step} step failed: {source}")]
pub struct PipelineError {
    pub step: Step,
    #[source]
    pub source: Error,
}

impl PipelineError {
    /// Message and recovery hint, for the operator.
    pub fn with_hint(&self) -> String {
        format!("{} step failed: {}", self.step, self.source.with_hint())
    }
}

/// Receives progress notifications while the pipeline runs.
pub trait Reporter {
    fn step_started(&mut self, step: Step);

    /// `detail` is a short summary of what the step produced.
    fn step_finished(&mut self, step: Step, elapsed: Duration, detail: &str);

    fn step_failed(&mut self, step: Step, error: &Error);
}

/// Reporter that only logs.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn step_started(&mut self, step: Step) {
        tracing::info!("{}...", step.label());
    }

    fn step_finished(&mut self, step: Step, elapsed: Duration, detail: &str) {
        tracing::info!("{} done in {:.2}s ({})", step, elapsed.as_secs_f64(), detail);
    }

    fn step_failed(&mut self, step: Step, error: &Error) {
        tracing::error!("{} failed: {}", step, error);
    }
}

/// Everything a successful build produced.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub target_installed: bool,
    pub artifact: WasmArtifact,
    pub module: BoundModule,
    pub stage: StageReport,
}

/// The web build pipeline.
pub struct Pipeline<'a> {
    config: PipelineConfig,
    toolchain: Toolchain,
    runner: &'a dyn CommandRunner,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: PipelineConfig, toolchain: Toolchain, runner: &'a dyn CommandRunner) -> Self {
        Self {
            config,
            toolchain,
            runner,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run Provision, Compile, Bind and Stage, stopping at the first failure.
    pub fn build(&self, reporter: &mut dyn Reporter) -> Result<BuildOutput, PipelineError> {
        let target_installed = run_step(reporter, Step::Provision, || {
            let installed = provision_target(self.runner, &self.toolchain.rustup, &self.config.target)?;
            let detail = if installed { "installed" } else { "already installed" };
            Ok((installed, format!("{} {}", self.config.target, detail)))
        })?;

        let artifact = run_step(reporter, Step::Compile, || {
            let artifact = compile_library(self.runner, &self.toolchain.cargo, &self.config)?;
            let detail = artifact
                .path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            Ok((artifact, detail))
        })?;

        let module = run_step(reporter, Step::Bind, || {
            let staging = self.config.staging_dir();
            prepare_staging(&staging)?;
            let module = generate_bindings(
                self.runner,
                &self.toolchain.wasm_bindgen,
                &artifact.path,
                &staging,
                &self.config.lib_name(),
            )?;
            let detail = module.module_file_name();
            Ok((module, detail))
        })?;

        let stage = run_step(reporter, Step::Stage, || {
            let report = stage_assets(
                &self.config.assets_path(),
                &self.config.staging_dir(),
                &module,
                &self.config.title,
            )?;
            let detail = format!("{} files, {} bytes", report.files_copied, report.bytes_copied);
            Ok((report, detail))
        })?;

        Ok(BuildOutput {
            target_installed,
            artifact,
            module,
            stage,
        })
    }
}

fn run_step<T>(
    reporter: &mut dyn Reporter,
    step: Step,
    f: impl FnOnce() -> Result<(T, String), Error>,
) -> Result<T, PipelineError> {
    reporter.step_started(step);
    let start = Instant::now();

    match f() {
        Ok((value, detail)) => {
            reporter.step_finished(step, start.elapsed(), &detail);
            Ok(value)
        }
        Err(source) => {
            reporter.step_failed(step, &source);
            Err(PipelineError { step, source })
        }
    }
}
