//! Build command implementation for Kombo CLI.
//!
//! Runs the pipeline up to staging and prints progress for each step.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use kombo_build::{Error, Pipeline, PipelineConfig, PipelineError, Reporter, Step, SystemRunner, Toolchain};

use crate::colors;

/// Prints one progress line per step.
struct TerminalReporter;

impl Reporter for TerminalReporter {
    fn step_started(&mut self, step: Step) {
        println!("{}  ◆ {}{} ...", colors::BLUE, step.label(), colors::RESET);
        colors::flush_stdout();
    }

    fn step_finished(&mut self, _step: Step, elapsed: Duration, detail: &str) {
        println!(
            "    {}✓{} {} {}({:.2}s){}",
            colors::GREEN,
            colors::RESET,
            detail,
            colors::DIM,
            elapsed.as_secs_f64(),
            colors::RESET
        );
    }

    fn step_failed(&mut self, step: Step, _error: &Error) {
        println!("    {}✗ {} failed{}", colors::RED, step, colors::RESET);
    }
}

/// Build and stage the web bundle. Returns the staging directory.
pub fn execute(config: &PipelineConfig) -> anyhow::Result<PathBuf> {
    config.validate()?;

    let start = Instant::now();

    println!(
        "\n{}Kombo{} - Building {}{}{} for the web",
        colors::BOLD,
        colors::RESET,
        colors::CYAN,
        config.package,
        colors::RESET
    );
    println!("{}", colors::rule());

    // A missing tool is an environment failure of the provisioning step.
    let toolchain = Toolchain::locate().map_err(|source| PipelineError {
        step: Step::Provision,
        source,
    })?;

    let runner = SystemRunner;
    let pipeline = Pipeline::new(config.clone(), toolchain, &runner);
    let output = pipeline.build(&mut TerminalReporter)?;

    println!("{}", colors::rule());
    println!(
        "{}Staged:{} {}",
        colors::GREEN,
        colors::RESET,
        config.staging_dir().display()
    );
    println!(
        "{}Entry:{} {}",
        colors::DIM,
        colors::RESET,
        output.stage.index.display()
    );
    println!(
        "{}Time:{} {:.2}s",
        colors::DIM,
        colors::RESET,
        start.elapsed().as_secs_f64()
    );

    Ok(config.staging_dir())
}
