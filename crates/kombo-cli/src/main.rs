//! Kombo CLI - builds Koala Kombo for the browser and serves it locally.
//!
//! With no arguments the whole pipeline runs: provision the wasm target,
//! compile, generate bindings, stage assets, then serve on port 8080.

mod build;
mod colors;
mod serve;

use std::path::PathBuf;

use clap::Parser;
use kombo_build::PipelineConfig;
use kombo_build::config::{DEFAULT_PACKAGE, WASM_TARGET};
use kombo_server::ServerConfig;

#[derive(Parser)]
#[command(name = "kombo")]
#[command(about = "Build Koala Kombo for the web and serve it locally")]
#[command(version)]
struct Cli {
    /// Workspace root containing Cargo.toml
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Package that contains the game library
    #[arg(long, default_value = DEFAULT_PACKAGE)]
    package: String,

    /// Compilation target
    #[arg(long, default_value = WASM_TARGET)]
    target: String,

    /// Staging directory for the web bundle (relative to the project)
    #[arg(long, default_value = "web")]
    out_dir: PathBuf,

    /// Resource directory copied into the bundle (relative to the project)
    #[arg(long, default_value = "data")]
    assets: PathBuf,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "KOMBO_PORT")]
    port: u16,

    /// Stop after staging instead of serving
    #[arg(long)]
    no_serve: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            project_dir: self.project_dir.clone(),
            package: self.package.clone(),
            target: self.target.clone(),
            out_dir: self.out_dir.clone(),
            assets_dir: self.assets.clone(),
            ..Default::default()
        }
    }

    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Attach recovery hints to library errors
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(e) = err.downcast_ref::<kombo_build::PipelineError>() {
            anyhow::anyhow!("{}", e.with_hint())
        } else if let Some(e) = err.downcast_ref::<kombo_build::Error>() {
            anyhow::anyhow!("{}", e.with_hint())
        } else if let Some(e) = err.downcast_ref::<kombo_server::ServerError>() {
            let step = kombo_build::Step::Serve;
            match e.hint() {
                Some(hint) => anyhow::anyhow!("{} step failed: {}\n  hint: {}", step, e, hint),
                None => anyhow::anyhow!("{} step failed: {}", step, e),
            }
        } else {
            err
        }
    };

    let config = cli.pipeline_config();
    let staging = build::execute(&config).map_err(format_error)?;

    if cli.no_serve {
        return Ok(());
    }

    serve::execute(&staging, cli.server_config())
        .await
        .map_err(format_error)?;

    Ok(())
}
