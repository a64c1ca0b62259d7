//! Release build of the game library for the wasm target.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::runner::{CommandRunner, Invocation};

/// The compiled wasm file for the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WasmArtifact {
    pub path: PathBuf,
    /// Whether cargo reused an up-to-date artifact.
    pub fresh: bool,
}

/// cargo `--message-format=json` line.
#[derive(Debug, Deserialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
enum CargoMessage {
    CompilerArtifact(ArtifactMessage),
    BuildFinished {
        success: bool,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ArtifactMessage {
    target: ArtifactTarget,
    filenames: Vec<PathBuf>,
    #[serde(default)]
    fresh: bool,
}

#[derive(Debug, Deserialize)]
struct ArtifactTarget {
    name: String,
    kind: Vec<String>,
}

/// Build the library in release mode for the configured target.
///
/// Compiler diagnostics stream straight to the operator's terminal; stdout
/// carries cargo's JSON messages, which are scanned for the wasm artifact.
pub fn compile_library(
    runner: &dyn CommandRunner,
    cargo: &Path,
    config: &PipelineConfig,
) -> Result<WasmArtifact> {
    let invocation = Invocation::new(cargo)
        .args(["build", "--lib", "--release"])
        .args(["--target", config.target.as_str()])
        .args(["--package", config.package.as_str()])
        .arg("--message-format=json-render-diagnostics")
        .current_dir(&config.project_dir)
        .inherit_stderr();

    let finished = runner.run(&invocation)?;
    let lib = config.lib_name();
    let scan = scan_messages(&finished.stdout_lossy(), &lib);

    if !finished.success || scan.build_succeeded == Some(false) {
        return Err(Error::Build {
            code: finished.code,
        });
    }

    if let Some(artifact) = scan.artifact {
        tracing::debug!("artifact {} (fresh: {})", artifact.path.display(), artifact.fresh);
        return Ok(artifact);
    }

    // Older cargo versions or wrapped invocations may not report the
    // artifact; fall back to the conventional output location.
    let fallback = config.release_dir().join(format!("{}.wasm", lib));
    if fallback.is_file() {
        tracing::debug!("using conventional artifact path {}", fallback.display());
        return Ok(WasmArtifact {
            path: fallback,
            fresh: false,
        });
    }

    Err(Error::ArtifactMissing { lib })
}

#[derive(Debug, Default)]
struct MessageScan {
    artifact: Option<WasmArtifact>,
    build_succeeded: Option<bool>,
}

fn scan_messages(stdout: &str, lib: &str) -> MessageScan {
    let mut scan = MessageScan::default();

    for line in stdout.lines().filter(|l| l.starts_with('{')) {
        let message = match serde_json::from_str::<CargoMessage>(line) {
            Ok(message) => message,
            Err(e) => {
                tracing::trace!("skipping unparseable cargo message: {}", e);
                continue;
            }
        };

        match message {
            CargoMessage::CompilerArtifact(artifact) => {
                if artifact.target.name != lib
                    || !artifact.target.kind.iter().any(|k| k == "cdylib")
                {
                    continue;
                }

                let wasm = artifact
                    .filenames
                    .into_iter()
                    .find(|f| f.extension().is_some_and(|ext| ext == "wasm"));

                if let Some(path) = wasm {
                    scan.artifact = Some(WasmArtifact {
                        path,
                        fresh: artifact.fresh,
                    });
                }
            }
            CargoMessage::BuildFinished { success } => scan.build_succeeded = Some(success),
            CargoMessage::Other => {}
        }
    }

    scan
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTIFACT: &str = r#"{"reason":"compiler-artifact","package_id":"path+file:///work/crates/koala-kombo#0.1.0","manifest_path":"/work/crates/koala-kombo/Cargo.toml","target":{"kind":["cdylib","rlib"],"crate_types":["cdylib","rlib"],"name":"koala_kombo","src_path":"/work/crates/koala-kombo/src/lib.rs","edition":"2024","doc":true,"doctest":true,"test":true},"profile":{"opt_level":"s","debuginfo":0,"debug_assertions":false,"overflow_checks":false,"test":false},"features":[],"filenames":["/work/target/wasm32-unknown-unknown/release/koala_kombo.wasm","/work/target/wasm32-unknown-unknown/release/libkoala_kombo.rlib"],"executable":null,"fresh":false}"#;

    const DEPENDENCY: &str = r#"{"reason":"compiler-artifact","package_id":"registry+https://github.com/rust-lang/crates.io-index#rand@0.9.2","manifest_path":"/r/rand/Cargo.toml","target":{"kind":["lib"],"crate_types":["lib"],"name":"rand","src_path":"/r/rand/src/lib.rs"},"filenames":["/work/target/wasm32-unknown-unknown/release/deps/librand.rlib"],"executable":null,"fresh":true}"#;

    #[test]
    fn test_scan_finds_wasm_artifact() {
        let stdout = format!(
            "{}\n{}\n{{\"reason\":\"build-finished\",\"success\":true}}\n",
            DEPENDENCY, ARTIFACT
        );
        let scan = scan_messages(&stdout, "koala_kombo");

        let artifact = scan.artifact.unwrap();
        assert_eq!(
            artifact.path,
            PathBuf::from("/work/target/wasm32-unknown-unknown/release/koala_kombo.wasm")
        );
        assert!(!artifact.fresh);
        assert_eq!(scan.build_succeeded, Some(true));
    }

    #[test]
    fn test_scan_ignores_other_libraries() {
        let scan = scan_messages(ARTIFACT, "other_game");
        assert!(scan.artifact.is_none());
    }

    #[test]
    fn test_scan_tolerates_noise() {
        let stdout = "not json\n{\"reason\":\"build-script-executed\",\"package_id\":\"x\"}\n{broken\n";
        let scan = scan_messages(stdout, "koala_kombo");
        assert!(scan.artifact.is_none());
        assert!(scan.build_succeeded.is_none());
    }

    #[test]
    fn test_scan_reports_failed_build() {
        let scan = scan_messages("{\"reason\":\"build-finished\",\"success\":false}", "koala_kombo");
        assert_eq!(scan.build_succeeded, Some(false));
    }
}
