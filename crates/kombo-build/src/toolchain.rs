//! Toolchain discovery and target provisioning.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::runner::{CommandRunner, Invocation};

/// Environment variable overriding the wasm-bindgen binary location.
pub const WASM_BINDGEN_ENV: &str = "KOMBO_WASM_BINDGEN";

/// Paths to the external tools the pipeline drives.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub rustup: PathBuf,
    pub cargo: PathBuf,
    pub wasm_bindgen: PathBuf,
}

impl Toolchain {
    /// Locate every tool, failing on the first one that is missing.
    pub fn locate() -> Result<Self> {
        let rustup = which::which("rustup").map_err(|_| Error::ToolNotFound { tool: "rustup" })?;
        let cargo = which::which("cargo").map_err(|_| Error::ToolNotFound { tool: "cargo" })?;
        let wasm_bindgen = Self::find_wasm_bindgen()?;

        tracing::debug!(
            "toolchain: rustup={} cargo={} wasm-bindgen={}",
            rustup.display(),
            cargo.display(),
            wasm_bindgen.display()
        );

        Ok(Self {
            rustup,
            cargo,
            wasm_bindgen,
        })
    }

    /// Find wasm-bindgen.
    ///
    /// Tries in order:
    /// 1. `KOMBO_WASM_BINDGEN` environment variable
    /// 2. `PATH`
    /// 3. cargo's install directory (`$CARGO_HOME/bin` or `~/.cargo/bin`)
    fn find_wasm_bindgen() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(WASM_BINDGEN_ENV) {
            let path = PathBuf::from(path);
            if path.is_file() {
                return Ok(path);
            }
            tracing::warn!(
                "{} points at {}, which does not exist",
                WASM_BINDGEN_ENV,
                path.display()
            );
        }

        if let Ok(path) = which::which("wasm-bindgen") {
            return Ok(path);
        }

        let cargo_home = std::env::var_os("CARGO_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".cargo")));

        if let Some(bin_dir) = cargo_home.map(|home| home.join("bin")) {
            let candidate = bin_dir.join(executable_name("wasm-bindgen"));
            if candidate.is_file() {
                return Ok(candidate);
            }
        }

        Err(Error::ToolNotFound { tool: "wasm-bindgen" })
    }
}

fn executable_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", name)
    } else {
        name.to_string()
    }
}

/// Ensure `target` is installed for the active toolchain.
///
/// Returns `true` if the target had to be installed. Safe to call on every
/// run; an installed target is left alone.
pub fn provision_target(runner: &dyn CommandRunner, rustup: &Path, target: &str) -> Result<bool> {
    let list = runner.run(&Invocation::new(rustup).args(["target", "list", "--installed"]))?;

    if !list.success {
        return Err(Error::TargetInstall {
            target: target.to_string(),
            message: format!("`rustup target list` failed: {}", list.stderr_lossy()),
        });
    }

    if is_target_installed(&list.stdout_lossy(), target) {
        tracing::debug!("target {} already installed", target);
        return Ok(false);
    }

    tracing::info!("installing target {}...", target);

    let add = runner.run(&Invocation::new(rustup).args(["target", "add", target]))?;

    if !add.success {
        return Err(Error::TargetInstall {
            target: target.to_string(),
            message: add.stderr_lossy(),
        });
    }

    tracing::info!("target {} installed", target);
    Ok(true)
}

fn is_target_installed(listing: &str, target: &str) -> bool {
    listing.lines().any(|line| line.trim() == target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_listing() {
        let listing = "x86_64-unknown-linux-gnu\nwasm32-unknown-unknown\n";
        assert!(is_target_installed(listing, "wasm32-unknown-unknown"));
        assert!(!is_target_installed(listing, "wasm32-wasip1"));
        assert!(!is_target_installed("", "wasm32-unknown-unknown"));
    }

    #[test]
    fn test_listing_ignores_prefix_matches() {
        let listing = "wasm32-unknown-unknown-extra\n";
        assert!(!is_target_installed(listing, "wasm32-unknown-unknown"));
    }

    #[test]
    fn test_executable_name() {
        let name = executable_name("wasm-bindgen");
        assert!(name.starts_with("wasm-bindgen"));
    }
}
