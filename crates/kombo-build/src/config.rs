//! Pipeline configuration.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Default compilation target for the browser build.
pub const WASM_TARGET: &str = "wasm32-unknown-unknown";

/// Default package to build.
pub const DEFAULT_PACKAGE: &str = "koala-kombo";

/// Configuration for a web build.
///
/// Relative `out_dir` and `assets_dir` paths resolve against `project_dir`.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Cargo workspace or package root.
    pub project_dir: PathBuf,
    /// Package containing the game library.
    pub package: String,
    /// Rust target triple to compile for.
    pub target: String,
    /// Staging directory for the served bundle.
    pub out_dir: PathBuf,
    /// Resource registry copied into the bundle.
    pub assets_dir: PathBuf,
    /// Title of the generated host page.
    pub title: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            package: DEFAULT_PACKAGE.to_string(),
            target: WASM_TARGET.to_string(),
            out_dir: PathBuf::from("web"),
            assets_dir: PathBuf::from("data"),
            title: "Koala Kombo".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Library crate name (the package name with `-` replaced by `_`).
    ///
    /// This is also the stem of the wasm artifact and the generated module.
    pub fn lib_name(&self) -> String {
        self.package.replace('-', "_")
    }

    /// Absolute-or-project-relative staging directory.
    pub fn staging_dir(&self) -> PathBuf {
        self.resolve(&self.out_dir)
    }

    /// Absolute-or-project-relative asset directory.
    pub fn assets_path(&self) -> PathBuf {
        self.resolve(&self.assets_dir)
    }

    /// Directory cargo writes release artifacts for the target into.
    ///
    /// Honors `CARGO_TARGET_DIR`; a relative value is taken relative to the
    /// project, where cargo runs.
    pub fn release_dir(&self) -> PathBuf {
        self.release_dir_with(std::env::var_os("CARGO_TARGET_DIR"))
    }

    fn release_dir_with(&self, target_dir: Option<OsString>) -> PathBuf {
        let target_dir = target_dir
            .filter(|dir| !dir.is_empty())
            .map(|dir| self.resolve(Path::new(&dir)))
            .unwrap_or_else(|| self.project_dir.join("target"));
        target_dir.join(&self.target).join("release")
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }

    /// Check the configuration before any step runs.
    pub fn validate(&self) -> Result<()> {
        let manifest = self.project_dir.join("Cargo.toml");
        if !manifest.is_file() {
            return Err(Error::InvalidProject(format!(
                "no Cargo.toml in {}",
                self.project_dir.display()
            )));
        }

        if self.package.is_empty() {
            return Err(Error::InvalidProject("package name cannot be empty".to_string()));
        }

        let project = normalize(&self.project_dir)?;
        let staging = normalize(&self.staging_dir())?;
        let assets = normalize(&self.assets_path())?;

        // Staging inside the registry would be copied into itself, and a
        // registry inside staging would be overwritten by its own copy.
        if project.starts_with(&staging)
            || staging.starts_with(&assets)
            || assets.starts_with(&staging)
        {
            return Err(Error::InvalidProject(format!(
                "staging directory {} overlaps the project or asset directory",
                self.out_dir.display()
            )));
        }

        Ok(())
    }
}

/// Absolute, lexically normalized form of `path`.
///
/// Existing paths are canonicalized so symlinked directories compare equal
/// to their targets; paths that do not exist yet are resolved without
/// touching the filesystem.
fn normalize(path: &Path) -> Result<PathBuf> {
    if let Ok(canonical) = path.canonicalize() {
        return Ok(canonical);
    }

    let absolute = std::path::absolute(path).map_err(Error::io(path))?;
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }

    // Resolve the longest existing ancestor so a staging dir that does not
    // exist yet still compares against canonical paths.
    let mut existing = out.as_path();
    let mut rest = Vec::new();
    while let Some(parent) = existing.parent() {
        if let Ok(canonical) = existing.canonicalize() {
            let mut resolved = canonical;
            resolved.extend(rest.iter().rev());
            return Ok(resolved);
        }
        if let Some(name) = existing.file_name() {
            rest.push(name);
        }
        existing = parent;
    }

    Ok(out)
}
