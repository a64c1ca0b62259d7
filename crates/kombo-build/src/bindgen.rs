//! JavaScript binding generation with wasm-bindgen.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::runner::{CommandRunner, Invocation};

/// Output of wasm-bindgen inside the staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundModule {
    /// ES module with the default `init` export.
    pub js: PathBuf,
    /// Processed wasm payload loaded by the module.
    pub wasm: PathBuf,
}

impl BoundModule {
    /// Expected output paths for `out_name` in `dir`.
    pub fn in_dir(dir: &Path, out_name: &str) -> Self {
        Self {
            js: dir.join(format!("{}.js", out_name)),
            wasm: dir.join(format!("{}_bg.wasm", out_name)),
        }
    }

    /// File name of the JS module, as referenced from the host page.
    pub fn module_file_name(&self) -> String {
        self.js
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// Generate web bindings for `artifact` into `staging_dir`.
///
/// The staging directory must already exist. Bindings target `web`: the
/// module is an ES module whose default export initializes the wasm.
pub fn generate_bindings(
    runner: &dyn CommandRunner,
    wasm_bindgen: &Path,
    artifact: &Path,
    staging_dir: &Path,
    out_name: &str,
) -> Result<BoundModule> {
    if !staging_dir.is_dir() {
        return Err(Error::StagingMissing(staging_dir.to_path_buf()));
    }

    let invocation = Invocation::new(wasm_bindgen)
        .args(["--target", "web", "--no-typescript"])
        .arg("--out-dir")
        .arg(staging_dir)
        .args(["--out-name", out_name])
        .arg(artifact);

    let finished = runner.run(&invocation)?;

    if !finished.success {
        return Err(Error::Bindgen {
            stderr: finished.stderr_lossy(),
        });
    }

    let module = BoundModule::in_dir(staging_dir, out_name);
    for path in [&module.js, &module.wasm] {
        if !path.is_file() {
            return Err(Error::BindingsMissing(path.clone()));
        }
    }

    tracing::debug!("bindings written to {}", module.js.display());
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::Finished;
    use std::cell::Cell;
    use tempfile::TempDir;

    /// Runner that must never be called.
    struct Unreachable(Cell<bool>);

    impl CommandRunner for Unreachable {
        fn run(&self, _: &Invocation) -> Result<Finished> {
            self.0.set(true);
            Ok(Finished::default())
        }
    }

    #[test]
    fn test_missing_staging_dir_fails_before_running() {
        let temp = TempDir::new().unwrap();
        let runner = Unreachable(Cell::new(false));
        let staging = temp.path().join("web");

        let err = generate_bindings(
            &runner,
            Path::new("wasm-bindgen"),
            Path::new("koala_kombo.wasm"),
            &staging,
            "koala_kombo",
        )
        .unwrap_err();

        assert!(matches!(err, Error::StagingMissing(ref p) if p == &staging));
        assert!(!runner.0.get(), "wasm-bindgen must not run without a staging dir");
    }

    #[test]
    fn test_module_paths() {
        let module = BoundModule::in_dir(Path::new("web"), "koala_kombo");
        assert_eq!(module.js, PathBuf::from("web/koala_kombo.js"));
        assert_eq!(module.wasm, PathBuf::from("web/koala_kombo_bg.wasm"));
        assert_eq!(module.module_file_name(), "koala_kombo.js");
    }
}
