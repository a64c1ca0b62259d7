//! Error types for kombo-build.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for kombo-build operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building the web bundle.
#[derive(Debug, Error)]
pub enum Error {
    /// A required tool could not be located.
    #[error("{tool} not found")]
    ToolNotFound { tool: &'static str },

    /// A tool was found but could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The project directory does not look like a cargo project.
    #[error("invalid project: {0}")]
    InvalidProject(String),

    /// Querying or installing the compilation target failed.
    #[error("failed to install target {target}: {message}")]
    TargetInstall { target: String, message: String },

    /// cargo reported a failed build.
    #[error("cargo build failed{}", code.map(|c| format!(" (exit code {})", c)).unwrap_or_default())]
    Build { code: Option<i32> },

    /// The build succeeded but produced no wasm file for the library.
    #[error("no wasm artifact produced for {lib}")]
    ArtifactMissing { lib: String },

    /// wasm-bindgen exited with an error.
    #[error("wasm-bindgen failed: {stderr}")]
    Bindgen { stderr: String },

    /// The staging directory must exist before bindings are generated.
    #[error("staging directory does not exist: {}", .0.display())]
    StagingMissing(PathBuf),

    /// wasm-bindgen succeeded but an expected output is missing.
    #[error("expected binding output missing: {}", .0.display())]
    BindingsMissing(PathBuf),

    /// The resource registry directory to stage does not exist.
    #[error("asset directory not found: {}", .0.display())]
    AssetsMissing(PathBuf),

    /// Filesystem error tied to a path.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    /// A recovery suggestion for the operator, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::ToolNotFound { tool: "rustup" } | Error::ToolNotFound { tool: "cargo" } => {
                Some("install Rust via https://rustup.rs")
            }
            Error::ToolNotFound { tool: "wasm-bindgen" } => Some(
                "run `cargo install wasm-bindgen-cli` or set KOMBO_WASM_BINDGEN to the binary",
            ),
            Error::TargetInstall { .. } => Some("check your network connection and rustup permissions"),
            Error::Bindgen { .. } => Some(
                "the wasm-bindgen CLI version must match the wasm-bindgen crate version in Cargo.lock",
            ),
            Error::InvalidProject(_) => Some("run from the workspace root or pass --project-dir"),
            Error::AssetsMissing(_) => Some("pass --assets to point at the resource directory"),
            _ => None,
        }
    }

    /// The message followed by its hint, if any.
    pub fn with_hint(&self) -> String {
        match self.hint() {
            Some(hint) => format!("{}\n  hint: {}", self, hint),
            None => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_message() {
        assert_eq!(Error::Build { code: Some(101) }.to_string(), "cargo build failed (exit code 101)");
        assert_eq!(Error::Build { code: None }.to_string(), "cargo build failed");
    }

    #[test]
    fn test_hint_for_missing_bindgen() {
        let err = Error::ToolNotFound { tool: "wasm-bindgen" };
        assert!(err.with_hint().contains("wasm-bindgen-cli"));
        assert!(Error::Build { code: None }.hint().is_none());
    }
}
