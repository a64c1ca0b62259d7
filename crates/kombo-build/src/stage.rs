//! Staging of the resource registry and host page.

use std::fs;
use std::path::{Path, PathBuf};

use crate::bindgen::BoundModule;
use crate::error::{Error, Result};
use crate::html::generate_host_page;

/// Name of the generated host page.
pub const INDEX_FILE: &str = "index.html";

/// What the stage step wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    pub files_copied: usize,
    pub bytes_copied: u64,
    /// Staged copy of the resource registry.
    pub assets_dir: PathBuf,
    pub index: PathBuf,
}

/// Create the staging directory if it does not exist.
///
/// Existing contents are kept; later steps overwrite files in place.
pub fn prepare_staging(staging_dir: &Path) -> Result<()> {
    fs::create_dir_all(staging_dir).map_err(Error::io(staging_dir))
}

/// Copy the resource registry into the staging directory and write the
/// host page.
///
/// The registry lands under its own directory name, so `data/` becomes
/// `<staging>/data/`. Its contents are copied byte-for-byte without being
/// inspected.
pub fn stage_assets(
    assets_dir: &Path,
    staging_dir: &Path,
    module: &BoundModule,
    title: &str,
) -> Result<StageReport> {
    if !assets_dir.is_dir() {
        return Err(Error::AssetsMissing(assets_dir.to_path_buf()));
    }

    let dir_name = assets_dir
        .canonicalize()
        .map_err(Error::io(assets_dir))?
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "data".into());
    let staged_assets = staging_dir.join(dir_name);

    let mut report = StageReport {
        assets_dir: staged_assets.clone(),
        ..Default::default()
    };

    let mut copy = TreeCopy {
        skip: staging_dir.canonicalize().map_err(Error::io(staging_dir))?,
        ancestors: Vec::new(),
        report: &mut report,
    };
    copy.copy_dir(assets_dir, &staged_assets)?;

    let index = staging_dir.join(INDEX_FILE);
    let html = generate_host_page(title, &module.module_file_name());
    fs::write(&index, html).map_err(Error::io(&index))?;
    report.index = index;

    tracing::debug!(
        "staged {} files ({} bytes) into {}",
        report.files_copied,
        report.bytes_copied,
        staging_dir.display()
    );

    Ok(report)
}

/// Recursive copy of the registry that cannot walk into its own output or
/// around a symlink cycle.
struct TreeCopy<'a> {
    /// Canonical staging directory; never read as a source.
    skip: PathBuf,
    /// Canonical directories on the current path from the registry root.
    ancestors: Vec<PathBuf>,
    report: &'a mut StageReport,
}

impl TreeCopy<'_> {
    /// Copy `src` into `dst`, overwriting existing files.
    fn copy_dir(&mut self, src: &Path, dst: &Path) -> Result<()> {
        let canonical = src.canonicalize().map_err(Error::io(src))?;
        if canonical.starts_with(&self.skip) {
            tracing::debug!("not copying staged output {}", src.display());
            return Ok(());
        }
        if self.ancestors.contains(&canonical) {
            tracing::warn!("skipping symlink cycle at {}", src.display());
            return Ok(());
        }

        fs::create_dir_all(dst).map_err(Error::io(dst))?;

        let mut entries = fs::read_dir(src)
            .map_err(Error::io(src))?
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(Error::io(src))?;
        entries.sort_by_key(|e| e.file_name());

        self.ancestors.push(canonical);
        for entry in entries {
            let from = entry.path();
            let to = dst.join(entry.file_name());

            // Follow symlinks so linked assets are staged as real files.
            let meta = fs::metadata(&from).map_err(Error::io(&from))?;

            if meta.is_dir() {
                self.copy_dir(&from, &to)?;
            } else {
                let bytes = fs::copy(&from, &to).map_err(Error::io(&from))?;
                self.report.files_copied += 1;
                self.report.bytes_copied += bytes;
            }
        }
        self.ancestors.pop();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn module_in(dir: &Path) -> BoundModule {
        BoundModule::in_dir(dir, "koala_kombo")
    }

    #[test]
    fn test_prepare_staging_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("web").join("nested");
        prepare_staging(&staging).unwrap();
        prepare_staging(&staging).unwrap();
        assert!(staging.is_dir());
    }

    #[test]
    fn test_stage_copies_tree_and_writes_index() {
        let temp = TempDir::new().unwrap();
        let assets = temp.path().join("data");
        fs::create_dir_all(assets.join("sounds")).unwrap();
        fs::write(assets.join("board.bin"), [0u8, 1, 2, 255]).unwrap();
        fs::write(assets.join("sounds").join("clear.ogg"), b"OggS").unwrap();

        let staging = temp.path().join("web");
        prepare_staging(&staging).unwrap();

        let report = stage_assets(&assets, &staging, &module_in(&staging), "Koala Kombo").unwrap();

        assert_eq!(report.files_copied, 2);
        assert_eq!(report.bytes_copied, 8);
        assert_eq!(report.assets_dir, staging.join("data"));
        assert_eq!(fs::read(staging.join("data/board.bin")).unwrap(), vec![0u8, 1, 2, 255]);
        assert_eq!(fs::read(staging.join("data/sounds/clear.ogg")).unwrap(), b"OggS");

        let html = fs::read_to_string(&report.index).unwrap();
        assert!(html.contains("./koala_kombo.js"));
    }

    #[test]
    fn test_stage_overwrites_previous_copy() {
        let temp = TempDir::new().unwrap();
        let assets = temp.path().join("data");
        fs::create_dir_all(&assets).unwrap();
        fs::write(assets.join("level.txt"), "v1").unwrap();

        let staging = temp.path().join("web");
        prepare_staging(&staging).unwrap();
        stage_assets(&assets, &staging, &module_in(&staging), "t").unwrap();

        fs::write(assets.join("level.txt"), "v2").unwrap();
        stage_assets(&assets, &staging, &module_in(&staging), "t").unwrap();

        assert_eq!(fs::read_to_string(staging.join("data/level.txt")).unwrap(), "v2");
    }

    #[test]
    fn test_missing_assets_is_an_error() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("web");
        prepare_staging(&staging).unwrap();

        let err = stage_assets(&temp.path().join("nope"), &staging, &module_in(&staging), "t")
            .unwrap_err();
        assert!(matches!(err, Error::AssetsMissing(_)));
        assert!(!staging.join(INDEX_FILE).exists());
    }

    #[test]
    fn test_staging_inside_assets_is_not_copied_into_itself() {
        let temp = TempDir::new().unwrap();
        let assets = temp.path().join("data");
        fs::create_dir_all(&assets).unwrap();
        fs::write(assets.join("level.txt"), "v1").unwrap();

        let staging = assets.join("web");
        prepare_staging(&staging).unwrap();
        stage_assets(&assets, &staging, &module_in(&staging), "t").unwrap();
        let report = stage_assets(&assets, &staging, &module_in(&staging), "t").unwrap();

        assert_eq!(report.files_copied, 1);
        assert_eq!(fs::read_to_string(staging.join("data/level.txt")).unwrap(), "v1");
        assert!(!staging.join("data/web").exists());
    }

    #[test]
    fn test_assets_inside_staging_are_copied_once() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("web");
        let assets = staging.join("data");
        fs::create_dir_all(&assets).unwrap();
        fs::write(assets.join("level.txt"), "v1").unwrap();

        // The registry already sits where its copy belongs.
        let report = stage_assets(&assets, &staging, &module_in(&staging), "t").unwrap();
        assert_eq!(report.files_copied, 0);
        assert_eq!(fs::read_to_string(assets.join("level.txt")).unwrap(), "v1");
        assert!(staging.join(INDEX_FILE).is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_is_skipped() {
        let temp = TempDir::new().unwrap();
        let assets = temp.path().join("data");
        fs::create_dir_all(assets.join("levels")).unwrap();
        fs::write(assets.join("levels").join("one.json"), "{}").unwrap();
        std::os::unix::fs::symlink(&assets, assets.join("levels").join("loop")).unwrap();

        let staging = temp.path().join("web");
        prepare_staging(&staging).unwrap();
        let report = stage_assets(&assets, &staging, &module_in(&staging), "t").unwrap();

        assert_eq!(report.files_copied, 1);
        assert!(staging.join("data/levels/one.json").is_file());
        assert!(!staging.join("data/levels/loop/levels").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_shared_symlinked_directory_is_copied_twice() {
        let temp = TempDir::new().unwrap();
        let shared = temp.path().join("shared");
        fs::create_dir_all(&shared).unwrap();
        fs::write(shared.join("tile.bin"), [1u8, 2]).unwrap();

        let assets = temp.path().join("data");
        fs::create_dir_all(&assets).unwrap();
        std::os::unix::fs::symlink(&shared, assets.join("a")).unwrap();
        std::os::unix::fs::symlink(&shared, assets.join("b")).unwrap();

        let staging = temp.path().join("web");
        prepare_staging(&staging).unwrap();
        let report = stage_assets(&assets, &staging, &module_in(&staging), "t").unwrap();

        assert_eq!(report.files_copied, 2);
        assert!(staging.join("data/a/tile.bin").is_file());
        assert!(staging.join("data/b/tile.bin").is_file());
    }
}
