//! Default on-disk location of the adequacy source store.

use std::path::{Path, PathBuf};

/// Store location relative to the workspace root.
const STORE_RELATIVE_PATH: &str = "data/shared/adequacy.duckdb";

/// Returns the default store path under the workspace `data/shared/`
/// directory.
///
/// The workspace root is two levels above this crate's manifest; if the
/// manifest directory is shallower than that, the store is placed relative
/// to the manifest directory itself.
#[must_use]
pub fn adequacy_db_path() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .unwrap_or(manifest_dir)
        .join(STORE_RELATIVE_PATH)
}

/// Creates the directory that will hold the store file at `store_path`.
///
/// Succeeds without changes when the directory already exists or the path
/// has no parent component.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_parent_dir(store_path: &Path) -> std::io::Result<()> {
    match store_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
        _ => Ok(()),
    }
}
