//! Per-request scratch directory with guaranteed teardown.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// An exclusively owned directory under the scratch root, alive for one
/// request. The directory name is generated by the filesystem's unique-name
/// primitive, never caller-chosen, so concurrent requests cannot collide.
///
/// Teardown is tied to `Drop`: it runs exactly once on every exit path,
/// including early returns and unwinding. Removal errors other than the
/// directory already being gone are logged and swallowed; cleanup problems
/// never feed back into the request's error channel.
#[derive(Debug)]
pub struct Workspace {
    path: Option<PathBuf>,
}

impl Workspace {
    pub fn create(scratch_root: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("compare-")
            .tempdir_in(scratch_root)?;
        // Ownership of the directory moves to this Workspace; our Drop is
        // the single remover.
        Ok(Self { path: Some(dir.into_path()) })
    }

    pub fn path(&self) -> &Path {
        self.path.as_deref().expect("workspace accessed after teardown")
    }

    /// Absolute path for a staged file inside this workspace.
    pub fn staging_path(&self, prefix: &str, sanitized_name: &str) -> PathBuf {
        self.path().join(format!("{prefix}{sanitized_name}"))
    }

    /// Tear down eagerly instead of waiting for scope end.
    pub fn destroy(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        let Some(path) = self.path.take() else { return };
        match fs::remove_dir_all(&path) {
            Ok(()) => {}
            // Already gone counts as done.
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %path.display(), error = %err, "workspace teardown failed");
            }
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.remove();
    }
}
