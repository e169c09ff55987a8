use std::path::PathBuf;
use tempfile::TempDir;

/// Write `content` to a file called `name` in a fresh temporary directory.
/// The caller must hold onto `TempDir` to keep the temp directory alive.
pub fn write_report(name: &str, content: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    (dir, path)
}
