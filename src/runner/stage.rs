//! Staging: materialising in-memory bytes to temp files so external tools
//! that only take file-path arguments can consume them.
//!
//! All staged files live inside one `TempDir` owned by the `Stager`, so the
//! whole set is removed when the stager is dropped, on every exit path.

use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::TempDir;

pub struct Stager {
    dir: TempDir,
}

impl Stager {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::Builder::new().prefix("rombuild-").tempdir()?,
        })
    }

    /// Write `bytes` to a fresh uniquely-named file and return its absolute
    /// path. Uniqueness comes from the temp-name allocator, not from `hint`,
    /// so colliding hints are fine.
    pub fn stage(&self, bytes: &[u8], hint: &str) -> io::Result<PathBuf> {
        let mut file = tempfile::Builder::new()
            .prefix(&sanitize(hint))
            .tempfile_in(self.dir.path())?;
        file.write_all(bytes)?;
        let path = file.into_temp_path().keep()?;
        path.canonicalize()
    }

    /// Allocate a unique path for a tool to write its output into.
    pub fn scratch(&self, hint: &str) -> io::Result<PathBuf> {
        self.stage(&[], hint)
    }
}

/// Hints are often file paths (`assets/font.bin`); flatten anything that
/// would escape the staging directory.
fn sanitize(hint: &str) -> String {
    let mut out: String = hint
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    out.push('-');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn staged_file_holds_exact_bytes() {
        let stager = Stager::new().unwrap();
        let path = stager.stage(b"\x00\x01raw\xff", "blob").unwrap();
        assert!(path.is_absolute());
        assert_eq!(fs::read(&path).unwrap(), b"\x00\x01raw\xff");
    }

    #[test]
    fn colliding_hints_get_distinct_paths() {
        let stager = Stager::new().unwrap();
        let a = stager.stage(b"a", "same").unwrap();
        let b = stager.stage(b"b", "same").unwrap();
        assert_ne!(a, b);
        assert_eq!(fs::read(&a).unwrap(), b"a");
        assert_eq!(fs::read(&b).unwrap(), b"b");
    }

    #[test]
    fn path_shaped_hints_stay_inside_the_staging_dir() {
        let stager = Stager::new().unwrap();
        let path = stager.stage(b"x", "../assets/font.bin").unwrap();
        assert!(path.starts_with(stager.dir.path().canonicalize().unwrap()));
    }

    #[test]
    fn dropping_the_stager_removes_everything() {
        let stager = Stager::new().unwrap();
        let path = stager.stage(b"gone", "doomed").unwrap();
        drop(stager);
        assert!(!path.exists());
    }
}
