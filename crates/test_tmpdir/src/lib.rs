extern crate path_slash;

use path_slash::PathBufExt;
use std::{
    collections::HashMap,
    fs::File,
    io::{Error, Write},
    path::{Path, PathBuf},
};

/// A temporary directory that is deleted when dropped.
///
/// Paths handed to the helpers are slash-separated and relative to the root,
/// so fixtures read the same on every platform.
pub struct TmpDir {
    // removes the directory on drop
    _tmp_root: tempfile::TempDir,
    canonical_root: PathBuf,
}

/// Builds a [TmpDir] from `"relative/path" => "contents"` pairs.
#[macro_export]
macro_rules! test_tmpdir(
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            use test_tmpdir::TmpDir;
            let mut m = ::std::collections::HashMap::new();
            $(
                m.insert(String::from($key), $value);
            )+

            TmpDir::new_with_content(&m)
        }
    };
);

impl Default for TmpDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TmpDir {
    pub fn new() -> TmpDir {
        let root = tempfile::tempdir().unwrap();
        let canonical_root = std::fs::canonicalize(&root).unwrap();
        TmpDir {
            _tmp_root: root,
            canonical_root,
        }
    }

    pub fn new_with_content(content: &HashMap<String, &str>) -> TmpDir {
        let out = Self::new();
        out.write_batch(content).unwrap();
        out
    }

    pub fn write_batch(&self, content: &HashMap<String, &str>) -> Result<(), Error> {
        for (path, content) in content {
            self.write_file(path, content)?;
        }
        Ok(())
    }

    /// Writes a single file, creating its parent directories
    pub fn write_file(&self, path: &str, content: &str) -> Result<(), Error> {
        let target = self.root_join(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = File::create(target)?;
        file.write_all(content.as_bytes())
    }

    pub fn root(&self) -> &Path {
        &self.canonical_root
    }

    pub fn root_join<S: AsRef<str>>(&self, other: S) -> PathBuf {
        self.canonical_root.join(PathBuf::from_slash(other))
    }

    /// Replaces the root prefix of `path` with `<root>` and normalizes
    /// separators, for stable assertions on reported paths
    pub fn normalize(&self, path: impl AsRef<Path>) -> String {
        let root = self.canonical_root.to_slash_lossy().to_string();
        path.as_ref()
            .to_path_buf()
            .to_slash_lossy()
            .replace(&root, "<root>")
    }
}
