//! Content writer: materializes files under a single output root.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use super::mapping::PathMapping;
use super::reader::{ContentReader, RootReader};
use super::RelativePath;

/// Write surface of the file layer.
pub trait ContentWriter: Send + Sync {
    /// Create (or truncate) the file at `path`, creating missing parents.
    fn create(&self, path: &RelativePath) -> io::Result<File>;

    /// Duplicate the physical file behind `source` at `dest`.
    fn copy(&self, source: &PathMapping, dest: &RelativePath) -> io::Result<()>;

    /// Read-back view of everything written so far.
    fn reader(&self) -> Box<dyn ContentReader>;
}

/// Writer rooted at an output directory.
#[derive(Debug, Clone)]
pub struct RootWriter {
    root: PathBuf,
}

impl RootWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn prepare(&self, path: &RelativePath) -> io::Result<PathBuf> {
        let target = path.to_physical(&self.root);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(target)
    }
}

impl ContentWriter for RootWriter {
    fn create(&self, path: &RelativePath) -> io::Result<File> {
        File::create(self.prepare(path)?)
    }

    fn copy(&self, source: &PathMapping, dest: &RelativePath) -> io::Result<()> {
        let target = self.prepare(dest)?;
        // fs::copy uses the OS fast path (copy_file_range / clonefile) where available
        fs::copy(source.physical_path(), target).map(|_| ())
    }

    fn reader(&self) -> Box<dyn ContentReader> {
        Box::new(RootReader::new(&self.root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn rel(s: &str) -> RelativePath {
        RelativePath::new(s).unwrap()
    }

    #[test]
    fn test_create_makes_parents() {
        let dir = TempDir::new().unwrap();
        let writer = RootWriter::new(dir.path().join("out"));

        let mut file = writer.create(&rel("a/b/c.html")).unwrap();
        file.write_all(b"<p>hi</p>").unwrap();
        drop(file);

        let written = fs::read_to_string(dir.path().join("out/a/b/c.html")).unwrap();
        assert_eq!(written, "<p>hi</p>");
    }

    #[test]
    fn test_copy_duplicates_content() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src.png");
        fs::write(&source, b"\x89PNG").unwrap();

        let writer = RootWriter::new(dir.path().join("out"));
        let mapping = PathMapping::new(source, Arc::default());
        writer.copy(&mapping, &rel("img/dest.png")).unwrap();

        assert_eq!(fs::read(dir.path().join("out/img/dest.png")).unwrap(), b"\x89PNG");
    }

    #[test]
    fn test_reader_sees_written_files() {
        let dir = TempDir::new().unwrap();
        let writer = RootWriter::new(dir.path());
        assert!(writer.reader().enumerate().is_empty());

        writer.create(&rel("x.html")).unwrap();
        writer.create(&rel("d/y.html")).unwrap();

        assert_eq!(writer.reader().enumerate(), vec![rel("d/y.html"), rel("x.html")]);
    }
}
