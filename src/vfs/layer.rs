//! The virtual file layer: sole file I/O entry point of the build pipeline.

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use super::error::{Result, VfsError};
use super::mapping::{PathMapping, Properties};
use super::reader::ContentReader;
use super::writer::ContentWriter;
use super::RelativePath;
use crate::debug;

/// Lifecycle of a layer. `Disposed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerState {
    Active,
    Disposed,
}

/// One reader (required) plus one writer (optional).
///
/// All `&self` operations are safe to call from many workers at once.
/// [`dispose`](Self::dispose) takes `&mut self`, so it can only run once every
/// shared borrow held by in-flight work has ended.
pub struct VirtualFileLayer {
    reader: Box<dyn ContentReader>,
    writer: Option<Box<dyn ContentWriter>>,
    state: LayerState,
}

impl VirtualFileLayer {
    /// Read-only layer.
    pub fn new(reader: impl ContentReader + 'static) -> Self {
        Self {
            reader: Box::new(reader),
            writer: None,
            state: LayerState::Active,
        }
    }

    /// Attach an output writer.
    pub fn with_writer(mut self, writer: impl ContentWriter + 'static) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    #[inline]
    pub fn can_write(&self) -> bool {
        self.writer.is_some()
    }

    #[inline]
    pub fn state(&self) -> LayerState {
        self.state
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.state == LayerState::Disposed
    }

    // ------------------------------------------------------------------------
    // Read family
    // ------------------------------------------------------------------------

    pub fn list_inputs(&self) -> Result<Vec<RelativePath>> {
        self.ensure_active()?;
        Ok(self.reader.enumerate())
    }

    pub fn exists(&self, path: &RelativePath) -> Result<bool> {
        self.ensure_active()?;
        Ok(self.reader.find(path).is_some())
    }

    /// Physical location of the winning source for `path`.
    pub fn physical_path(&self, path: &RelativePath) -> Result<PathBuf> {
        self.ensure_active()?;
        Ok(self.resolve(path)?.physical_path().to_path_buf())
    }

    pub fn open_read(&self, path: &RelativePath) -> Result<File> {
        self.ensure_active()?;
        let mapping = self.resolve(path)?;
        File::open(mapping.physical_path()).map_err(|e| VfsError::io(path, e))
    }

    /// Read a whole document as UTF-8.
    pub fn read_to_string(&self, path: &RelativePath) -> Result<String> {
        self.ensure_active()?;
        let mapping = self.resolve(path)?;
        fs::read_to_string(mapping.physical_path()).map_err(|e| VfsError::io(path, e))
    }

    pub fn properties(&self, path: &RelativePath) -> Result<Properties> {
        self.ensure_active()?;
        Ok(self.resolve(path)?.properties().clone())
    }

    // ------------------------------------------------------------------------
    // Write family
    // ------------------------------------------------------------------------

    pub fn list_outputs(&self) -> Result<Vec<RelativePath>> {
        self.ensure_active()?;
        Ok(self.writer()?.reader().enumerate())
    }

    pub fn create(&self, path: &RelativePath) -> Result<File> {
        self.ensure_active()?;
        self.writer()?
            .create(path)
            .map_err(|e| VfsError::io(path, e))
    }

    /// Create `path` and write `bytes` into it.
    pub fn write(&self, path: &RelativePath, bytes: &[u8]) -> Result<()> {
        let mut file = self.create(path)?;
        file.write_all(bytes)
            .and_then(|()| file.flush())
            .map_err(|e| VfsError::io(path, e))
    }

    /// Copy the winning source of `source` to `dest` in the output root.
    pub fn copy(&self, source: &RelativePath, dest: &RelativePath) -> Result<()> {
        self.ensure_active()?;
        let writer = self.writer()?;
        let mapping = self.resolve(source)?;
        writer
            .copy(&mapping, dest)
            .map_err(|e| VfsError::io(dest, e))
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Transition to `Disposed`. Repeated calls are no-ops.
    pub fn dispose(&mut self) {
        if self.state == LayerState::Active {
            debug!("vfs"; "file layer disposed");
            self.state = LayerState::Disposed;
        }
    }

    fn ensure_active(&self) -> Result<()> {
        match self.state {
            LayerState::Active => Ok(()),
            LayerState::Disposed => Err(VfsError::Disposed),
        }
    }

    fn writer(&self) -> Result<&dyn ContentWriter> {
        self.writer.as_deref().ok_or(VfsError::NotWritable)
    }

    fn resolve(&self, path: &RelativePath) -> Result<PathMapping> {
        self.reader
            .find(path)
            .ok_or_else(|| VfsError::NotFound(path.clone()))
    }
}

impl std::fmt::Debug for VirtualFileLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualFileLayer")
            .field("can_write", &self.can_write())
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::{LayeredReader, RootReader, RootWriter};
    use rustc_hash::FxHashMap;
    use std::io::Read;
    use std::path::Path;
    use tempfile::TempDir;

    fn rel(s: &str) -> RelativePath {
        RelativePath::new(s).unwrap()
    }

    fn write(root: &Path, path: &str, content: &str) {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    /// docset + shared fallback, output under `out/`.
    fn setup() -> (TempDir, VirtualFileLayer) {
        let dir = TempDir::new().unwrap();
        let docset = dir.path().join("docset");
        let shared = dir.path().join("shared");
        write(&docset, "index.html", "<p>docset</p>");
        write(&docset, "media/logo.png", "png");
        write(&shared, "index.html", "<p>shared</p>");
        write(&shared, "includes/note.html", "<p>note</p>");

        let mut props = FxHashMap::default();
        props.insert("repository".to_string(), "shared-repo".to_string());

        let reader = LayeredReader::new()
            .push(RootReader::new(&docset))
            .push(RootReader::with_properties(&shared, props));
        let layer = VirtualFileLayer::new(reader).with_writer(RootWriter::new(dir.path().join("out")));
        (dir, layer)
    }

    #[test]
    fn test_precedence_and_properties() {
        let (dir, layer) = setup();

        assert_eq!(layer.read_to_string(&rel("index.html")).unwrap(), "<p>docset</p>");
        let props = layer.properties(&rel("index.html")).unwrap();
        assert_eq!(props.get("repository"), None);
        assert_eq!(
            props.get("content_root").map(String::as_str),
            Some(dir.path().join("docset").display().to_string().as_str())
        );

        let props = layer.properties(&rel("includes/note.html")).unwrap();
        assert_eq!(props.get("repository").map(String::as_str), Some("shared-repo"));
    }

    #[test]
    fn test_exists_matches_list_inputs() {
        let (_dir, layer) = setup();
        let inputs = layer.list_inputs().unwrap();
        assert_eq!(
            inputs,
            vec![rel("includes/note.html"), rel("index.html"), rel("media/logo.png")]
        );
        for path in &inputs {
            assert!(layer.exists(path).unwrap());
        }
        assert!(!layer.exists(&rel("missing.html")).unwrap());
    }

    #[test]
    fn test_not_found_carries_path() {
        let (_dir, layer) = setup();
        match layer.open_read(&rel("nope/x.md")) {
            Err(VfsError::NotFound(path)) => assert_eq!(path, "nope/x.md"),
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(matches!(
            layer.properties(&rel("nope.md")),
            Err(VfsError::NotFound(_))
        ));
        assert!(matches!(
            layer.copy(&rel("nope.md"), &rel("dest.md")),
            Err(VfsError::NotFound(_))
        ));
    }

    #[test]
    fn test_create_then_read_back() {
        let (dir, layer) = setup();
        layer.write(&rel("a/b/page.html"), b"<h1>ok</h1>").unwrap();

        assert_eq!(layer.list_outputs().unwrap(), vec![rel("a/b/page.html")]);

        // Output root is readable as a content root of its own
        let out = VirtualFileLayer::new(RootReader::new(dir.path().join("out")));
        let mut bytes = Vec::new();
        out.open_read(&rel("a/b/page.html"))
            .unwrap()
            .read_to_end(&mut bytes)
            .unwrap();
        assert_eq!(bytes, b"<h1>ok</h1>");
    }

    #[test]
    fn test_copy_uses_winning_source() {
        let (dir, layer) = setup();
        layer.copy(&rel("index.html"), &rel("copied/index.html")).unwrap();
        layer.copy(&rel("media/logo.png"), &rel("media/logo.png")).unwrap();

        let copied = fs::read_to_string(dir.path().join("out/copied/index.html")).unwrap();
        assert_eq!(copied, "<p>docset</p>");
        assert_eq!(
            layer.list_outputs().unwrap(),
            vec![rel("copied/index.html"), rel("media/logo.png")]
        );
    }

    #[test]
    fn test_read_only_layer_rejects_writes() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", "a");
        let layer = VirtualFileLayer::new(RootReader::new(dir.path()));

        assert!(!layer.can_write());
        assert!(matches!(layer.list_outputs(), Err(VfsError::NotWritable)));
        assert!(matches!(layer.create(&rel("b.md")), Err(VfsError::NotWritable)));
        assert!(matches!(
            layer.copy(&rel("a.md"), &rel("b.md")),
            Err(VfsError::NotWritable)
        ));
        // Reads still work
        assert!(layer.exists(&rel("a.md")).unwrap());
    }

    #[test]
    fn test_dispose_is_terminal_and_idempotent() {
        let (_dir, mut layer) = setup();
        assert_eq!(layer.state(), LayerState::Active);

        layer.dispose();
        layer.dispose();
        assert!(layer.is_disposed());

        let p = rel("index.html");
        assert!(matches!(layer.list_inputs(), Err(VfsError::Disposed)));
        assert!(matches!(layer.list_outputs(), Err(VfsError::Disposed)));
        assert!(matches!(layer.exists(&p), Err(VfsError::Disposed)));
        assert!(matches!(layer.open_read(&p), Err(VfsError::Disposed)));
        assert!(matches!(layer.create(&p), Err(VfsError::Disposed)));
        assert!(matches!(layer.copy(&p, &p), Err(VfsError::Disposed)));
        assert!(matches!(layer.properties(&p), Err(VfsError::Disposed)));
    }

    #[test]
    fn test_concurrent_reads() {
        use rayon::prelude::*;

        let (_dir, layer) = setup();
        let inputs = layer.list_inputs().unwrap();
        let found: Vec<bool> = inputs
            .par_iter()
            .map(|p| layer.exists(p).unwrap())
            .collect();
        assert!(found.into_iter().all(|b| b));
    }
}
