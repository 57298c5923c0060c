//! Content readers: resolve logical paths against physical content roots.
//!
//! - [`RootReader`]: one directory tree
//! - [`LayeredReader`]: ordered roots, first root containing a path wins

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jwalk::WalkDir;
use rustc_hash::FxHashMap;

use super::mapping::{PROP_CONTENT_ROOT, PathMapping, Properties};
use super::RelativePath;

/// Read-only view over a logical file set.
pub trait ContentReader: Send + Sync {
    /// Resolve a logical path to its physical mapping.
    fn find(&self, path: &RelativePath) -> Option<PathMapping>;

    /// Every logical path visible through this reader, sorted and unique.
    fn enumerate(&self) -> Vec<RelativePath>;
}

// ============================================================================
// RootReader
// ============================================================================

/// Reader over a single content root directory.
#[derive(Debug, Clone)]
pub struct RootReader {
    root: PathBuf,
    properties: Properties,
}

impl RootReader {
    /// Create a reader whose mappings carry only the `content_root` property.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_properties(root, FxHashMap::default())
    }

    /// Create a reader with extra provenance properties.
    ///
    /// `content_root` is always set to the root directory.
    pub fn with_properties(root: impl Into<PathBuf>, mut properties: FxHashMap<String, String>) -> Self {
        let root = root.into();
        properties.insert(PROP_CONTENT_ROOT.to_string(), root.display().to_string());
        Self {
            root,
            properties: Arc::new(properties),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ContentReader for RootReader {
    fn find(&self, path: &RelativePath) -> Option<PathMapping> {
        let physical = path.to_physical(&self.root);
        physical
            .is_file()
            .then(|| PathMapping::new(physical, Arc::clone(&self.properties)))
    }

    /// Symlinks are followed, matching what `find` resolves.
    fn enumerate(&self) -> Vec<RelativePath> {
        let mut files: Vec<_> = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| {
                let file_type = e.file_type();
                file_type.is_file() || (file_type.is_symlink() && e.path().is_file())
            })
            .filter_map(|e| RelativePath::from_physical(&e.path(), &self.root))
            .collect();
        files.sort();
        files.dedup();
        files
    }
}

// ============================================================================
// LayeredReader
// ============================================================================

/// Ordered composition of readers.
///
/// Index 0 has the highest precedence. Properties of losing roots are never
/// merged into the winning mapping.
#[derive(Default)]
pub struct LayeredReader {
    layers: Vec<Box<dyn ContentReader>>,
}

impl LayeredReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reader with lower precedence than every reader added so far.
    pub fn push(mut self, reader: impl ContentReader + 'static) -> Self {
        self.layers.push(Box::new(reader));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl ContentReader for LayeredReader {
    fn find(&self, path: &RelativePath) -> Option<PathMapping> {
        self.layers.iter().find_map(|layer| layer.find(path))
    }

    fn enumerate(&self) -> Vec<RelativePath> {
        let all: BTreeSet<RelativePath> = self
            .layers
            .iter()
            .flat_map(|layer| layer.enumerate())
            .collect();
        all.into_iter().collect()
    }
}
