//! Logical path to physical file mapping.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;

/// Provenance properties attached to a mapping.
///
/// Shared between every mapping produced by the same content root.
pub type Properties = Arc<FxHashMap<String, String>>;

/// Property key: physical directory of the content root that won.
pub const PROP_CONTENT_ROOT: &str = "content_root";
/// Property key: originating repository, when configured.
pub const PROP_REPOSITORY: &str = "repository";

/// Where a logical path physically lives, plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapping {
    physical_path: PathBuf,
    properties: Properties,
}

impl PathMapping {
    pub fn new(physical_path: PathBuf, properties: Properties) -> Self {
        Self {
            physical_path,
            properties,
        }
    }

    #[inline]
    pub fn physical_path(&self) -> &Path {
        &self.physical_path
    }

    #[inline]
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Look up a single property.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
