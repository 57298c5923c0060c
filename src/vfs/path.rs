//! Logical path type for root-relative document identifiers.
//!
//! - Internal representation: segments joined with `/`, no leading slash
//! - Input boundary: accepts `/` and `\`, a leading `/`, `./` or `~/`
//! - Never escapes the root: `..` is resolved at construction

use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::error::PathError;

/// Normalized logical path (root-relative).
///
/// Invariants:
/// - Separator is always `/`
/// - No leading or trailing `/`, no empty, `.` or `..` segments
/// - Case is preserved and significant
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(Arc<str>);

impl RelativePath {
    /// Normalize a logical path.
    ///
    /// # Example
    /// ```
    /// use docweave::vfs::RelativePath;
    /// let a = RelativePath::new("~/articles\\intro.md").unwrap();
    /// let b = RelativePath::new("articles/./intro.md").unwrap();
    /// assert_eq!(a, b);
    /// assert_eq!(a.as_str(), "articles/intro.md");
    /// ```
    pub fn new(raw: &str) -> Result<Self, PathError> {
        let trimmed = raw.trim();
        let trimmed = match trimmed.strip_prefix('~') {
            Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
            _ => trimmed,
        };

        let mut segments: Vec<&str> = Vec::new();
        for segment in trimmed.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(PathError::new(raw, "path escapes the content root"));
                    }
                }
                s => segments.push(s),
            }
        }

        if segments.is_empty() {
            return Err(PathError::new(raw, "path is empty"));
        }

        Ok(Self(Arc::from(segments.join("/"))))
    }

    /// Get the normalized path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final segment (file name).
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Extension of the final segment, without the dot.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(pos) => Some(&name[pos + 1..]),
        }
    }

    /// Physical location of this path under `root`.
    pub fn to_physical(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(self.0.split('/'));
        path
    }

    /// Logical path of `physical` relative to `root`, if it lies under it.
    pub fn from_physical(physical: &Path, root: &Path) -> Option<Self> {
        let rel = physical.strip_prefix(root).ok()?;
        let joined = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Self::new(&joined).ok()
    }
}

impl TryFrom<&str> for RelativePath {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::str::FromStr for RelativePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RelativePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for RelativePath {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for RelativePath {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Serialize for RelativePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
