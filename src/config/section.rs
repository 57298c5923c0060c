//! `[content]`, `[output]` and `[html]` sections.
//!
//! ```toml
//! [content]
//! docset = "docs"             # Highest-precedence content root
//! fallback = ["../shared"]    # Lower-precedence roots, in order
//!
//! [output]
//! dir = "_site"               # Output root
//!
//! [html]
//! link_type = true            # Tag links with data-linktype, localize absolute links
//! strip_tags = true           # Drop <style>/<link>/<script> and inline styles
//! codepen = true              # Hide the CodePen rerun button
//! extensions = ["html", "htm"]
//! ```

use crate::vfs::RelativePath;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub docset: PathBuf,
    pub fallback: Vec<PathBuf>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            docset: "docs".into(),
            fallback: Vec::new(),
        }
    }
}

impl ContentConfig {
    /// All content roots in precedence order.
    pub fn roots(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.docset.as_path()).chain(self.fallback.iter().map(PathBuf::as_path))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,

    /// Set from `--clean`.
    #[serde(skip)]
    pub clean: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "_site".into(),
            clean: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    pub link_type: bool,
    pub strip_tags: bool,
    pub codepen: bool,
    pub extensions: Vec<String>,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            link_type: true,
            strip_tags: true,
            codepen: true,
            extensions: vec!["html".into(), "htm".into()],
        }
    }
}

impl HtmlConfig {
    /// Whether `path` is post-processed as HTML.
    pub fn is_html(&self, path: &RelativePath) -> bool {
        path.extension()
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}
