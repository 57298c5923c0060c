//! Virtual file layer.
//!
//! # Module Structure
//!
//! ```text
//! vfs/
//! ├── path       # RelativePath (normalized logical path)
//! ├── mapping    # PathMapping + provenance properties
//! ├── reader     # ContentReader, RootReader, LayeredReader
//! ├── writer     # ContentWriter, RootWriter
//! ├── layer      # VirtualFileLayer (Active / Disposed)
//! └── error      # VfsError, PathError
//! ```
//!
//! Resolution is first-match over an ordered list of roots: the docset root
//! comes first, fallback folders after it.

mod error;
mod layer;
mod mapping;
mod path;
mod reader;
mod writer;

pub use error::{PathError, Result, VfsError};
pub use layer::{LayerState, VirtualFileLayer};
pub use mapping::{PROP_CONTENT_ROOT, PROP_REPOSITORY, PathMapping, Properties};
pub use path::RelativePath;
pub use reader::{ContentReader, LayeredReader, RootReader};
pub use writer::{ContentWriter, RootWriter};
