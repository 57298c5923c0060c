//! HTML post-processing.
//!
//! - [`scan`] / [`rewrite`]: span-preserving tag scanner and edit pipeline
//! - [`transform`]: the named link and sanitization transforms
//! - [`HtmlDocument`] + [`metadata`]: inner text, word count, bookmarks

mod document;
mod escape;
pub mod metadata;
pub mod rewrite;
pub mod scan;
pub mod transform;

pub use document::{HtmlDocument, HtmlError};
pub use escape::{escape_attr_value, unescape};
pub use metadata::{bookmarks, count_words, inner_text};
pub use rewrite::{Element, rewrite};
pub use transform::{
    LINK_TYPE_ATTR, LinkAttr, add_link_type, remove_rerun_codepen_iframes, strip_tags,
    transform_links,
};
