//! Core types - pure link abstractions shared across the codebase.

mod link;
mod locale;

pub use link::{ClassifiedLink, LinkType, classify};
pub use locale::{is_locale_tag, starts_with_locale};
