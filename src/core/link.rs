//! Link classification.
//!
//! | LinkType | Example | `data-linktype` | Rewrite |
//! |----------|---------|-----------------|---------|
//! | `SelfBookmark` | `#section` | `self-bookmark` | none |
//! | `External` | `https://...` | `external` | none |
//! | `AbsolutePath` | `/about`, `\about` | `absolute-path` | locale inserted |
//! | `RelativePath` | `a.md`, `(https://a)` | `relative-path` | none |
//!
//! Classification never fails: anything that does not parse cleanly ends up
//! as `RelativePath`, which is left untouched.

use std::borrow::Cow;
use std::fmt;

use url::{ParseError, Url};

use super::locale::starts_with_locale;

/// Category of an href/src value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkType {
    RelativePath,
    SelfBookmark,
    AbsolutePath,
    External,
}

impl LinkType {
    /// Attribute token written to `data-linktype`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RelativePath => "relative-path",
            Self::SelfBookmark => "self-bookmark",
            Self::AbsolutePath => "absolute-path",
            Self::External => "external",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified link and its (possibly rewritten) value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLink<'a> {
    pub link_type: LinkType,
    pub href: Cow<'a, str>,
}

impl ClassifiedLink<'_> {
    /// Whether `href` differs from the input value.
    pub fn is_rewritten(&self) -> bool {
        matches!(self.href, Cow::Owned(_))
    }
}

/// Outcome of strict absolute-URI parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UriOutcome {
    Absolute,
    /// No scheme at all (`a.md`, `/a`).
    NotAbsolute,
    /// Looks like a URI but is malformed (`https://[abc]`).
    ParseFailed,
}

fn parse_absolute_uri(value: &str) -> UriOutcome {
    match Url::parse(value) {
        Ok(_) => UriOutcome::Absolute,
        Err(ParseError::RelativeUrlWithoutBase) => UriOutcome::NotAbsolute,
        Err(_) => UriOutcome::ParseFailed,
    }
}

/// Protocol-relative links (`//host/path`, or `\\host\path` and mixed
/// separators, which browsers read the same way) point at another host.
fn is_protocol_relative(value: &str) -> bool {
    let mut chars = value.chars();
    matches!((chars.next(), chars.next()), (Some('/' | '\\'), Some('/' | '\\')))
        && Url::parse(&format!("https:{value}")).is_ok_and(|url| url.has_host())
}

/// Classify `value` and rewrite it for `locale` when it is site-absolute.
///
/// # Example
/// ```
/// use docweave::core::{LinkType, classify};
/// let link = classify("/a#x", "zh-cn");
/// assert_eq!(link.link_type, LinkType::AbsolutePath);
/// assert_eq!(link.href, "/zh-cn/a#x");
/// ```
pub fn classify<'a>(value: &'a str, locale: &str) -> ClassifiedLink<'a> {
    let unchanged = |link_type| ClassifiedLink {
        link_type,
        href: Cow::Borrowed(value),
    };

    if value.starts_with('#') {
        return unchanged(LinkType::SelfBookmark);
    }

    if parse_absolute_uri(value) == UriOutcome::Absolute || is_protocol_relative(value) {
        return unchanged(LinkType::External);
    }

    if let Some(rest) = value.strip_prefix(['/', '\\']) {
        if locale.is_empty() || starts_with_locale(rest) {
            return unchanged(LinkType::AbsolutePath);
        }
        return ClassifiedLink {
            link_type: LinkType::AbsolutePath,
            href: Cow::Owned(format!("/{locale}{value}")),
        };
    }

    // Malformed URIs and plain relative paths alike
    unchanged(LinkType::RelativePath)
}
