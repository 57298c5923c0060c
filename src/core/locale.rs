//! Locale tag detection in URL paths.

use std::sync::LazyLock;

use regex::Regex;

/// `language[-script][-region]` with at least one subtag after the language,
/// e.g. `en-us`, `zh-hans`, `sr-latn-rs`, `es-419`.
static LOCALE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(?:-[A-Za-z]{4}(?:-(?:[A-Za-z]{2}|[0-9]{3}))?|-(?:[A-Za-z]{2}|[0-9]{3}))$")
        .expect("locale pattern is valid")
});

/// Check whether `segment` looks like a locale tag.
#[inline]
pub fn is_locale_tag(segment: &str) -> bool {
    LOCALE_TAG.is_match(segment)
}

/// Check whether the first segment of a root-relative path (leading separator
/// already stripped) is a locale tag.
pub fn starts_with_locale(path: &str) -> bool {
    let end = path.find(['/', '\\', '?', '#']).unwrap_or(path.len());
    is_locale_tag(&path[..end])
}
