//! Named document transforms.
//!
//! Each transform is a pure `(html, ...) -> html` function built on
//! [`rewrite`]. Malformed links and markup never make a transform fail.

use super::rewrite::{Element, rewrite};
use crate::core::{LinkType, classify};
use crate::debug;

/// Attribute written by [`add_link_type`].
pub const LINK_TYPE_ATTR: &str = "data-linktype";

const CODEPEN_HOST: &str = "//codepen.io/";
const CODEPEN_RERUN_SUFFIX: &str = "&rerun-position=hidden&";

/// Tags removed whole by [`strip_tags`].
const STRIPPED_TAGS: [&str; 3] = ["style", "link", "script"];

/// Tag every element carrying `href` with its link category.
///
/// Site-absolute links additionally get `locale` inserted after the leading
/// separator (`/a` → `/zh-cn/a`).
///
/// # Example
/// ```
/// use docweave::html::add_link_type;
/// assert_eq!(
///     add_link_type("<a href='/a' />", "zh-cn"),
///     "<a href='/zh-cn/a' data-linktype='absolute-path' />"
/// );
/// ```
pub fn add_link_type(html: &str, locale: &str) -> String {
    rewrite(html, |el| {
        let Some(raw) = el.raw_attr("href") else {
            return;
        };

        // Raw value: a rewritten href keeps its entity encoding
        let link = classify(raw, locale);
        if link.link_type == LinkType::AbsolutePath && link.is_rewritten() {
            debug!("link"; "{} -> {}", raw, link.href);
            el.set_attr_raw("href", &link.href);
        }
        el.set_attr(LINK_TYPE_ATTR, link.link_type.as_str());
    })
}

/// Hide the "rerun" button of embedded CodePen iframes.
pub fn remove_rerun_codepen_iframes(html: &str) -> String {
    rewrite(html, |el| {
        if !el.is("iframe") {
            return;
        }
        if let Some(src) = el.raw_attr("src").filter(|src| src.contains(CODEPEN_HOST)) {
            el.set_attr_raw("src", &format!("{src}{CODEPEN_RERUN_SUFFIX}"));
        }
    })
}

/// Remove `<style>`, `<link>` and `<script>` elements and every `style`
/// attribute.
pub fn strip_tags(html: &str) -> String {
    rewrite(html, |el| {
        if STRIPPED_TAGS.iter().any(|tag| el.is(tag)) {
            el.remove();
        } else if el.has_attr("style") {
            el.remove_attr("style");
        }
    })
}

/// Identity of one link attribute handed to [`transform_links`] callbacks.
#[derive(Debug, Clone, Copy)]
pub struct LinkAttr<'a> {
    /// Tag name as written in the source.
    pub tag: &'a str,
    /// `href` or `src`, as written in the source.
    pub attr: &'a str,
    /// Entity-decoded attribute value.
    pub value: &'a str,
}

/// Replace every `href` and `src` value with the callback's result.
///
/// `None` becomes an empty value. Everything except the value characters is
/// preserved byte for byte.
pub fn transform_links<F>(html: &str, mut f: F) -> String
where
    F: FnMut(&LinkAttr<'_>) -> Option<String>,
{
    rewrite(html, |el| {
        for name in ["href", "src"] {
            replace_link(el, name, &mut f);
        }
    })
}

fn replace_link<F>(el: &mut Element<'_, '_>, name: &str, f: &mut F)
where
    F: FnMut(&LinkAttr<'_>) -> Option<String>,
{
    let Some(value) = el.attr(name) else {
        return;
    };
    let replacement = f(&LinkAttr {
        tag: el.name(),
        attr: el.raw_attr_name(name).unwrap_or(name),
        value: &value,
    });
    el.set_attr(name, replacement.as_deref().unwrap_or_default());
}
