//! Search and navigation metadata: inner text, word count, bookmarks.

use std::borrow::Cow;

use super::document::{DocNode, HtmlDocument};
use super::escape::unescape;

/// Decoded content of every text node in document order.
fn texts(doc: &HtmlDocument) -> impl Iterator<Item = Cow<'_, str>> {
    doc.nodes().iter().filter_map(|node| match node {
        DocNode::Text(raw) => Some(unescape(raw)),
        DocNode::Element { .. } => None,
    })
}

/// All text content concatenated, with nothing inserted at tag boundaries.
///
/// ```
/// use docweave::html::{HtmlDocument, inner_text};
/// let doc = HtmlDocument::parse("<p>a &amp; b</p><p>c</p>").unwrap();
/// assert_eq!(inner_text(&doc), "a & bc");
/// ```
pub fn inner_text(doc: &HtmlDocument) -> String {
    texts(doc).collect()
}

/// Number of alphanumeric runs, counted per text node.
pub fn count_words(doc: &HtmlDocument) -> usize {
    texts(doc).map(|text| words_in(&text)).sum()
}

fn words_in(text: &str) -> usize {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|run| !run.is_empty())
        .count()
}

/// In-page anchor identifiers in document order.
///
/// Every element contributes its `id`; an `<a>` without one contributes its
/// `name`. Empty values are skipped, duplicates kept.
pub fn bookmarks(doc: &HtmlDocument) -> Vec<String> {
    doc.nodes()
        .iter()
        .filter_map(|node| {
            node.attr("id").filter(|id| !id.is_empty()).or_else(|| {
                node.is("a")
                    .then(|| node.attr("name"))
                    .flatten()
                    .filter(|name| !name.is_empty())
            })
        })
        .map(|mark| unescape(mark).into_owned())
        .collect()
}
