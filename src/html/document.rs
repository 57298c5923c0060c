//! Parsed HTML document used for metadata extraction.
//!
//! Parsed with `tl` and flattened into an owned, pre-order node list. `tl`
//! has no raw text state, so script and style bodies are dropped with the
//! tag scanner before parsing and a `<` in inline code cannot open a tag.

use std::borrow::Cow;

use thiserror::Error;

use super::scan::{is_raw_text_element, strip_raw_text};

#[derive(Debug, Error)]
pub enum HtmlError {
    #[error("failed to parse HTML: {0}")]
    Parse(String),
}

/// One element or text node, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DocNode {
    Element {
        name: String,
        attrs: Vec<(String, Option<String>)>,
    },
    /// Raw (still entity-encoded) text.
    Text(String),
}

impl DocNode {
    /// Case-insensitive tag name check; always false for text.
    pub(crate) fn is(&self, tag: &str) -> bool {
        matches!(self, Self::Element { name, .. } if name.eq_ignore_ascii_case(tag))
    }

    /// Case-insensitive attribute lookup; `Some("")` for bare attributes.
    pub(crate) fn attr(&self, key: &str) -> Option<&str> {
        let Self::Element { attrs, .. } = self else {
            return None;
        };
        attrs
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct HtmlDocument {
    nodes: Vec<DocNode>,
}

impl HtmlDocument {
    pub fn parse(html: &str) -> Result<Self, HtmlError> {
        let source = strip_raw_text(html);
        let dom = tl::parse(&source, tl::ParserOptions::default())
            .map_err(|e| HtmlError::Parse(format!("{e:?}")))?;

        let parser = dom.parser();
        let mut nodes = Vec::new();
        for handle in dom.children() {
            collect(*handle, parser, &mut nodes);
        }
        Ok(Self { nodes })
    }

    /// Elements and text nodes in pre-order. Comments and the content of
    /// `<script>` and `<style>` are not included.
    pub(crate) fn nodes(&self) -> &[DocNode] {
        &self.nodes
    }
}

fn collect(handle: tl::NodeHandle, parser: &tl::Parser<'_>, out: &mut Vec<DocNode>) {
    let Some(node) = handle.get(parser) else {
        return;
    };

    match node {
        tl::Node::Tag(tag) => {
            let name = tag.name().as_utf8_str().into_owned();
            let attrs = tag
                .attributes()
                .iter()
                .map(|(key, value)| (key.into_owned(), value.map(Cow::into_owned)))
                .collect();

            // Unclosed raw text elements keep their content in the tree
            let descend = !is_raw_text_element(&name.to_ascii_lowercase());
            out.push(DocNode::Element { name, attrs });
            if descend {
                for child in tag.children().top().iter() {
                    collect(*child, parser, out);
                }
            }
        }
        tl::Node::Raw(text) => out.push(DocNode::Text(text.as_utf8_str().into_owned())),
        tl::Node::Comment(_) => {}
    }
}
