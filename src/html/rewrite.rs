//! Generic tokenize → per-element transform → splice pipeline.
//!
//! Transforms never re-serialize a tree. Each callback records edits against
//! byte spans of the original text, and [`rewrite`] splices them in. Bytes
//! outside an edited span are copied through unchanged.

use std::borrow::Cow;
use std::ops::Range;

use super::escape::{escape_attr_value, unescape};
use super::scan::{StartTag, Token, element_end, tokenize};

/// A pending replacement of `range` with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    range: Range<usize>,
    text: String,
}

#[derive(Debug, Clone)]
enum Change {
    /// Replacement for the value span, or `=value` appended after a bare name.
    Value(String),
    Remove,
}

/// Mutable view of one start tag during a rewrite.
pub struct Element<'t, 'a> {
    tag: &'t StartTag<'a>,
    changes: Vec<(usize, Change)>,
    added: Vec<(String, String)>,
    removed: bool,
}

impl<'t, 'a> Element<'t, 'a> {
    fn new(tag: &'t StartTag<'a>) -> Self {
        Self {
            tag,
            changes: Vec::new(),
            added: Vec::new(),
            removed: false,
        }
    }

    /// Tag name as written in the source.
    #[inline]
    pub fn name(&self) -> &'a str {
        self.tag.name
    }

    /// Case-insensitive tag name check.
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.tag.is(name)
    }

    #[inline]
    pub fn has_attr(&self, name: &str) -> bool {
        self.tag.attr(name).is_some()
    }

    /// Attribute value as written in the source (entities not decoded).
    pub fn raw_attr(&self, name: &str) -> Option<&'a str> {
        self.tag.attr(name).map(|a| a.raw_value())
    }

    /// Attribute name as written in the source.
    pub fn raw_attr_name(&self, name: &str) -> Option<&'a str> {
        self.tag.attr(name).map(|a| a.name)
    }

    /// Attribute value with entities decoded.
    pub fn attr(&self, name: &str) -> Option<Cow<'a, str>> {
        self.raw_attr(name).map(unescape)
    }

    /// Set an attribute, entity-encoding `value` for its quote style.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.put(name, value, true);
    }

    /// Set an attribute to already-encoded markup text.
    pub fn set_attr_raw(&mut self, name: &str, raw: &str) {
        self.put(name, raw, false);
    }

    /// Remove every occurrence of an attribute together with its leading
    /// whitespace.
    pub fn remove_attr(&mut self, name: &str) {
        let tag = self.tag;
        for (index, attr) in tag.attrs.iter().enumerate() {
            if attr.name.eq_ignore_ascii_case(name) {
                self.record(index, Change::Remove);
            }
        }
        self.added.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    /// Remove the whole element: start tag, content and end tag.
    pub fn remove(&mut self) {
        self.removed = true;
    }

    fn put(&mut self, name: &str, value: &str, encode: bool) {
        let preferred = self.tag.preferred_quote();
        let quoted = |quote: char| {
            let text = if encode {
                escape_attr_value(value, quote)
            } else {
                Cow::Borrowed(value)
            };
            format!("{quote}{text}{quote}")
        };

        let Some(index) = self.tag.attr_index(name) else {
            let text = quoted(preferred);
            match self.added.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
                Some(entry) => entry.1 = text,
                None => self.added.push((name.to_string(), text)),
            }
            return;
        };

        let attr = &self.tag.attrs[index];
        let text = match attr.value.as_ref() {
            Some(current) => match current.quote {
                Some(quote) if encode => escape_attr_value(value, quote).into_owned(),
                Some(_) => value.to_string(),
                None if is_safe_unquoted(value) => value.to_string(),
                None => quoted(preferred),
            },
            None => quoted(preferred),
        };
        self.record(index, Change::Value(text));
    }

    fn record(&mut self, index: usize, change: Change) {
        match self.changes.iter_mut().find(|(i, _)| *i == index) {
            Some(entry) => entry.1 = change,
            None => self.changes.push((index, change)),
        }
    }

    /// Edits for this element in ascending span order.
    fn into_edits(mut self) -> Vec<Edit> {
        self.changes.sort_by_key(|(index, _)| *index);

        let mut edits: Vec<Edit> = self
            .changes
            .into_iter()
            .map(|(index, change)| {
                let attr = &self.tag.attrs[index];
                match (change, attr.value.as_ref()) {
                    (Change::Remove, _) => Edit {
                        range: attr.lead..attr.end,
                        text: String::new(),
                    },
                    (Change::Value(text), Some(value)) => Edit {
                        range: value.span.clone(),
                        text,
                    },
                    (Change::Value(text), None) => Edit {
                        range: attr.name_span.end..attr.name_span.end,
                        text: format!("={text}"),
                    },
                }
            })
            .collect();

        if !self.added.is_empty() {
            let text = self
                .added
                .iter()
                .map(|(name, value)| format!(" {name}={value}"))
                .collect();
            let at = self.tag.attrs_end;
            edits.push(Edit { range: at..at, text });
        }
        edits
    }
}

/// Unquoted attribute values may not contain whitespace or `"'=<>\``.
fn is_safe_unquoted(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '=' | '<' | '>' | '`' | '&'))
}

/// Run `f` over every start tag and splice the recorded edits into `html`.
///
/// Descendants of an element removed by `f` are not visited.
pub fn rewrite<F>(html: &str, mut f: F) -> String
where
    F: FnMut(&mut Element<'_, '_>),
{
    let tokens = tokenize(html);
    let mut edits = Vec::new();
    let mut skip_until = 0;

    for (index, token) in tokens.iter().enumerate() {
        let Token::Start(tag) = token else {
            continue;
        };
        if tag.span.start < skip_until {
            continue;
        }

        let mut element = Element::new(tag);
        f(&mut element);

        if element.removed {
            let end = element_end(&tokens, index).unwrap_or(tag.span.end);
            edits.push(Edit {
                range: tag.span.start..end,
                text: String::new(),
            });
            skip_until = end;
        } else {
            edits.extend(element.into_edits());
        }
    }

    splice(html, &edits)
}

fn splice(html: &str, edits: &[Edit]) -> String {
    if edits.is_empty() {
        return html.to_string();
    }

    let mut out = String::with_capacity(html.len() + 64);
    let mut last = 0;
    for edit in edits {
        out.push_str(&html[last..edit.range.start]);
        out.push_str(&edit.text);
        last = edit.range.end;
    }
    out.push_str(&html[last..]);
    out
}
