//! Span-preserving HTML tag scanner.
//!
//! Produces start/end tag tokens with byte spans into the original text so
//! that rewrites can replace exactly one attribute value and leave every other
//! byte (attribute order, spacing around `=`, quote style, name case) intact.
//!
//! Text, comments, doctypes and processing instructions are skipped. The
//! content of `<script>` and `<style>` is treated as raw text when a closing
//! tag exists.

use std::borrow::Cow;
use std::ops::Range;

// =============================================================================
// Tokens
// =============================================================================

/// Attribute value with its span (quotes excluded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrValue<'a> {
    pub raw: &'a str,
    pub span: Range<usize>,
    pub quote: Option<char>,
}

/// One attribute inside a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    /// Start of the whitespace preceding the name.
    pub lead: usize,
    pub name_span: Range<usize>,
    pub value: Option<AttrValue<'a>>,
    /// End of the attribute, after any closing quote.
    pub end: usize,
}

impl<'a> Attribute<'a> {
    /// Raw (still entity-encoded) value, empty for bare attributes.
    #[inline]
    pub fn raw_value(&self) -> &'a str {
        self.value.as_ref().map_or("", |v| v.raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag<'a> {
    pub name: &'a str,
    pub span: Range<usize>,
    pub attrs: Vec<Attribute<'a>>,
    /// Insertion point for new attributes: end of the last attribute, or of
    /// the tag name when there are none.
    pub attrs_end: usize,
    pub self_closing: bool,
}

impl<'a> StartTag<'a> {
    /// Case-insensitive tag name check.
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// First attribute named `name` (case-insensitive).
    pub fn attr(&self, name: &str) -> Option<&Attribute<'a>> {
        self.attrs.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub(crate) fn attr_index(&self, name: &str) -> Option<usize> {
        self.attrs.iter().position(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Quote style used by the tag's first quoted attribute, `"` otherwise.
    pub fn preferred_quote(&self) -> char {
        self.attrs
            .iter()
            .find_map(|a| a.value.as_ref().and_then(|v| v.quote))
            .unwrap_or('"')
    }

    /// Whether the element opens raw text (`<script>` or `<style>`).
    pub fn is_raw_text(&self) -> bool {
        !self.self_closing && is_raw_text_element(&self.name.to_ascii_lowercase())
    }

    /// Whether the element has no content (void or `/>`).
    pub fn is_empty_element(&self) -> bool {
        self.self_closing || is_void_element(&self.name.to_ascii_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndTag<'a> {
    pub name: &'a str,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Start(StartTag<'a>),
    End(EndTag<'a>),
}

// =============================================================================
// Element Classification
// =============================================================================

/// Check if an HTML tag is a void element (self-closing).
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Check if tag is a raw text element (content is not markup).
#[inline]
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

// =============================================================================
// Scanner
// =============================================================================

#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

/// Tokenize all start and end tags in document order.
pub fn tokenize(html: &str) -> Vec<Token<'_>> {
    let bytes = html.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(offset) = html[pos..].find('<') {
        let start = pos + offset;
        let rest = &html[start..];

        if let Some(body) = rest.strip_prefix("<!--") {
            // `<!-->` and `<!--->` are complete empty comments
            pos = if body.starts_with('>') {
                start + 5
            } else if body.starts_with("->") {
                start + 6
            } else {
                body.find("-->").map_or(html.len(), |i| start + 4 + i + 3)
            };
        } else if rest.starts_with("</") {
            match scan_end_tag(html, start) {
                Some(tag) => {
                    pos = tag.span.end;
                    tokens.push(Token::End(tag));
                }
                None => pos = start + 2,
            }
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            pos = rest.find('>').map_or(html.len(), |i| start + i + 1);
        } else if bytes.get(start + 1).is_some_and(u8::is_ascii_alphabetic) {
            let tag = scan_start_tag(html, start);
            pos = tag.span.end;

            if tag.is_raw_text() {
                // Unclosed raw text elements are scanned as ordinary markup
                let close_tag = format!("</{}", tag.name);
                if let Some(close) = find_ignore_case(html, pos, &close_tag) {
                    pos = close;
                }
            }
            tokens.push(Token::Start(tag));
        } else {
            pos = start + 1;
        }
    }

    tokens
}

fn find_ignore_case(html: &str, from: usize, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    html.as_bytes()[from..]
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
        .map(|i| from + i)
}

/// `html` with the bodies of closed `<script>` and `<style>` elements
/// removed. Tags and everything outside them are kept.
pub fn strip_raw_text(html: &str) -> Cow<'_, str> {
    let tokens = tokenize(html);
    let mut out = String::new();
    let mut copied = 0;

    for pair in tokens.windows(2) {
        let [Token::Start(open), Token::End(close)] = pair else {
            continue;
        };
        if open.is_raw_text()
            && close.name.eq_ignore_ascii_case(open.name)
            && open.span.end < close.span.start
        {
            out.push_str(&html[copied..open.span.end]);
            copied = close.span.start;
        }
    }

    if copied == 0 {
        return Cow::Borrowed(html);
    }
    out.push_str(&html[copied..]);
    Cow::Owned(out)
}

fn scan_name(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && !is_space(bytes[pos]) && !matches!(bytes[pos], b'>' | b'/') {
        pos += 1;
    }
    pos
}

fn skip_space(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && is_space(bytes[pos]) {
        pos += 1;
    }
    pos
}

fn scan_end_tag(html: &str, start: usize) -> Option<EndTag<'_>> {
    let bytes = html.as_bytes();
    let name_start = start + 2;
    if !bytes.get(name_start).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    let name_end = scan_name(bytes, name_start);
    let end = html[name_end..]
        .find('>')
        .map_or(html.len(), |i| name_end + i + 1);

    Some(EndTag {
        name: &html[name_start..name_end],
        span: start..end,
    })
}

fn scan_start_tag(html: &str, start: usize) -> StartTag<'_> {
    let bytes = html.as_bytes();
    let len = bytes.len();

    let name_end = scan_name(bytes, start + 1);
    let name = &html[start + 1..name_end];

    let mut pos = name_end;
    let mut attrs = Vec::new();
    let mut attrs_end = name_end;
    let mut self_closing = false;

    loop {
        let lead = pos;
        pos = skip_space(bytes, pos);
        if pos >= len {
            break;
        }
        match bytes[pos] {
            b'>' => {
                pos += 1;
                break;
            }
            b'/' if bytes.get(pos + 1) == Some(&b'>') => {
                self_closing = true;
                pos += 2;
                break;
            }
            b'/' => {
                pos += 1;
                continue;
            }
            _ => {}
        }

        // Attribute name: the first byte is always consumed so stray `=` or
        // quotes still make progress.
        let attr_start = pos;
        pos += 1;
        while pos < len && !is_space(bytes[pos]) && !matches!(bytes[pos], b'=' | b'>' | b'/') {
            pos += 1;
        }
        let attr_name_end = pos;

        let mut value = None;
        let mut look = skip_space(bytes, pos);
        if look < len && bytes[look] == b'=' {
            look = skip_space(bytes, look + 1);
            if look < len && matches!(bytes[look], b'"' | b'\'') {
                let quote = bytes[look] as char;
                let value_start = look + 1;
                let value_end = html[value_start..]
                    .find(quote)
                    .map_or(len, |i| value_start + i);
                value = Some(AttrValue {
                    raw: &html[value_start..value_end],
                    span: value_start..value_end,
                    quote: Some(quote),
                });
                pos = (value_end + 1).min(len);
            } else {
                let value_start = look;
                while look < len && !is_space(bytes[look]) && bytes[look] != b'>' {
                    look += 1;
                }
                value = Some(AttrValue {
                    raw: &html[value_start..look],
                    span: value_start..look,
                    quote: None,
                });
                pos = look;
            }
        }

        attrs.push(Attribute {
            name: &html[attr_start..attr_name_end],
            lead,
            name_span: attr_start..attr_name_end,
            value,
            end: pos,
        });
        attrs_end = pos;
    }

    StartTag {
        name,
        span: start..pos.min(len),
        attrs,
        attrs_end,
        self_closing,
    }
}

/// Byte offset where the element opened by `tokens[index]` ends.
///
/// Nested elements of the same name are balanced. An element without a
/// matching end tag ends with its start tag. `None` if `tokens[index]` is
/// not a start tag.
pub fn element_end(tokens: &[Token<'_>], index: usize) -> Option<usize> {
    let Some(Token::Start(open)) = tokens.get(index) else {
        return None;
    };
    if open.is_empty_element() {
        return Some(open.span.end);
    }

    let mut depth = 0usize;
    for token in &tokens[index + 1..] {
        match token {
            Token::Start(tag) if tag.is(open.name) && !tag.self_closing => depth += 1,
            Token::End(tag) if tag.name.eq_ignore_ascii_case(open.name) => {
                if depth == 0 {
                    return Some(tag.span.end);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    Some(open.span.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_tags(html: &str) -> Vec<StartTag<'_>> {
        tokenize(html)
            .into_iter()
            .filter_map(|t| match t {
                Token::Start(tag) => Some(tag),
                Token::End(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_attribute_spans() {
        let html = "<a   target='_blank'   href = \"h\" disabled>";
        let tags = start_tags(html);
        assert_eq!(tags.len(), 1);

        let tag = &tags[0];
        assert_eq!(tag.name, "a");
        assert_eq!(tag.attrs.len(), 3);

        let href = tag.attr("HREF").unwrap();
        let value = href.value.as_ref().unwrap();
        assert_eq!(value.raw, "h");
        assert_eq!(value.quote, Some('"'));
        assert_eq!(&html[value.span.clone()], "h");

        let target = tag.attr("target").unwrap();
        assert_eq!(&html[target.lead..target.end], "   target='_blank'");

        let disabled = tag.attr("disabled").unwrap();
        assert!(disabled.value.is_none());
        assert_eq!(tag.attrs_end, html.len() - 1);
        assert_eq!(tag.preferred_quote(), '\'');
    }

    #[test]
    fn test_unquoted_and_self_closing() {
        let html = "<img src=a/b.png alt=x />";
        let tag = &start_tags(html)[0];
        assert!(tag.self_closing);
        assert_eq!(tag.attr("src").unwrap().raw_value(), "a/b.png");
        assert_eq!(tag.attr("alt").unwrap().raw_value(), "x");
        assert_eq!(tag.span, 0..html.len());
    }

    #[test]
    fn test_skips_comments_and_doctype() {
        let html = "<!DOCTYPE html><!-- <a href='x'> --><p>1 < 2</p>";
        let tokens = tokenize(html);
        assert_eq!(tokens.len(), 2);
        assert!(matches!(&tokens[0], Token::Start(t) if t.name == "p"));
        assert!(matches!(&tokens[1], Token::End(t) if t.name == "p"));
    }

    #[test]
    fn test_raw_text_content_skipped() {
        let html = "<script>var a = '<a href=\"x\">';</script><a href='y'>";
        let tags = start_tags(html);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1].attr("href").unwrap().raw_value(), "y");
    }

    #[test]
    fn test_empty_comments_are_closed() {
        for html in ["<!--><a href='x'>", "<!---><a href='x'>"] {
            let tags = start_tags(html);
            assert_eq!(tags.len(), 1, "input: {html}");
            assert_eq!(tags[0].attr("href").unwrap().raw_value(), "x");
        }
        // `-->` still terminates an ordinary comment
        assert!(start_tags("<!-- <b> --><i>").iter().all(|t| t.name == "i"));
    }

    #[test]
    fn test_raw_text_close_tag_any_case() {
        let tags = start_tags("<SCRIPT>a<b</ScRiPt><p>");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1].name, "p");
    }

    #[test]
    fn test_strip_raw_text() {
        assert!(matches!(strip_raw_text("<p>a</p>"), Cow::Borrowed("<p>a</p>")));
        assert_eq!(
            strip_raw_text("<p>x</p><script>for (i=0;i<n;i++){}</script><style>p{}</style><p>y</p>"),
            "<p>x</p><script></script><style></style><p>y</p>"
        );
        // Unclosed raw text is left alone
        assert_eq!(strip_raw_text("<div><style href='a'></div>"), "<div><style href='a'></div>");
    }

    #[test]
    fn test_unclosed_raw_text_scanned_as_markup() {
        let tokens = tokenize("<div><style href='a'></div>");
        assert_eq!(tokens.len(), 3);
        assert!(matches!(&tokens[2], Token::End(t) if t.name == "div"));
    }

    #[test]
    fn test_unterminated_tag() {
        let html = "<a href='x";
        let tag = &start_tags(html)[0];
        assert_eq!(tag.attr("href").unwrap().raw_value(), "x");
        assert_eq!(tag.span.end, html.len());
    }

    #[test]
    fn test_element_end_balances_nesting() {
        let html = "<div><div></div></div><p>";
        let tokens = tokenize(html);
        assert_eq!(element_end(&tokens, 0), Some("<div><div></div></div>".len()));
        assert_eq!(element_end(&tokens, 1), Some("<div><div></div>".len()));
        // End tag token
        assert_eq!(element_end(&tokens, 2), None);
    }

    #[test]
    fn test_element_end_void_and_unclosed() {
        let tokens = tokenize("<link href='a'><style>");
        assert_eq!(element_end(&tokens, 0), Some("<link href='a'>".len()));
        assert_eq!(element_end(&tokens, 1), Some("<link href='a'><style>".len()));
    }

    #[test]
    fn test_non_ascii_attribute_values() {
        let html = "<a title='héllo wörld' href='/文档'>";
        let tag = &start_tags(html)[0];
        assert_eq!(tag.attr("title").unwrap().raw_value(), "héllo wörld");
        assert_eq!(tag.attr("href").unwrap().raw_value(), "/文档");
    }
}
