//! HTML entity escaping.
//!
//! - `escape_attr_value()` - attribute values inside a known quote style
//! - `unescape()` - named and numeric character references

use std::borrow::Cow;

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape an attribute value that will sit between `quote` characters.
///
/// Only `&`, `<` and the quote character itself are encoded, so values such as
/// `a>b` or URLs with brackets survive unchanged.
///
/// # Example
/// ```
/// use docweave::html::escape_attr_value;
/// assert_eq!(escape_attr_value("a&b<c>", '\''), "a&amp;b&lt;c>");
/// assert_eq!(escape_attr_value("it's", '\''), "it&#39;s");
/// assert_eq!(escape_attr_value("it's", '"'), "it's");
/// ```
#[inline]
pub fn escape_attr_value(s: &str, quote: char) -> Cow<'_, str> {
    escape_with(s, &['&', '<', quote])
}

/// Escape the characters in `chars`, borrowing when none occur.
#[inline]
fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c).filter(|_| chars.contains(&c)) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Unescape HTML entities back to characters.
///
/// Handles common named entities and numeric character references.
/// Unknown entities are kept verbatim.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        // Entity must end with ';' within a short window
        let entity = after
            .char_indices()
            .take(12)
            .find(|&(_, c)| c == ';')
            .map(|(i, _)| &after[..i]);

        match entity.and_then(|e| decode_entity(e).map(|c| (c, e.len()))) {
            Some((c, len)) => {
                result.push(c);
                rest = &after[len + 1..];
            }
            None => {
                result.push('&');
                rest = after;
            }
        }
    }
    result.push_str(rest);

    Cow::Owned(result)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        s => {
            let num = s.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attr_value_borrows_plain() {
        assert!(matches!(escape_attr_value("hello > world", '"'), Cow::Borrowed(_)));
        assert_eq!(escape_attr_value("it's", '\''), "it&#39;s");
    }

    #[test]
    fn test_escape_attr_value() {
        assert_eq!(
            escape_attr_value("~!@#$%^&*()<>?:,./][{}|", '\''),
            "~!@#$%^&amp;*()&lt;>?:,./][{}|"
        );
        assert_eq!(escape_attr_value("say \"hi\"", '"'), "say &quot;hi&quot;");
        assert_eq!(escape_attr_value("say \"hi\"", '\''), "say \"hi\"");
        assert_eq!(escape_attr_value("", '"'), "");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("hello"), "hello");
        assert_eq!(unescape("&lt;script&gt;"), "<script>");
        assert_eq!(unescape("a &amp; b"), "a & b");
        assert_eq!(unescape("&quot;hi&quot;"), "\"hi\"");
        assert_eq!(unescape("&#39;"), "'");
        assert_eq!(unescape("&#x27;"), "'");
        assert_eq!(unescape("&#65;"), "A");
        assert_eq!(unescape("&nbsp;"), "\u{00A0}");
    }

    #[test]
    fn test_unescape_keeps_unknown() {
        assert_eq!(unescape("a & b"), "a & b");
        assert_eq!(unescape("&bogus;"), "&bogus;");
        assert_eq!(unescape("AT&T"), "AT&T");
        assert_eq!(unescape("&amp"), "&amp");
    }
}
