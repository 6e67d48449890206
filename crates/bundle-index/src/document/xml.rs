//! Span-aware XML tag tokenizer
//!
//! Only the subset emitted by repository indexers is understood: elements,
//! attributes quoted with `'` or `"`, declarations, comments and text.
//! Every tag carries its byte span in the source so callers can slice the
//! original text verbatim.

use std::borrow::Cow;
use std::ops::Range;

use crate::error::{Error, Result};

/// Escape an attribute or text value.
pub fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '\'', '"']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Resolve the predefined entities and numeric character references.
///
/// Unknown entities are kept as written.
pub fn unescape(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let Some(semi) = rest.find(';') else {
            break;
        };
        let entity = &rest[1..semi];
        let resolved = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "apos" => Some('\''),
            "quot" => Some('"'),
            _ => entity
                .strip_prefix("#x")
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };
        match resolved {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<name ...>`
    Open,
    /// `</name>`
    Close,
    /// `<name .../>`
    Empty,
}

/// One element tag with unescaped attribute values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    pub kind: TagKind,
    pub name: &'a str,
    pub attributes: Vec<(&'a str, String)>,
    /// Byte range of the whole tag, `<` through `>`
    pub span: Range<usize>,
}

impl Tag<'_> {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Iterator over the element tags of a document.
///
/// Declarations, comments, CDATA sections, processing instructions and
/// text are skipped. A malformed tag yields an error and scanning resumes
/// at the next `<`. Unterminated markup exhausts the iterator.
pub struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn fail(&mut self, offset: usize, message: impl Into<String>) -> Option<Result<Tag<'a>>> {
        self.pos = self.source.len();
        Some(Err(Error::Document {
            offset,
            message: message.into(),
        }))
    }

    fn skip_past(&mut self, start: usize, terminator: &str) -> Option<Result<Tag<'a>>> {
        match self.source[start..].find(terminator) {
            Some(idx) => {
                self.pos = start + idx + terminator.len();
                None
            }
            None => self.fail(start, format!("unterminated markup, expected '{terminator}'")),
        }
    }

    fn parse_tag(&mut self, start: usize) -> Result<Tag<'a>> {
        let src = self.source;
        let bytes = src.as_bytes();
        let mut i = start + 1;
        let closing = bytes.get(i) == Some(&b'/');
        if closing {
            i += 1;
        }

        let name_start = i;
        while i < bytes.len() && !matches!(bytes[i], b' ' | b'\t' | b'\r' | b'\n' | b'/' | b'>') {
            i += 1;
        }
        if i == name_start {
            return Err(document_error(start, "tag without a name"));
        }
        let name = &src[name_start..i];
        let mut attributes = Vec::new();

        loop {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i) {
                None => return Err(document_error(start, format!("unterminated tag <{name}>"))),
                Some(b'>') => {
                    let kind = if closing { TagKind::Close } else { TagKind::Open };
                    return Ok(Tag {
                        kind,
                        name,
                        attributes,
                        span: start..i + 1,
                    });
                }
                Some(b'/') if !closing && bytes.get(i + 1) == Some(&b'>') => {
                    return Ok(Tag {
                        kind: TagKind::Empty,
                        name,
                        attributes,
                        span: start..i + 2,
                    });
                }
                Some(_) if closing => {
                    return Err(document_error(i, format!("unexpected content in </{name}>")));
                }
                Some(_) => {}
            }

            let attr_start = i;
            while i < bytes.len()
                && !matches!(bytes[i], b'=' | b'>' | b'/')
                && !bytes[i].is_ascii_whitespace()
            {
                i += 1;
            }
            let attr_name = &src[attr_start..i];
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if attr_name.is_empty() || bytes.get(i) != Some(&b'=') {
                return Err(document_error(attr_start, format!("malformed attribute in <{name}>")));
            }
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let quote = match bytes.get(i) {
                Some(&q @ (b'\'' | b'"')) => q,
                _ => {
                    return Err(document_error(i, format!("unquoted value for '{attr_name}'")));
                }
            };
            let value_start = i + 1;
            let Some(len) = bytes[value_start..].iter().position(|&b| b == quote) else {
                return Err(document_error(
                    value_start,
                    format!("unterminated value for '{attr_name}'"),
                ));
            };
            let raw = &src[value_start..value_start + len];
            attributes.push((attr_name, unescape(raw).into_owned()));
            i = value_start + len + 1;
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Tag<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let start = self.pos + self.source[self.pos..].find('<')?;
            let rest = &self.source[start..];

            let skipped = if rest.starts_with("<?") {
                self.skip_past(start, "?>")
            } else if rest.starts_with("<!--") {
                self.skip_past(start, "-->")
            } else if rest.starts_with("<![CDATA[") {
                self.skip_past(start, "]]>")
            } else if rest.starts_with("<!") {
                self.skip_past(start, ">")
            } else {
                return match self.parse_tag(start) {
                    Ok(tag) => {
                        self.pos = tag.span.end;
                        Some(Ok(tag))
                    }
                    Err(e) => {
                        self.pos = start + 1;
                        Some(Err(e))
                    }
                };
            };

            if skipped.is_some() {
                return skipped;
            }
        }
    }
}

fn document_error(offset: usize, message: impl Into<String>) -> Error {
    Error::Document {
        offset,
        message: message.into(),
    }
}
