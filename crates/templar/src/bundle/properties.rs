//! Properties document parser using winnow.
//!
//! Handles:
//! - `#` and `!` comment lines, blank lines
//! - `=`, `:` or whitespace between key and value
//! - Backslash line continuation (leading whitespace of the next line dropped)
//! - Escape sequences: `\t \n \r \f \\`, `\uXXXX` including surrogate pairs

use std::collections::BTreeMap;
use std::collections::btree_map::Iter;

use winnow::combinator::{alt, cut_err, eof, opt, preceded, repeat};
use winnow::error::{StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, none_of, one_of, take_till, take_while};

use crate::bundle::error::ParseError;

/// A flat, string-keyed property set, iterated in key order.
///
/// # Example
///
/// ```
/// use templar::Properties;
///
/// let props = Properties::parse("# greeting\nhello = Hello {{ name }}!\n").unwrap();
/// assert_eq!(props.get("hello"), Some("Hello {{ name }}!"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a properties document. Later duplicates of a key win.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut remaining = input;
        match document(&mut remaining) {
            Ok(entries) => Ok(entries.into_iter().collect()),
            Err(e) => {
                let (line, column) = calculate_position(input, remaining);
                Err(ParseError::Syntax {
                    line,
                    column,
                    message: format!("parse error: {e}"),
                })
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay `other` on top of this set; keys in `other` win.
    pub fn extend(&mut self, other: Properties) {
        self.entries.extend(other.entries);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Calculate line and column from original input and remaining input.
fn calculate_position(original: &str, remaining: &str) -> (usize, usize) {
    let consumed = original.len() - remaining.len();
    let consumed_str = &original[..consumed];
    let line = consumed_str.chars().filter(|&c| c == '\n').count() + 1;
    let column = match consumed_str.rfind('\n') {
        Some(pos) => consumed - pos,
        None => consumed + 1,
    };
    (line, column)
}

/// Parse a whole document into entries, in file order.
fn document(input: &mut &str) -> ModalResult<Vec<(String, String)>> {
    let mut entries = Vec::new();
    loop {
        skip_blank_and_comments(input)?;
        if input.is_empty() {
            return Ok(entries);
        }
        entries.push(entry(input)?);
    }
}

/// Skip whitespace, line breaks, and comment lines.
///
/// Entries always run to the end of their line, so any `#` or `!` reached
/// here starts a line.
fn skip_blank_and_comments(input: &mut &str) -> ModalResult<()> {
    let _: Vec<()> = repeat(
        0..,
        alt((
            take_while(1.., is_blank_or_newline).void(),
            comment_line.void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

/// Parse a comment line: `#` or `!` up to the line break.
fn comment_line<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    preceded(one_of(['#', '!']), take_till(0.., ['\n', '\r'])).parse_next(input)
}

/// Parse `key [sep] value` up to the end of the logical line.
fn entry(input: &mut &str) -> ModalResult<(String, String)> {
    let key: Vec<Option<char>> = repeat(0.., key_char).parse_next(input)?;
    separator(input)?;
    let value: Vec<Option<char>> = repeat(0.., value_char).parse_next(input)?;
    Ok((
        key.into_iter().flatten().collect(),
        value.into_iter().flatten().collect(),
    ))
}

/// Whitespace, then an optional `=` or `:`, then more whitespace.
fn separator(input: &mut &str) -> ModalResult<()> {
    (
        take_while(0.., is_blank),
        opt(one_of(['=', ':'])),
        take_while(0.., is_blank),
    )
        .void()
        .parse_next(input)
}

fn key_char(input: &mut &str) -> ModalResult<Option<char>> {
    alt((
        escape,
        none_of([' ', '\t', '\x0c', '=', ':', '\n', '\r', '\\']).map(Some),
    ))
    .parse_next(input)
}

fn value_char(input: &mut &str) -> ModalResult<Option<char>> {
    alt((escape, none_of(['\n', '\r', '\\']).map(Some))).parse_next(input)
}

/// Parse a backslash escape. Line continuations and a trailing backslash at
/// end of input produce no character.
fn escape(input: &mut &str) -> ModalResult<Option<char>> {
    preceded(
        '\\',
        alt((
            line_continuation.value(None),
            eof.value(None),
            preceded('u', cut_err(unicode_escape)).map(Some),
            any.map(|c: char| {
                Some(match c {
                    't' => '\t',
                    'n' => '\n',
                    'r' => '\r',
                    'f' => '\x0c',
                    other => other,
                })
            }),
        )),
    )
    .parse_next(input)
}

/// A line break followed by the next line's leading whitespace.
fn line_continuation(input: &mut &str) -> ModalResult<()> {
    (alt(("\r\n", "\n", "\r")), take_while(0.., is_blank))
        .void()
        .parse_next(input)
}

/// Parse the `XXXX` of a `\uXXXX` escape, pairing UTF-16 surrogates.
///
/// An unpaired surrogate becomes U+FFFD.
fn unicode_escape(input: &mut &str) -> ModalResult<char> {
    let unit = hex4(input)?;
    if !(0xD800..=0xDBFF).contains(&unit) {
        return Ok(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
    }
    let low: Option<u32> = opt(preceded("\\u", hex4)).parse_next(input)?;
    let decoded = match low {
        Some(low @ 0xDC00..=0xDFFF) => {
            char::from_u32(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00))
        }
        _ => None,
    };
    Ok(decoded.unwrap_or(char::REPLACEMENT_CHARACTER))
}

fn hex4(input: &mut &str) -> ModalResult<u32> {
    take_while(4, |c: char| c.is_ascii_hexdigit())
        .try_map(|digits: &str| u32::from_str_radix(digits, 16))
        .context(StrContext::Label("unicode escape"))
        .context(StrContext::Expected(StrContextValue::Description(
            "four hex digits",
        )))
        .parse_next(input)
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

fn is_blank_or_newline(c: char) -> bool {
    is_blank(c) || c == '\n' || c == '\r'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculate_position_counts_lines_and_columns() {
        let input = "a=1\nbb=2";
        assert_eq!(calculate_position(input, input), (1, 1));
        assert_eq!(calculate_position(input, &input[6..]), (2, 3));
    }

    #[test]
    fn unicode_escape_pairs_surrogates() {
        let mut input = "D83D\\uDE00rest";
        assert_eq!(unicode_escape(&mut input).unwrap(), '\u{1F600}');
        assert_eq!(input, "rest");
    }

    #[test]
    fn unpaired_surrogate_becomes_replacement() {
        let mut input = "D83Dx";
        assert_eq!(unicode_escape(&mut input).unwrap(), char::REPLACEMENT_CHARACTER);
        assert_eq!(input, "x");
    }
}
