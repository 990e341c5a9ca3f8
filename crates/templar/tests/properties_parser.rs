//! Tests for the properties document parser.

use templar::Properties;
use templar::bundle::ParseError;

fn parse(input: &str) -> Properties {
    Properties::parse(input).unwrap()
}

// =========================================================================
// Separators
// =========================================================================

#[test]
fn equals_colon_and_whitespace_separators() {
    let props = parse("a=1\nb = 2\nc:3\nd : 4\ne 5\nf\t6\n");
    assert_eq!(props.get("a"), Some("1"));
    assert_eq!(props.get("b"), Some("2"));
    assert_eq!(props.get("c"), Some("3"));
    assert_eq!(props.get("d"), Some("4"));
    assert_eq!(props.get("e"), Some("5"));
    assert_eq!(props.get("f"), Some("6"));
    assert_eq!(props.len(), 6);
}

#[test]
fn separator_characters_inside_value_are_kept() {
    let props = parse("url = http://example.com/?a=b:c\n");
    assert_eq!(props.get("url"), Some("http://example.com/?a=b:c"));
}

#[test]
fn whitespace_separated_value_keeps_inner_spaces() {
    let props = parse("greeting Good morning  you\n");
    assert_eq!(props.get("greeting"), Some("Good morning  you"));
}

#[test]
fn key_without_value() {
    let props = parse("empty=\nlonely\n");
    assert_eq!(props.get("empty"), Some(""));
    assert_eq!(props.get("lonely"), Some(""));
}

#[test]
fn trailing_whitespace_of_value_is_kept() {
    let props = parse("a = b  \n");
    assert_eq!(props.get("a"), Some("b  "));
}

#[test]
fn dotted_keys_and_placeholders() {
    let props = parse("error.templating.malformedTemplateEncountered = Bad template {{ template }}\n");
    assert_eq!(
        props.get("error.templating.malformedTemplateEncountered"),
        Some("Bad template {{ template }}")
    );
}

// =========================================================================
// Comments and blank lines
// =========================================================================

#[test]
fn comments_and_blank_lines_are_skipped() {
    let props = parse("# comment\n\n! another comment\n   \n  indented = yes\n");
    assert_eq!(props.len(), 1);
    assert_eq!(props.get("indented"), Some("yes"));
}

#[test]
fn hash_inside_value_is_not_a_comment() {
    let props = parse("a = b # c\n");
    assert_eq!(props.get("a"), Some("b # c"));
}

#[test]
fn crlf_line_endings() {
    let props = parse("a=1\r\nb=2\r\n");
    assert_eq!(props.get("a"), Some("1"));
    assert_eq!(props.get("b"), Some("2"));
}

#[test]
fn empty_document() {
    assert!(parse("").is_empty());
    assert!(parse("# only a comment").is_empty());
}

// =========================================================================
// Continuations and escapes
// =========================================================================

#[test]
fn line_continuation_joins_lines() {
    let props = parse("message = first \\\n    second \\\n\tthird\nnext = 1\n");
    assert_eq!(props.get("message"), Some("first second third"));
    assert_eq!(props.get("next"), Some("1"));
}

#[test]
fn escape_sequences() {
    let props = parse("tab=a\\tb\nnewline=a\\nb\nslash=a\\\\b\nother=\\q\n");
    assert_eq!(props.get("tab"), Some("a\tb"));
    assert_eq!(props.get("newline"), Some("a\nb"));
    assert_eq!(props.get("slash"), Some("a\\b"));
    assert_eq!(props.get("other"), Some("q"));
}

#[test]
fn escaped_separator_in_key() {
    let props = parse("my\\ key\\=x = value\n");
    assert_eq!(props.get("my key=x"), Some("value"));
}

#[test]
fn unicode_escapes() {
    let props = parse("e=caf\\u00e9\nsmile=\\uD83D\\uDE00\n");
    assert_eq!(props.get("e"), Some("café"));
    assert_eq!(props.get("smile"), Some("\u{1F600}"));
}

#[test]
fn trailing_backslash_at_end_of_input_is_dropped() {
    let props = parse("a = b\\");
    assert_eq!(props.get("a"), Some("b"));
}

#[test]
fn later_duplicate_wins() {
    let props = parse("a=1\na=2\n");
    assert_eq!(props.get("a"), Some("2"));
    assert_eq!(props.len(), 1);
}

#[test]
fn utf8_values() {
    let props = parse("greeting = Привет, {{name}}!\n");
    assert_eq!(props.get("greeting"), Some("Привет, {{name}}!"));
}

// =========================================================================
// Errors
// =========================================================================

#[test]
fn malformed_unicode_escape_is_an_error() {
    let err = Properties::parse("ok = 1\nbad = \\u12G4\n").unwrap_err();
    match err {
        ParseError::Syntax { line, message, .. } => {
            assert_eq!(line, 2);
            assert!(message.contains("parse error"));
        }
    }
}

// =========================================================================
// Collection behaviour
// =========================================================================

#[test]
fn iterates_in_key_order() {
    let props = parse("b=2\na=1\nc=3\n");
    let keys: Vec<&str> = props.keys().collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
}

#[test]
fn extend_overlays_other_set() {
    let mut base: Properties = [("a", "1"), ("b", "2")].into_iter().collect();
    base.extend([("b", "two"), ("c", "3")].into_iter().collect());
    assert_eq!(base.get("a"), Some("1"));
    assert_eq!(base.get("b"), Some("two"));
    assert_eq!(base.get("c"), Some("3"));
}
