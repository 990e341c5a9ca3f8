//! Miette diagnostic wrapper for properties parse errors.
//!
//! Note: This module has an exception for `unused_assignments` because miette
//! derive macros read struct fields in generated code that rustc cannot track.
#![allow(unused_assignments)]

use std::path::Path;

use miette::{Diagnostic, NamedSource, SourceSpan};
use templar::bundle::ParseError;
use thiserror::Error;

/// A miette-compatible diagnostic for bundle file syntax errors.
///
/// Note: Fields are read by miette derive macros, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("syntax error: {message}")]
#[diagnostic(code(templar::syntax))]
pub struct BundleDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl BundleDiagnostic {
    /// Create a diagnostic from a ParseError with source context.
    pub fn from_parse_error(path: &Path, content: &str, err: &ParseError) -> Self {
        let ParseError::Syntax {
            line,
            column,
            message,
        } = err;

        let offset = byte_offset(content, *line, *column);
        let help = message
            .contains("unicode escape")
            .then(|| "`\\u` must be followed by exactly four hex digits".to_string());

        BundleDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: (offset, 1).into(),
            message: message.clone(),
            help,
        }
    }
}

/// Convert a 1-based line:column to a byte offset, clamped to the content.
///
/// Sum of (line_length + 1) for lines before the error line, plus column.
fn byte_offset(content: &str, line: usize, column: usize) -> usize {
    let offset = content
        .lines()
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum::<usize>()
        + column.saturating_sub(1);
    offset.min(content.len())
}
