//! Implementation of the `templar check` command.

use std::fs::read_to_string;
use std::path::PathBuf;

use miette::Report;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use templar::Properties;

use crate::output::BundleDiagnostic;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Files to check (.properties)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one checked file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    keys: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unterminated: Vec<UnterminatedPlaceholder>,
}

/// A value whose `{{` at byte `offset` of the value is never closed.
#[derive(Debug, Serialize)]
struct UnterminatedPlaceholder {
    key: String,
    offset: usize,
}

/// Run the check command.
///
/// Exits with `NOINPUT` if a file cannot be read, `DATAERR` if a file has
/// syntax errors. Unterminated placeholders only produce warnings.
pub fn run_check(args: CheckArgs) -> miette::Result<i32> {
    let mut reports = Vec::with_capacity(args.files.len());
    let mut unreadable = false;
    let mut invalid = false;

    for path in &args.files {
        let file = path.display().to_string();
        let content = match read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                unreadable = true;
                if !args.json {
                    eprintln!("Cannot read {}: {}", file, e);
                }
                reports.push(FileReport {
                    file,
                    keys: 0,
                    error: Some(e.to_string()),
                    unterminated: Vec::new(),
                });
                continue;
            }
        };

        match Properties::parse(&content) {
            Ok(properties) => {
                let unterminated = unterminated_placeholders(&properties);
                if !args.json {
                    for UnterminatedPlaceholder { key, offset } in &unterminated {
                        eprintln!(
                            "{} {}: '{}' has an unterminated placeholder at byte {}",
                            "warning:".if_supports_color(Stream::Stderr, |t| t.yellow()),
                            file,
                            key,
                            offset
                        );
                    }
                    println!(
                        "{} {} ({} keys)",
                        "ok".if_supports_color(Stream::Stdout, |t| t.green()),
                        file,
                        properties.len()
                    );
                }
                reports.push(FileReport {
                    file,
                    keys: properties.len(),
                    error: None,
                    unterminated,
                });
            }
            Err(e) => {
                invalid = true;
                if !args.json {
                    let diagnostic = BundleDiagnostic::from_parse_error(path, &content, &e);
                    eprintln!("{:?}", Report::new(diagnostic));
                }
                reports.push(FileReport {
                    file,
                    keys: 0,
                    error: Some(e.to_string()),
                    unterminated: Vec::new(),
                });
            }
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(&reports)
            .map_err(|e| miette::miette!("Cannot render JSON: {}", e))?;
        println!("{}", json);
    }

    if unreadable {
        Ok(exitcode::NOINPUT)
    } else if invalid {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}

/// Every entry whose value has an unterminated placeholder, in key order.
fn unterminated_placeholders(properties: &Properties) -> Vec<UnterminatedPlaceholder> {
    properties
        .iter()
        .filter_map(|(key, value)| {
            unterminated_placeholder(value).map(|offset| UnterminatedPlaceholder {
                key: key.clone(),
                offset,
            })
        })
        .collect()
}

/// Byte offset of the first `{{` with no closing `}}` after it.
///
/// Placeholders are matched the way the evaluator scans them: each `{{`
/// closes at the next `}}`.
fn unterminated_placeholder(value: &str) -> Option<usize> {
    let mut i = 0;
    while let Some(start) = value[i..].find("{{").map(|p| p + i) {
        match value[start + 2..].find("}}") {
            Some(end) => i = start + 2 + end + 2,
            None => return Some(start),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminated_placeholders_pass() {
        assert_eq!(unterminated_placeholder("Hello {{name}}, {{n}} new"), None);
        assert_eq!(unterminated_placeholder("no placeholders"), None);
    }

    #[test]
    fn reports_first_unterminated_placeholder() {
        assert_eq!(unterminated_placeholder("{{a}} and {{b"), Some(10));
        assert_eq!(unterminated_placeholder("{{"), Some(0));
    }

    #[test]
    fn reports_key_and_offset_per_entry() {
        let properties =
            Properties::parse("ok = Hi {{name}}
bad = Hi {{name
worse = {{a}} {{b}} {{c
")
                .unwrap();
        let found: Vec<(String, usize)> = unterminated_placeholders(&properties)
            .into_iter()
            .map(|u| (u.key, u.offset))
            .collect();
        assert_eq!(
            found,
            vec![("bad".to_string(), 3), ("worse".to_string(), 12)]
        );
    }
}
