//! Implementation of the `templar query` command.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use templar::bundle::DirectoryProvider;
use templar::{I18nError, Locale, Messages};
use tracing::debug;

use crate::commands::{parse_key_val, to_params};

/// Arguments for the query command.
#[derive(Debug, clap::Args)]
pub struct QueryArgs {
    /// Directory containing bundle files
    #[arg(long, env = "TEMPLAR_DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Bundle basename, relative to the directory
    #[arg(long, required = true)]
    pub basename: String,

    /// Locale to resolve the bundle for (e.g., en-US, de)
    #[arg(long, default_value = "und")]
    pub locale: String,

    /// Message key to look up
    pub key: String,

    /// Build the message with these parameters (name=value, repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for query results.
#[derive(Serialize)]
struct QueryResult<'a> {
    key: &'a str,
    locale: String,
    message: &'a str,
    loaded_from: Vec<String>,
}

/// JSON output for query failures.
#[derive(Serialize)]
struct QueryFailure {
    error: String,
    error_key: &'static str,
}

/// Run the query command.
pub fn run_query(args: QueryArgs) -> miette::Result<i32> {
    let locale: Locale = args
        .locale
        .parse()
        .map_err(|e| miette::miette!("Invalid locale '{}': {}", args.locale, e))?;
    debug!(dir = %args.dir.display(), basename = %args.basename, %locale, "querying bundle");

    let messages = Messages::builder()
        .basename(args.basename.as_str())
        .locale(locale.clone())
        .provider(Arc::new(DirectoryProvider::new(&args.dir)))
        .build();

    let outcome = if args.params.is_empty() {
        messages.query_key(&args.key)
    } else {
        messages.build_message_with_map(&args.key, &to_params(args.params))
    };

    match outcome {
        Ok(message) => {
            if args.json {
                let loaded_from = messages
                    .bundle()
                    .resolve()
                    .map(|bundle| bundle.loaded_from().to_vec())
                    .unwrap_or_default();
                let output = QueryResult {
                    key: &args.key,
                    locale: locale.to_string(),
                    message: &message,
                    loaded_from,
                };
                let json = serde_json::to_string_pretty(&output)
                    .map_err(|e| miette::miette!("Cannot render JSON: {}", e))?;
                println!("{}", json);
            } else {
                println!("{}", message);
            }
            Ok(exitcode::OK)
        }
        Err(e) => {
            if args.json {
                let output = QueryFailure {
                    error: e.to_string(),
                    error_key: e.error_key(),
                };
                let json = serde_json::to_string_pretty(&output)
                    .map_err(|e| miette::miette!("Cannot render JSON: {}", e))?;
                eprintln!("{}", json);
            } else {
                eprintln!("Query error: {}", e);
            }
            Ok(exit_code(&e))
        }
    }
}

/// A missing bundle is missing input; anything else is bad data.
fn exit_code(e: &I18nError) -> i32 {
    match e {
        I18nError::MissingResourceBundle { .. } => exitcode::NOINPUT,
        I18nError::MissingMessageKey { .. } | I18nError::MessageBuildFailure { .. } => {
            exitcode::DATAERR
        }
    }
}
