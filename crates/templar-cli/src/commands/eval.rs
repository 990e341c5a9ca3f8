//! Implementation of the `templar eval` command.

use serde::Serialize;
use templar::{eval, MapLookup, Resolution, Resolving, TemplateError};

use crate::commands::{parse_key_val, to_params};

/// Arguments for the eval command.
#[derive(Debug, clap::Args)]
pub struct EvalArgs {
    /// Template string to evaluate
    #[arg(long, required = true)]
    pub template: String,

    /// Parameters in name=value format (repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Keep placeholders without a parameter instead of failing
    #[arg(long)]
    pub ignore_unresolved: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for eval results.
#[derive(Serialize)]
pub struct EvalResult {
    pub result: String,
}

/// JSON output for eval failures.
#[derive(Serialize)]
pub struct EvalFailure {
    pub error: String,
    pub error_key: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<String>,
}

impl From<&TemplateError> for EvalFailure {
    fn from(e: &TemplateError) -> Self {
        let unresolved = match e {
            TemplateError::UnresolvedExpression { expressions, .. } => expressions.clone(),
            TemplateError::MalformedTemplate { .. } => Vec::new(),
        };
        EvalFailure {
            error: e.to_string(),
            error_key: e.error_key(),
            unresolved,
        }
    }
}

/// Run the eval command.
pub fn run_eval(args: EvalArgs) -> miette::Result<i32> {
    let params = to_params(args.params);
    let lookup = MapLookup::new(&params);
    let ignore = |_: &[String]| Resolution::Ignore;

    let resolving = if args.ignore_unresolved {
        Resolving::builder()
            .resolver(&lookup)
            .on_unhandled(&ignore)
            .build()
    } else {
        Resolving::new(&lookup)
    };

    match eval(&args.template, resolving) {
        Ok(result) => {
            if args.json {
                let output = serde_json::to_string_pretty(&EvalResult { result })
                    .map_err(|e| miette::miette!("Cannot render JSON: {}", e))?;
                println!("{}", output);
            } else {
                println!("{}", result);
            }
            Ok(exitcode::OK)
        }
        Err(e) => {
            if args.json {
                let output = serde_json::to_string_pretty(&EvalFailure::from(&e))
                    .map_err(|e| miette::miette!("Cannot render JSON: {}", e))?;
                eprintln!("{}", output);
            } else {
                eprintln!("Evaluation error: {}", e);
            }
            Ok(exitcode::DATAERR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_lists_unresolved_expressions() {
        let err = TemplateError::UnresolvedExpression {
            template: "{{a}}".to_string(),
            expressions: vec!["a".to_string()],
        };
        let failure = EvalFailure::from(&err);
        assert_eq!(failure.error_key, "error.templating.unresolvedTemplateExpression");
        assert_eq!(failure.unresolved, vec!["a"]);
    }
}
