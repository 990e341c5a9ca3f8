//! CLI command implementations.

mod check;
mod coverage;
mod eval;
mod query;

pub use check::{run_check, CheckArgs};
pub use coverage::{run_coverage, CoverageArgs};
pub use eval::{run_eval, EvalArgs};
pub use query::{run_query, QueryArgs};

use std::collections::HashMap;

use templar::Value;

/// Parse a key=value parameter string.
pub(crate) fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid parameter format '{}': expected name=value", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Convert `name=value` pairs to template parameters.
///
/// Values that parse as integers become numbers, everything else a string.
pub(crate) fn to_params(pairs: Vec<(String, String)>) -> HashMap<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| {
            let value = if let Ok(n) = v.parse::<i64>() {
                Value::from(n)
            } else {
                Value::from(v)
            };
            (k, value)
        })
        .collect()
}
