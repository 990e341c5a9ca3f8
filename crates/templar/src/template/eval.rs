//! Single-pass placeholder scanner.

use tracing::{debug, trace};

use crate::template::error::TemplateError;
use crate::template::processor::{Resolution, Resolving};

const PREFIX: &str = "{{";
const SUFFIX: &str = "}}";

/// Evaluate `template`, substituting every `{{expression}}` placeholder the
/// resolver accepts.
///
/// Declined placeholders stay in the output verbatim and are reported as
/// [`TemplateError::UnresolvedExpression`] unless an unhandled-expression
/// processor decides otherwise. A failing `resolve` on an accepted placeholder
/// stops the scan and is reported as [`TemplateError::MalformedTemplate`].
///
/// # Example
///
/// ```
/// use templar::{MapLookup, eval, params};
///
/// let values = params! { "today" => "2021-03-12", "kind" => "simple", "n" => 12 };
/// let out = eval(
///     "{{today}}, is a {{kind}} test for number {{n}}.",
///     &MapLookup::new(&values),
/// )
/// .unwrap();
/// assert_eq!(out, "2021-03-12, is a simple test for number 12.");
/// ```
pub fn eval<'a>(template: &str, resolving: impl Into<Resolving<'a>>) -> Result<String, TemplateError> {
    let mut dest = String::with_capacity(initial_capacity(template));
    eval_into(template, resolving, &mut dest)?;
    Ok(dest)
}

/// Evaluate `template`, appending the output to `dest`.
///
/// Existing content of `dest` is kept, so several evaluations can accumulate
/// into one buffer. On failure `dest` may hold a partial result.
pub fn eval_into<'a>(
    template: &str,
    resolving: impl Into<Resolving<'a>>,
    dest: &mut String,
) -> Result<(), TemplateError> {
    let resolving = resolving.into();
    let resolver = resolving.resolver();
    dest.reserve(initial_capacity(template));

    let mut i = 0;
    let mut declined: Vec<String> = Vec::new();

    while i < template.len() {
        let Some(start) = find_from(template, PREFIX, i) else {
            break;
        };
        let Some(end) = find_from(template, SUFFIX, start + PREFIX.len()) else {
            break;
        };
        let expression = placeholder_name(&template[start + PREFIX.len()..end]);
        let next = end + SUFFIX.len();

        if resolver.accepts(expression) {
            dest.push_str(&template[i..start]);
            match resolver.resolve(expression) {
                Ok(value) => {
                    trace!(expression, %value, "resolved placeholder");
                    dest.push_str(&value.to_string());
                }
                Err(cause) => {
                    debug!(expression, offset = i, %cause, "placeholder resolution failed");
                    return Err(TemplateError::MalformedTemplate {
                        offset: i,
                        template: template.to_string(),
                        expression: expression.to_string(),
                        resolved_by: resolver.describe(),
                        cause,
                    });
                }
            }
        } else {
            trace!(expression, "declined placeholder");
            dest.push_str(&template[i..next]);
            if !declined.iter().any(|d| d == expression) {
                declined.push(expression.to_string());
            }
        }
        i = next;
    }

    if !declined.is_empty() {
        let unresolved = match resolving.on_unhandled() {
            None => Some(declined),
            Some(processor) => {
                let resolution = processor.post_process(&declined);
                debug!(?resolution, ?declined, "post-processed unresolved expressions");
                match resolution {
                    Resolution::Ignore => None,
                    Resolution::IsFailure => Some(declined),
                    Resolution::FailOnlyWithThese(these) if these.is_empty() => None,
                    Resolution::FailOnlyWithThese(these) => Some(these),
                }
            }
        };
        if let Some(expressions) = unresolved {
            return Err(TemplateError::UnresolvedExpression {
                template: template.to_string(),
                expressions,
            });
        }
    }

    if i < template.len() {
        dest.push_str(&template[i..]);
    }

    if let Some(processor) = resolving.on_final_buffer() {
        processor.post_process(dest);
    }

    Ok(())
}

/// Output buffers start at 1.6x the template length to leave room to grow.
fn initial_capacity(template: &str) -> usize {
    (template.len() as f64 * 1.6) as usize
}

fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack[from..].find(needle).map(|pos| from + pos)
}

/// Trims the raw span only when it starts or ends with whitespace.
fn placeholder_name(raw: &str) -> &str {
    let surrounded = raw.starts_with(char::is_whitespace) || raw.ends_with(char::is_whitespace);
    if surrounded { raw.trim() } else { raw }
}
