//! Error types for message-bundle resolution.

use icu_locale_core::Locale;
use strsim::levenshtein;
use thiserror::Error;

use crate::template::ResolveError;

/// The reasons a message cannot be produced from a bundle.
///
/// `MissingResourceBundle` and `MissingMessageKey` point at deployment
/// defects; `MessageBuildFailure` points at a defective template or model.
#[derive(Debug, Error)]
pub enum I18nError {
    /// No bundle exists for the basename along the locale fallback chain.
    #[error("missing resource bundle '{basename}' for locale '{locale}'")]
    MissingResourceBundle { basename: String, locale: Locale },

    /// The bundle exists but does not define the key.
    #[error(
        "missing message key '{key}' in bundle '{basename}' for locale '{locale}'{}",
        suggestion_hint(suggestions)
    )]
    MissingMessageKey {
        basename: String,
        locale: Locale,
        key: String,
        suggestions: Vec<String>,
    },

    /// The raw template was found but evaluating it failed.
    #[error("cannot build message '{key}' of bundle '{basename}' for locale '{locale}': {resolver_error_message}")]
    MessageBuildFailure {
        basename: String,
        key: String,
        locale: Locale,
        template: String,
        resolver_error_message: String,
        #[source]
        cause: Option<ResolveError>,
    },
}

impl I18nError {
    /// Stable key identifying this kind of error, usable as a message-bundle key.
    pub fn error_key(&self) -> &'static str {
        match self {
            I18nError::MissingResourceBundle { .. } => "error.i18n.missingResourceBundle",
            I18nError::MissingMessageKey { .. } => "error.i18n.missingMessageKey",
            I18nError::MessageBuildFailure { .. } => "error.i18n.invalidMessageTemplate",
        }
    }

    /// The locale of the bundle in question.
    pub fn locale(&self) -> &Locale {
        match self {
            I18nError::MissingResourceBundle { locale, .. }
            | I18nError::MissingMessageKey { locale, .. }
            | I18nError::MessageBuildFailure { locale, .. } => locale,
        }
    }

    /// The basename of the bundle in question.
    pub fn basename(&self) -> &str {
        match self {
            I18nError::MissingResourceBundle { basename, .. }
            | I18nError::MissingMessageKey { basename, .. }
            | I18nError::MessageBuildFailure { basename, .. } => basename,
        }
    }
}

fn suggestion_hint(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean: {}?", suggestions.join(", "))
    }
}

/// Compute "did you mean" suggestions for a missing key.
///
/// - Distance 1 for keys of up to 3 characters, 2 otherwise
/// - Exact matches excluded
/// - At most 3 suggestions, closest first
pub fn compute_suggestions<'a>(key: &str, available: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let max_distance = if key.len() <= 3 { 1 } else { 2 };
    let mut suggestions: Vec<(usize, &str)> = available
        .into_iter()
        .filter_map(|candidate| {
            let dist = levenshtein(key, candidate);
            (dist > 0 && dist <= max_distance).then_some((dist, candidate))
        })
        .collect();

    suggestions.sort_by_key(|(dist, _)| *dist);
    suggestions
        .into_iter()
        .take(3)
        .map(|(_, s)| s.to_string())
        .collect()
}
