//! Locale fallback chain for bundle lookup.

use icu_locale_core::Locale;

use crate::bundle::error::LoadError;
use crate::bundle::properties::Properties;
use crate::bundle::provider::Bundle;

/// Bundle name suffixes to try for `locale`, most specific first.
///
/// The chain is `lang_Script_REGION`, `lang_Script`, `lang_REGION`, `lang`,
/// then the root bundle (empty suffix). Variants and extensions are ignored;
/// the undetermined locale only has the root.
///
/// # Example
///
/// ```
/// use templar::bundle::candidate_suffixes;
///
/// let locale = "en-US".parse().unwrap();
/// assert_eq!(candidate_suffixes(&locale), vec!["en_US", "en", ""]);
/// ```
pub fn candidate_suffixes(locale: &Locale) -> Vec<String> {
    let id = &locale.id;
    let language = id.language.as_str();
    let mut suffixes = Vec::with_capacity(5);

    if language != "und" {
        let script = id.script.as_ref().map(|s| s.as_str());
        let region = id.region.as_ref().map(|r| r.as_str());
        if let (Some(script), Some(region)) = (script, region) {
            suffixes.push(format!("{language}_{script}_{region}"));
        }
        if let Some(script) = script {
            suffixes.push(format!("{language}_{script}"));
        }
        if let Some(region) = region {
            suffixes.push(format!("{language}_{region}"));
        }
        suffixes.push(language.to_string());
    }

    suffixes.push(String::new());
    suffixes
}

/// The suffix naming the most specific bundle for `locale`.
pub fn bundle_suffix(locale: &Locale) -> String {
    candidate_suffixes(locale)
        .into_iter()
        .next()
        .unwrap_or_default()
}

/// Load every candidate of the fallback chain and merge them into one bundle.
///
/// `load` returns `Ok(None)` for a candidate that does not exist. Keys from
/// more specific candidates override less specific ones. Returns `Ok(None)`
/// when no candidate exists.
pub(crate) fn load_chain<F>(locale: &Locale, mut load: F) -> Result<Option<Bundle>, LoadError>
where
    F: FnMut(&str) -> Result<Option<Properties>, LoadError>,
{
    let mut merged = Properties::new();
    let mut chain = Vec::new();

    for suffix in candidate_suffixes(locale).iter().rev() {
        if let Some(properties) = load(suffix)? {
            merged.extend(properties);
            chain.push(suffix.clone());
        }
    }

    if chain.is_empty() {
        return Ok(None);
    }
    chain.reverse();
    Ok(Some(Bundle::new(merged, chain)))
}
