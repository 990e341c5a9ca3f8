//! Read-only view of the keys defined for a (basename, locale) pair.

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use icu_locale_core::Locale;
use tracing::{debug, warn};

use crate::bundle::{Bundle, BundleProvider};
use crate::i18n::error::I18nError;

/// A (basename, locale) binding over a bundle store.
///
/// Every query goes back to the provider; nothing is cached here. Wrap the
/// provider in a caching one if lookups are hot.
#[derive(Clone)]
pub struct KeyBundle {
    basename: String,
    locale: Locale,
    provider: Arc<dyn BundleProvider>,
}

impl KeyBundle {
    pub fn new(
        basename: impl Into<String>,
        locale: Locale,
        provider: Arc<dyn BundleProvider>,
    ) -> Self {
        Self {
            basename: basename.into(),
            locale,
            provider,
        }
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Whether the underlying bundle exists.
    pub fn is_available(&self) -> bool {
        self.resolve().is_ok()
    }

    /// True when the bundle is unavailable or defines no keys.
    pub fn is_empty(&self) -> bool {
        self.resolve().map_or(true, |bundle| bundle.is_empty())
    }

    /// Number of defined keys; zero when the bundle is unavailable.
    pub fn len(&self) -> usize {
        self.resolve().map_or(0, |bundle| bundle.len())
    }

    /// Defined keys in sorted order; empty when the bundle is unavailable.
    pub fn keys(&self) -> Vec<String> {
        self.resolve()
            .map(|bundle| bundle.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.resolve().is_ok_and(|bundle| bundle.contains_key(key))
    }

    /// Fail with [`I18nError::MissingResourceBundle`] unless the bundle exists.
    ///
    /// Meant for start-up, so a missing bundle is reported once instead of
    /// on every message lookup.
    pub fn required(self) -> Result<Self, I18nError> {
        self.resolve()?;
        Ok(self)
    }

    /// Resolve the bundle from the provider.
    ///
    /// Any load failure is reported as a missing bundle; failures other than
    /// not-found are logged since they indicate a broken bundle file.
    pub fn resolve(&self) -> Result<Arc<Bundle>, I18nError> {
        self.provider
            .bundle(&self.basename, &self.locale)
            .map_err(|e| {
                if e.is_not_found() {
                    debug!(basename = %self.basename, locale = %self.locale, "bundle not found");
                } else {
                    warn!(basename = %self.basename, locale = %self.locale, error = %e, "bundle failed to load");
                }
                I18nError::MissingResourceBundle {
                    basename: self.basename.clone(),
                    locale: self.locale.clone(),
                }
            })
    }
}

impl Debug for KeyBundle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyBundle")
            .field("basename", &self.basename)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}
