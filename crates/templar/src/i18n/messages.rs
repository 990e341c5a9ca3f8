//! Message resolution: bundle lookup followed by template evaluation.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use bon::bon;
use icu_locale_core::{Locale, locale};
use serde::Serialize;
use tracing::debug;

use crate::bundle::BundleProvider;
use crate::i18n::error::{I18nError, compute_suggestions};
use crate::i18n::key_bundle::KeyBundle;
use crate::template::{BeanModel, MapLookup, Resolving, TemplateError, eval};
use crate::types::Value;

/// Read-only access to the messages of one bundle, with message building.
///
/// Every operation short-circuits: a missing bundle is reported before a
/// missing key, and a missing key before any evaluation happens.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use templar::Properties;
/// use templar::bundle::MemoryProvider;
/// use templar::i18n::Messages;
///
/// let provider = MemoryProvider::new().with_root(
///     "greetings",
///     [("morning", "Good morning {{name}}.")].into_iter().collect::<Properties>(),
/// );
/// let messages = Messages::builder()
///     .basename("greetings")
///     .provider(Arc::new(provider))
///     .build();
///
/// let text = messages
///     .build_message_with_key_values("morning", [("name", "Adam")])
///     .unwrap();
/// assert_eq!(text, "Good morning Adam.");
/// ```
#[derive(Debug, Clone)]
pub struct Messages {
    bundle: KeyBundle,
}

#[bon]
impl Messages {
    /// Bind to `basename` in `locale`, defaulting to the undetermined locale
    /// (root bundle only).
    #[builder(on(String, into))]
    pub fn new(
        basename: String,
        #[builder(default = locale!("und"))] locale: Locale,
        provider: Arc<dyn BundleProvider>,
    ) -> Self {
        Self {
            bundle: KeyBundle::new(basename, locale, provider),
        }
    }
}

impl From<KeyBundle> for Messages {
    fn from(bundle: KeyBundle) -> Self {
        Self { bundle }
    }
}

impl Messages {
    /// The key bundle this container reads from.
    pub fn bundle(&self) -> &KeyBundle {
        &self.bundle
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Look up the raw template for `key`.
    pub fn query_key(&self, key: &str) -> Result<String, I18nError> {
        let bundle = self.bundle.resolve()?;
        match bundle.get(key) {
            Some(template) => Ok(template.to_string()),
            None => {
                debug!(basename = %self.bundle.basename(), key, "message key not found");
                Err(I18nError::MissingMessageKey {
                    basename: self.bundle.basename().to_string(),
                    locale: self.bundle.locale().clone(),
                    key: key.to_string(),
                    suggestions: compute_suggestions(key, bundle.keys()),
                })
            }
        }
    }

    /// The raw template for `key`, or `None` if the bundle or key is missing.
    pub fn get(&self, key: &str) -> Option<String> {
        self.query_key(key).ok()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.bundle.contains(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.bundle.keys()
    }

    pub fn len(&self) -> usize {
        self.bundle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundle.is_empty()
    }

    /// All key/raw-template pairs in key order; empty if the bundle is missing.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.bundle
            .resolve()
            .map(|bundle| {
                bundle
                    .properties()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    // =========================================================================
    // Message Building
    // =========================================================================

    /// Build the message for `key`, evaluating its template with `resolving`.
    pub fn build_message_with<'a>(
        &self,
        key: &str,
        resolving: impl Into<Resolving<'a>>,
    ) -> Result<String, I18nError> {
        let template = self.query_key(key)?;
        eval(&template, resolving).map_err(|e| self.build_failure(key, e))
    }

    /// Build the message for `key`, resolving placeholders as property paths
    /// of `bean`.
    ///
    /// A property the bean lacks fails the build with the underlying
    /// [`ResolveError`](crate::template::ResolveError) as cause.
    pub fn build_message_with_bean<T: Serialize + ?Sized>(
        &self,
        key: &str,
        bean: &T,
    ) -> Result<String, I18nError> {
        let template = self.query_key(key)?;
        let resolver = match BeanModel::serialize(bean) {
            Ok(resolver) => resolver,
            Err(cause) => {
                return Err(I18nError::MessageBuildFailure {
                    basename: self.bundle.basename().to_string(),
                    key: key.to_string(),
                    locale: self.bundle.locale().clone(),
                    resolver_error_message: cause.to_string(),
                    template,
                    cause: Some(cause),
                });
            }
        };
        eval(&template, &resolver).map_err(|e| self.build_failure(key, e))
    }

    /// Build the message for `key`, resolving placeholders as keys of `map`.
    pub fn build_message_with_map(
        &self,
        key: &str,
        map: &HashMap<String, Value>,
    ) -> Result<String, I18nError> {
        self.build_message_with(key, &MapLookup::new(map))
    }

    /// Build the message for `key` from ad-hoc key/value pairs.
    pub fn build_message_with_key_values<K, V>(
        &self,
        key: &str,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Result<String, I18nError>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let map: HashMap<String, Value> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.build_message_with_map(key, &map)
    }

    fn build_failure(&self, key: &str, error: TemplateError) -> I18nError {
        debug!(basename = %self.bundle.basename(), key, %error, "message build failed");
        let resolver_error_message = error.to_string();
        let template = error.template().to_string();
        I18nError::MessageBuildFailure {
            basename: self.bundle.basename().to_string(),
            key: key.to_string(),
            locale: self.bundle.locale().clone(),
            template,
            resolver_error_message,
            cause: error.into_cause(),
        }
    }
}

/// Renders as `[basename][locale]: { key->[template]; ... }`.
impl Display for Messages {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}][{}]: {{", self.bundle.basename(), self.bundle.locale())?;
        for (index, (key, value)) in self.entries().iter().enumerate() {
            let separator = if index == 0 { " " } else { "; " };
            write!(f, "{separator}{key}->[{value}]")?;
        }
        f.write_str(" }")
    }
}
