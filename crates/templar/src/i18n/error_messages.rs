//! Localised messages for error values.
//!
//! An error names its message through an [`ErrorCode`]; the message template
//! lives under that code in a bundle and is built with the error itself as the
//! bean, so its fields are available as placeholders. An optional debug
//! message lives under `<code>.debug`.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;
use tracing::debug;

use crate::i18n::error::I18nError;
use crate::i18n::key_bundle::KeyBundle;
use crate::i18n::messages::Messages;

/// An error that names its message by a stable code.
pub trait ErrorCode {
    fn error_code(&self) -> &str;

    /// Bundle key of the user-facing message. Defaults to the error code.
    fn message_key(&self) -> String {
        self.error_code().to_string()
    }

    /// Bundle key of the optional debug message.
    fn debug_message_key(&self) -> String {
        format!("{}.debug", self.message_key())
    }
}

/// Produces the messages of an error.
pub trait ErrorMessagesProvider<E: ?Sized> {
    fn error_message(&self, error: &E) -> Result<String, I18nError>;

    /// The debug message, or `None` if the bundle defines no debug key for
    /// this error.
    fn debug_error_message(&self, error: &E) -> Result<Option<String>, I18nError>;
}

// =========================================================================
// ErrorMessages
// =========================================================================

/// Builds error messages from a bundle on every call.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use serde::Serialize;
/// use templar::{KeyBundle, Locale, Properties};
/// use templar::bundle::MemoryProvider;
/// use templar::i18n::{ErrorCode, ErrorMessages, ErrorMessagesProvider};
///
/// #[derive(Serialize)]
/// struct Overdrawn { account: String }
///
/// impl ErrorCode for Overdrawn {
///     fn error_code(&self) -> &str {
///         "error.account.overdrawn"
///     }
/// }
///
/// let provider = MemoryProvider::new().with_root(
///     "errors",
///     [("error.account.overdrawn", "Account {{account}} is overdrawn")]
///         .into_iter()
///         .collect::<Properties>(),
/// );
/// let bundle = KeyBundle::new("errors", "und".parse::<Locale>().unwrap(), Arc::new(provider));
/// let messages = ErrorMessages::new(bundle).unwrap();
///
/// let error = Overdrawn { account: "A-1".into() };
/// assert_eq!(messages.error_message(&error).unwrap(), "Account A-1 is overdrawn");
/// assert_eq!(messages.debug_error_message(&error).unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct ErrorMessages {
    messages: Messages,
}

impl ErrorMessages {
    /// Bind to `bundle`, failing if the bundle does not exist.
    pub fn new(bundle: KeyBundle) -> Result<Self, I18nError> {
        Ok(Self {
            messages: Messages::from(bundle.required()?),
        })
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }
}

impl<E: ErrorCode + Serialize + ?Sized> ErrorMessagesProvider<E> for ErrorMessages {
    fn error_message(&self, error: &E) -> Result<String, I18nError> {
        self.messages
            .build_message_with_bean(&error.message_key(), error)
    }

    fn debug_error_message(&self, error: &E) -> Result<Option<String>, I18nError> {
        let key = error.debug_message_key();
        if !self.messages.contains_key(&key) {
            return Ok(None);
        }
        self.messages.build_message_with_bean(&key, error).map(Some)
    }
}

// =========================================================================
// VariantErrorMessages
// =========================================================================

struct Prebuilt {
    message: String,
    debug: Option<String>,
}

/// Messages for a closed set of error values, built once up front.
///
/// Construction fails on the first value whose message cannot be built, so a
/// broken bundle is caught at start-up rather than when the error occurs.
pub struct VariantErrorMessages<E> {
    bundle: KeyBundle,
    prebuilt: HashMap<E, Prebuilt>,
}

impl<E> VariantErrorMessages<E>
where
    E: ErrorCode + Serialize + Eq + Hash,
{
    /// Build the messages of every value in `variants`.
    pub fn new(bundle: KeyBundle, variants: impl IntoIterator<Item = E>) -> Result<Self, I18nError> {
        let provider = ErrorMessages::new(bundle.clone())?;
        let mut prebuilt = HashMap::new();
        for variant in variants {
            let message = provider.error_message(&variant)?;
            let debug = provider.debug_error_message(&variant)?;
            prebuilt.insert(variant, Prebuilt { message, debug });
        }
        debug!(basename = %bundle.basename(), variants = prebuilt.len(), "pre-built error messages");
        Ok(Self { bundle, prebuilt })
    }

    /// Number of error values with a pre-built message.
    pub fn len(&self) -> usize {
        self.prebuilt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prebuilt.is_empty()
    }
}

impl<E> ErrorMessagesProvider<E> for VariantErrorMessages<E>
where
    E: ErrorCode + Eq + Hash,
{
    /// Values not passed to [`VariantErrorMessages::new`] have no message.
    fn error_message(&self, error: &E) -> Result<String, I18nError> {
        self.prebuilt
            .get(error)
            .map(|p| p.message.clone())
            .ok_or_else(|| I18nError::MissingMessageKey {
                basename: self.bundle.basename().to_string(),
                locale: self.bundle.locale().clone(),
                key: error.message_key(),
                suggestions: Vec::new(),
            })
    }

    fn debug_error_message(&self, error: &E) -> Result<Option<String>, I18nError> {
        Ok(self.prebuilt.get(error).and_then(|p| p.debug.clone()))
    }
}
