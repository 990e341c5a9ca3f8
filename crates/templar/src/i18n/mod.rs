//! Message-bundle resolution.
//!
//! [`Messages`] resolves a key against a bundle and feeds the raw template to
//! the evaluator, folding every failure into one [`I18nError`].

mod error;
mod error_messages;
mod key_bundle;
mod messages;

pub use error::{I18nError, compute_suggestions};
pub use error_messages::{ErrorCode, ErrorMessages, ErrorMessagesProvider, VariantErrorMessages};
pub use key_bundle::KeyBundle;
pub use messages::Messages;
