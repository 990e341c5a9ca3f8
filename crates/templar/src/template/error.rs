//! Error types for template evaluation.

use std::error::Error as StdError;

use thiserror::Error;

/// A failure raised by [`ExpressionResolver::resolve`] for an expression the
/// resolver accepted.
///
/// [`ExpressionResolver::resolve`]: crate::template::ExpressionResolver::resolve
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The expression names a property the model does not have.
    #[error("no property '{path}' on {model}")]
    MissingProperty { path: String, model: String },

    /// The model could not be captured for evaluation.
    #[error("cannot capture model: {message}")]
    Model { message: String },

    /// Any other failure, optionally carrying an underlying error.
    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

impl ResolveError {
    /// Create a [`ResolveError::Failed`] with just a message.
    pub fn failed(message: impl Into<String>) -> Self {
        ResolveError::Failed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a [`ResolveError::Failed`] wrapping an underlying error.
    pub fn caused_by(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        ResolveError::Failed {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// The reasons template evaluation can fail.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// One or more placeholders were declined by the resolver and not
    /// suppressed by an unhandled-expression processor.
    #[error("unresolved expressions in template '{template}': {}", expressions.join(", "))]
    UnresolvedExpression {
        template: String,
        expressions: Vec<String>,
    },

    /// Resolving an accepted placeholder failed.
    #[error("malformed template '{template}' at offset {offset}: cannot resolve '{expression}' via {resolved_by}: {cause}")]
    MalformedTemplate {
        /// Scan position when the failing placeholder was reached: the byte
        /// just past the previous placeholder's `}}` (0 if none), not the
        /// failing placeholder's own `{{`.
        offset: usize,
        template: String,
        expression: String,
        resolved_by: String,
        #[source]
        cause: ResolveError,
    },
}

impl TemplateError {
    /// Stable key identifying this kind of error, usable as a message-bundle key.
    pub fn error_key(&self) -> &'static str {
        match self {
            TemplateError::UnresolvedExpression { .. } => {
                "error.templating.unresolvedTemplateExpression"
            }
            TemplateError::MalformedTemplate { .. } => {
                "error.templating.malformedTemplateEncountered"
            }
        }
    }

    /// The template that failed to evaluate.
    pub fn template(&self) -> &str {
        match self {
            TemplateError::UnresolvedExpression { template, .. }
            | TemplateError::MalformedTemplate { template, .. } => template,
        }
    }

    /// Consume the error, returning the underlying resolver failure if any.
    ///
    /// Unresolved expressions have no underlying cause.
    pub fn into_cause(self) -> Option<ResolveError> {
        match self {
            TemplateError::UnresolvedExpression { .. } => None,
            TemplateError::MalformedTemplate { cause, .. } => Some(cause),
        }
    }
}
