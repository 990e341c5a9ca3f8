//! Post-processing hooks layered onto a resolver.

use std::fmt::{self, Debug, Formatter};

use bon::Builder;

use crate::template::resolver::ExpressionResolver;

/// How an [`UnhandledExpressionProcessor`] adjudicates declined expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Keep the declined placeholders in the output as literal text.
    Ignore,

    /// Fail with every declined expression.
    IsFailure,

    /// Fail only with these expressions; succeed if the list is empty.
    FailOnlyWithThese(Vec<String>),
}

/// Decides the fate of placeholders the resolver declined.
///
/// Implemented for any `Fn(&[String]) -> Resolution`.
pub trait UnhandledExpressionProcessor {
    fn post_process(&self, unresolved: &[String]) -> Resolution;
}

impl<F> UnhandledExpressionProcessor for F
where
    F: Fn(&[String]) -> Resolution,
{
    fn post_process(&self, unresolved: &[String]) -> Resolution {
        self(unresolved)
    }
}

/// Rewrites the assembled output after a successful evaluation.
///
/// Implemented for any `Fn(&mut String)`.
pub trait FinalBufferProcessor {
    fn post_process(&self, buffer: &mut String);
}

impl<F> FinalBufferProcessor for F
where
    F: Fn(&mut String),
{
    fn post_process(&self, buffer: &mut String) {
        self(buffer);
    }
}

/// A resolver together with its optional post-processors.
///
/// Any `&R` where `R: ExpressionResolver` converts into a `Resolving` without
/// post-processors, so plain resolvers can be passed straight to
/// [`eval`](crate::template::eval).
///
/// # Example
///
/// ```
/// use templar::{LookupFunction, Resolution, Resolving, Value, eval};
///
/// let decline_all = LookupFunction::new(|_| Ok(Value::Null), |_| false);
/// let ignore = |_: &[String]| Resolution::Ignore;
/// let resolving = Resolving::builder()
///     .resolver(&decline_all)
///     .on_unhandled(&ignore)
///     .build();
///
/// assert_eq!(eval("{{a}} and {{b}}", resolving).unwrap(), "{{a}} and {{b}}");
/// ```
#[derive(Builder, Clone, Copy)]
pub struct Resolving<'a> {
    resolver: &'a dyn ExpressionResolver,
    on_unhandled: Option<&'a dyn UnhandledExpressionProcessor>,
    on_final_buffer: Option<&'a dyn FinalBufferProcessor>,
}

impl<'a> Resolving<'a> {
    /// Wrap a resolver with no post-processors.
    pub fn new(resolver: &'a dyn ExpressionResolver) -> Self {
        Self {
            resolver,
            on_unhandled: None,
            on_final_buffer: None,
        }
    }

    pub fn resolver(&self) -> &'a dyn ExpressionResolver {
        self.resolver
    }

    pub fn on_unhandled(&self) -> Option<&'a dyn UnhandledExpressionProcessor> {
        self.on_unhandled
    }

    pub fn on_final_buffer(&self) -> Option<&'a dyn FinalBufferProcessor> {
        self.on_final_buffer
    }
}

impl<'a, R: ExpressionResolver> From<&'a R> for Resolving<'a> {
    fn from(resolver: &'a R) -> Self {
        Resolving::new(resolver)
    }
}

impl Debug for Resolving<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolving")
            .field("resolver", &self.resolver.describe())
            .field("on_unhandled", &self.on_unhandled.is_some())
            .field("on_final_buffer", &self.on_final_buffer.is_some())
            .finish()
    }
}
