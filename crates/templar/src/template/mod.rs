//! Placeholder templating.
//!
//! Templates are plain strings containing `{{expression}}` placeholders. The
//! scanner locates placeholders left to right and delegates each expression to
//! an [`ExpressionResolver`]; optional post-processors decide what happens to
//! declined placeholders and may rewrite the final output. There is no escape
//! syntax: a literal `{{` cannot be expressed.

mod error;
mod eval;
mod processor;
mod resolver;

pub use error::{ResolveError, TemplateError};
pub use eval::{eval, eval_into};
pub use processor::{FinalBufferProcessor, Resolution, Resolving, UnhandledExpressionProcessor};
pub use resolver::{
    BeanModel, ExpressionEvaluator, ExpressionResolver, Introspection, LookupFunction, MapLookup,
    PropertiesLookup, PropertyPath,
};
