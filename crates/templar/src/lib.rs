pub mod bundle;
pub mod i18n;
pub mod template;
pub mod types;

pub use bundle::{Bundle, BundleProvider, Properties};
pub use i18n::{I18nError, KeyBundle, Messages};
pub use template::{
    BeanModel, ExpressionEvaluator, ExpressionResolver, FinalBufferProcessor, Introspection,
    LookupFunction, MapLookup, PropertiesLookup, PropertyPath, Resolution, ResolveError,
    Resolving, TemplateError, UnhandledExpressionProcessor, eval, eval_into,
};
pub use types::Value;

pub use icu_locale_core::Locale;

/// Creates a `HashMap<String, Value>` from key-value pairs.
///
/// Values are automatically converted via `Into<Value>`, so you can pass
/// integers, floats, booleans, or strings directly.
///
/// # Example
///
/// ```
/// use templar::{params, Value};
///
/// let p = params! { "count" => 3, "name" => "Alice" };
/// assert_eq!(p.len(), 2);
/// assert_eq!(p["count"].as_number(), Some(3));
/// assert_eq!(p["name"].as_str(), Some("Alice"));
/// ```
#[macro_export]
macro_rules! params {
    {} => {
        ::std::collections::HashMap::<String, $crate::Value>::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::HashMap::<String, $crate::Value>::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
