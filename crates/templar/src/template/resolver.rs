//! Expression resolvers: the capability that decides whether a placeholder
//! can be substituted and produces its value.

use std::any::type_name;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::bundle::Properties;
use crate::template::error::ResolveError;
use crate::types::Value;

/// Decides whether a placeholder expression is resolvable and resolves it.
///
/// The evaluator calls [`accepts`](Self::accepts) first. Declined expressions
/// are left in the output verbatim and reported as unresolved; accepted
/// expressions are passed to [`resolve`](Self::resolve), whose failure aborts
/// evaluation with a malformed-template error.
pub trait ExpressionResolver {
    /// Whether this resolver can produce a value for `expression`.
    fn accepts(&self, expression: &str) -> bool;

    /// Produce the substitution value for an accepted `expression`.
    fn resolve(&self, expression: &str) -> Result<Value, ResolveError>;

    /// A diagnostic description of this resolver, recorded on errors.
    fn describe(&self) -> String {
        type_name::<Self>().to_string()
    }
}

impl<R: ExpressionResolver + ?Sized> ExpressionResolver for &R {
    fn accepts(&self, expression: &str) -> bool {
        (**self).accepts(expression)
    }

    fn resolve(&self, expression: &str) -> Result<Value, ResolveError> {
        (**self).resolve(expression)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

// =========================================================================
// MapLookup
// =========================================================================

/// Resolves expressions as keys of a map.
///
/// # Example
///
/// ```
/// use templar::{MapLookup, eval, params};
///
/// let values = params! { "n" => 12 };
/// let out = eval("number {{n}}", &MapLookup::new(&values)).unwrap();
/// assert_eq!(out, "number 12");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MapLookup<'a> {
    map: &'a HashMap<String, Value>,
}

impl<'a> MapLookup<'a> {
    pub fn new(map: &'a HashMap<String, Value>) -> Self {
        Self { map }
    }
}

impl ExpressionResolver for MapLookup<'_> {
    fn accepts(&self, expression: &str) -> bool {
        self.map.contains_key(expression)
    }

    fn resolve(&self, expression: &str) -> Result<Value, ResolveError> {
        Ok(self.map.get(expression).cloned().unwrap_or(Value::Null))
    }

    fn describe(&self) -> String {
        // Sorted so the description is stable across runs.
        let sorted: BTreeMap<&String, &Value> = self.map.iter().collect();
        let entries: Vec<String> = sorted.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("MapLookup: <map: {{{}}}>", entries.join(", "))
    }
}

// =========================================================================
// PropertiesLookup
// =========================================================================

/// Resolves expressions as keys of a flat string property set.
#[derive(Debug, Clone, Copy)]
pub struct PropertiesLookup<'a> {
    properties: &'a Properties,
}

impl<'a> PropertiesLookup<'a> {
    pub fn new(properties: &'a Properties) -> Self {
        Self { properties }
    }
}

impl ExpressionResolver for PropertiesLookup<'_> {
    fn accepts(&self, expression: &str) -> bool {
        self.properties.contains_key(expression)
    }

    fn resolve(&self, expression: &str) -> Result<Value, ResolveError> {
        Ok(self.properties.get(expression).into())
    }

    fn describe(&self) -> String {
        let entries: Vec<String> = self
            .properties
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("PropertiesLookup: <properties: {}>", entries.join(";"))
    }
}

// =========================================================================
// LookupFunction
// =========================================================================

/// Resolves expressions through a pair of injected functions, decoupling the
/// resolver from any concrete container.
pub struct LookupFunction<L, C> {
    lookup: L,
    contains: C,
}

impl<L, C> LookupFunction<L, C>
where
    L: Fn(&str) -> Result<Value, ResolveError>,
    C: Fn(&str) -> bool,
{
    /// Create a resolver from a lookup and a containment test.
    pub fn new(lookup: L, contains: C) -> Self {
        Self { lookup, contains }
    }
}

impl<L> LookupFunction<L, fn(&str) -> bool>
where
    L: Fn(&str) -> Result<Value, ResolveError>,
{
    /// Create a resolver that accepts every expression.
    pub fn accepting_all(lookup: L) -> Self {
        Self {
            lookup,
            contains: |_| true,
        }
    }
}

impl<L, C> ExpressionResolver for LookupFunction<L, C>
where
    L: Fn(&str) -> Result<Value, ResolveError>,
    C: Fn(&str) -> bool,
{
    fn accepts(&self, expression: &str) -> bool {
        (self.contains)(expression)
    }

    fn resolve(&self, expression: &str) -> Result<Value, ResolveError> {
        (self.lookup)(expression)
    }

    fn describe(&self) -> String {
        format!(
            "LookupFunction: <lookup={}; contains={}>",
            type_name::<L>(),
            type_name::<C>()
        )
    }
}

// =========================================================================
// BeanModel
// =========================================================================

/// Evaluates an expression against a model.
///
/// Implemented for any `Fn(&str, &M) -> Result<Value, ResolveError>`.
pub trait ExpressionEvaluator<M: ?Sized> {
    fn evaluate(&self, expression: &str, model: &M) -> Result<Value, ResolveError>;
}

impl<M: ?Sized, F> ExpressionEvaluator<M> for F
where
    F: Fn(&str, &M) -> Result<Value, ResolveError>,
{
    fn evaluate(&self, expression: &str, model: &M) -> Result<Value, ResolveError> {
        self(expression, model)
    }
}

/// Walks dotted property paths (`user.name`, `items.0`) over a JSON tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyPath;

impl ExpressionEvaluator<JsonValue> for PropertyPath {
    fn evaluate(&self, expression: &str, model: &JsonValue) -> Result<Value, ResolveError> {
        let mut current = model;
        for segment in expression.split('.') {
            let next = match current {
                JsonValue::Object(fields) => fields.get(segment),
                JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            current = next.ok_or_else(|| ResolveError::MissingProperty {
                path: expression.to_string(),
                model: json_kind(model).to_string(),
            })?;
        }
        Ok(Value::from(current))
    }
}

fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Resolves expressions by evaluating them against a model object.
///
/// `accepts` always returns true: a property the model lacks is detected at
/// `resolve` time and surfaces as a malformed-template error rather than an
/// unresolved expression.
pub struct BeanModel<M, E> {
    model: M,
    evaluator: E,
}

impl<M, E: ExpressionEvaluator<M>> BeanModel<M, E> {
    /// Create a resolver evaluating expressions against `model` with `evaluator`.
    pub fn new(model: M, evaluator: E) -> Self {
        Self { model, evaluator }
    }

    /// The model expressions are evaluated against.
    pub fn model(&self) -> &M {
        &self.model
    }
}

impl BeanModel<JsonValue, PropertyPath> {
    /// Capture a serialisable model, resolving dotted property paths over it.
    ///
    /// # Example
    ///
    /// ```
    /// use serde::Serialize;
    /// use templar::{BeanModel, eval};
    ///
    /// #[derive(Serialize)]
    /// struct User { name: String }
    ///
    /// let bean = BeanModel::serialize(&User { name: "John".into() }).unwrap();
    /// assert_eq!(eval("Hi {{ name }}", &bean).unwrap(), "Hi John");
    /// ```
    pub fn serialize<T: Serialize + ?Sized>(bean: &T) -> Result<Self, ResolveError> {
        let model = serde_json::to_value(bean).map_err(|e| ResolveError::Model {
            message: e.to_string(),
        })?;
        Ok(Self::new(model, PropertyPath))
    }
}

impl<M: Debug, E: ExpressionEvaluator<M>> ExpressionResolver for BeanModel<M, E> {
    fn accepts(&self, _expression: &str) -> bool {
        true
    }

    fn resolve(&self, expression: &str) -> Result<Value, ResolveError> {
        self.evaluator.evaluate(expression, &self.model)
    }

    fn describe(&self) -> String {
        format!("BeanModel: <model: {:?}>", self.model)
    }
}

// =========================================================================
// Introspection
// =========================================================================

/// Resolves expressions against the top-level fields of a serialisable model.
///
/// Unlike [`BeanModel`], unknown fields are declined, so they surface as
/// unresolved expressions.
#[derive(Debug, Clone)]
pub struct Introspection {
    fields: BTreeMap<String, Value>,
}

impl Introspection {
    /// Capture the top-level fields of `bean`.
    ///
    /// A model that does not serialise to a map yields no fields.
    pub fn of<T: Serialize + ?Sized>(bean: &T) -> Result<Self, ResolveError> {
        let json = serde_json::to_value(bean).map_err(|e| ResolveError::Model {
            message: e.to_string(),
        })?;
        let fields = match &json {
            JsonValue::Object(map) => map.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect(),
            _ => BTreeMap::new(),
        };
        Ok(Self { fields })
    }

    /// Names of the captured fields, in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl ExpressionResolver for Introspection {
    fn accepts(&self, expression: &str) -> bool {
        self.fields.contains_key(expression)
    }

    fn resolve(&self, expression: &str) -> Result<Value, ResolveError> {
        self.fields
            .get(expression)
            .cloned()
            .ok_or_else(|| ResolveError::MissingProperty {
                path: expression.to_string(),
                model: "introspected model".to_string(),
            })
    }

    fn describe(&self) -> String {
        let entries: Vec<String> = self.fields.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("Introspection: <{{{}}}>", entries.join(", "))
    }
}
