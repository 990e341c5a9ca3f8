//! Tests for the expression resolver variants.

use std::collections::HashMap;

use serde::Serialize;
use templar::{
    BeanModel, ExpressionResolver, Introspection, LookupFunction, MapLookup, Properties,
    PropertiesLookup, ResolveError, TemplateError, Value, eval, params,
};

const TEMPLATE: &str = "{{today}}, is a {{kind}} test for number {{n}}.";

#[derive(Debug, Serialize)]
struct WithoutKind {
    today: String,
    n: i32,
}

#[derive(Debug, Serialize)]
struct TestCase {
    today: String,
    kind: String,
    n: i32,
}

fn test_case() -> TestCase {
    TestCase {
        today: "2021-03-12".to_string(),
        kind: "simple".to_string(),
        n: 12,
    }
}

// =========================================================================
// MapLookup
// =========================================================================

#[test]
fn map_lookup_accepts_present_keys_only() {
    let values = params! { "kind" => "simple" };
    let resolver = MapLookup::new(&values);
    assert!(resolver.accepts("kind"));
    assert!(!resolver.accepts("today"));
    assert_eq!(resolver.resolve("kind").unwrap(), Value::from("simple"));
}

#[test]
fn map_lookup_missing_key_is_unresolved_expression() {
    let values = params! { "today" => "2021-03-12", "n" => 12 };
    let err = eval(TEMPLATE, &MapLookup::new(&values)).unwrap_err();
    match err {
        TemplateError::UnresolvedExpression { expressions, .. } => {
            assert_eq!(expressions, vec!["kind"]);
        }
        other => panic!("expected UnresolvedExpression, got {other:?}"),
    }
}

#[test]
fn map_lookup_description_lists_sorted_entries() {
    let values = params! { "b" => 2, "a" => "x" };
    assert_eq!(
        MapLookup::new(&values).describe(),
        "MapLookup: <map: {a=x, b=2}>"
    );
}

// =========================================================================
// PropertiesLookup
// =========================================================================

#[test]
fn properties_lookup_resolves_from_property_set() {
    let properties = Properties::parse("today=2021-03-12\nkind=simple\nn=12\n").unwrap();
    let out = eval(TEMPLATE, &PropertiesLookup::new(&properties)).unwrap();
    assert_eq!(out, "2021-03-12, is a simple test for number 12.");
}

#[test]
fn properties_lookup_declines_missing_property() {
    let properties = Properties::parse("today=2021-03-12\nn=12\n").unwrap();
    let resolver = PropertiesLookup::new(&properties);
    assert!(!resolver.accepts("kind"));
    assert!(matches!(
        eval(TEMPLATE, &resolver),
        Err(TemplateError::UnresolvedExpression { .. })
    ));
}

// =========================================================================
// LookupFunction
// =========================================================================

#[test]
fn lookup_function_uses_injected_functions() {
    let backing: HashMap<&str, i64> = HashMap::from([("n", 12)]);
    let resolver = LookupFunction::new(
        |name: &str| {
            backing
                .get(name)
                .map(|n| Value::from(*n))
                .ok_or_else(|| ResolveError::failed(format!("no {name}")))
        },
        |name: &str| backing.contains_key(name),
    );
    assert_eq!(eval("n is {{n}}", &resolver).unwrap(), "n is 12");
    assert!(matches!(
        eval("{{m}}", &resolver),
        Err(TemplateError::UnresolvedExpression { .. })
    ));
}

#[test]
fn lookup_function_accepting_all_defers_failure_to_resolve() {
    let resolver = LookupFunction::accepting_all(|name: &str| {
        Err(ResolveError::failed(format!("cannot resolve {name}")))
    });
    assert!(resolver.accepts("anything"));
    let err = eval("x {{anything}}", &resolver).unwrap_err();
    assert!(matches!(err, TemplateError::MalformedTemplate { offset: 0, .. }));
}

// =========================================================================
// BeanModel
// =========================================================================

#[test]
fn bean_model_resolves_properties() {
    let resolver = BeanModel::serialize(&test_case()).unwrap();
    assert_eq!(
        eval(TEMPLATE, &resolver).unwrap(),
        "2021-03-12, is a simple test for number 12."
    );
}

#[test]
fn bean_model_missing_property_is_malformed_template() {
    let bean = WithoutKind {
        today: "2021-03-12".to_string(),
        n: 12,
    };
    let resolver = BeanModel::serialize(&bean).unwrap();
    let err = eval(TEMPLATE, &resolver).unwrap_err();
    match err {
        TemplateError::MalformedTemplate {
            offset,
            expression,
            resolved_by,
            cause,
            ..
        } => {
            assert_eq!(offset, "{{today}}".len());
            assert_eq!(expression, "kind");
            assert!(resolved_by.starts_with("BeanModel"));
            assert!(matches!(cause, ResolveError::MissingProperty { ref path, .. } if path == "kind"));
        }
        other => panic!("expected MalformedTemplate, got {other:?}"),
    }
}

#[test]
fn bean_model_walks_nested_paths() {
    #[derive(Serialize)]
    struct User {
        name: String,
    }
    #[derive(Serialize)]
    struct Greeting {
        user: User,
        visits: Vec<u32>,
    }

    let bean = Greeting {
        user: User {
            name: "John".to_string(),
        },
        visits: vec![3, 5],
    };
    let resolver = BeanModel::serialize(&bean).unwrap();
    assert_eq!(
        eval("{{ user.name }} visited {{visits.1}} times", &resolver).unwrap(),
        "John visited 5 times"
    );
}

#[test]
fn bean_model_with_custom_evaluator() {
    #[derive(Debug)]
    struct Counter {
        hits: u32,
    }

    let resolver = BeanModel::new(
        Counter { hits: 7 },
        |expression: &str, model: &Counter| -> Result<Value, ResolveError> {
            match expression {
                "hits" => Ok(Value::from(model.hits)),
                "double" => Ok(Value::from(model.hits * 2)),
                other => Err(ResolveError::failed(format!("unknown expression {other}"))),
            }
        },
    );
    assert_eq!(resolver.model().hits, 7);
    assert_eq!(
        eval("{{hits}} / {{double}}", &resolver).unwrap(),
        "7 / 14"
    );
    assert!(matches!(
        eval("{{triple}}", &resolver),
        Err(TemplateError::MalformedTemplate { .. })
    ));
}

// =========================================================================
// Introspection
// =========================================================================

#[test]
fn introspection_declines_unknown_fields() {
    let bean = WithoutKind {
        today: "2021-03-12".to_string(),
        n: 12,
    };
    let resolver = Introspection::of(&bean).unwrap();
    assert_eq!(resolver.field_names().collect::<Vec<_>>(), vec!["n", "today"]);

    let err = eval(TEMPLATE, &resolver).unwrap_err();
    assert!(matches!(
        err,
        TemplateError::UnresolvedExpression { ref expressions, .. } if expressions == &["kind"]
    ));
}

#[test]
fn introspection_resolves_top_level_fields() {
    let resolver = Introspection::of(&test_case()).unwrap();
    assert_eq!(
        eval(TEMPLATE, &resolver).unwrap(),
        "2021-03-12, is a simple test for number 12."
    );
}

#[test]
fn introspection_of_non_struct_has_no_fields() {
    let resolver = Introspection::of(&42).unwrap();
    assert_eq!(resolver.field_names().count(), 0);
}
