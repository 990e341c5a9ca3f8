//! Integration tests for the placeholder scanner.

use std::cell::Cell;
use std::collections::HashMap;

use templar::{
    LookupFunction, MapLookup, ResolveError, TemplateError, Value, eval, eval_into, params,
};

fn sample_values() -> HashMap<String, Value> {
    params! { "today" => "2021-03-12", "kind" => "simple", "n" => 12 }
}

// =========================================================================
// Substitution
// =========================================================================

#[test]
fn substitutes_every_accepted_placeholder() {
    let values = sample_values();
    let out = eval(
        "{{today}}, is a {{kind}} test for number {{n}}.",
        &MapLookup::new(&values),
    )
    .unwrap();
    assert_eq!(out, "2021-03-12, is a simple test for number 12.");
}

#[test]
fn adjacent_placeholders() {
    let values = params! { "a" => 1, "b" => 2 };
    assert_eq!(eval("{{a}}{{b}}", &MapLookup::new(&values)).unwrap(), "12");
}

#[test]
fn literal_only_template_is_returned_unchanged() {
    let values = sample_values();
    let template = "No placeholders here { or } here.";
    assert_eq!(eval(template, &MapLookup::new(&values)).unwrap(), template);
}

#[test]
fn empty_template() {
    let values = sample_values();
    assert_eq!(eval("", &MapLookup::new(&values)).unwrap(), "");
}

#[test]
fn null_value_renders_as_null() {
    let values = params! { "x" => Value::Null };
    assert_eq!(eval("x={{x}}", &MapLookup::new(&values)).unwrap(), "x=null");
}

#[test]
fn unsigned_values_beyond_i64_are_substituted_exactly() {
    let values = params! { "n" => u64::MAX, "len" => usize::MAX };
    assert_eq!(
        eval("{{n}}", &MapLookup::new(&values)).unwrap(),
        "18446744073709551615"
    );
    assert_eq!(
        eval("{{len}}", &MapLookup::new(&values)).unwrap(),
        usize::MAX.to_string()
    );
}

#[test]
fn multibyte_text_around_placeholders() {
    let values = params! { "name" => "Zoë" };
    assert_eq!(
        eval("héllo {{name}} ✓", &MapLookup::new(&values)).unwrap(),
        "héllo Zoë ✓"
    );
}

// =========================================================================
// Placeholder names
// =========================================================================

#[test]
fn surrounding_whitespace_is_trimmed() {
    let values = sample_values();
    let resolver = MapLookup::new(&values);
    assert_eq!(eval("{{ kind }}", &resolver).unwrap(), "simple");
    assert_eq!(eval("{{kind }}", &resolver).unwrap(), "simple");
    assert_eq!(eval("{{\tkind}}", &resolver).unwrap(), "simple");
}

#[test]
fn inner_whitespace_is_kept() {
    let values = params! { "first name" => "John" };
    assert_eq!(
        eval("{{ first name }}", &MapLookup::new(&values)).unwrap(),
        "John"
    );
}

// =========================================================================
// Unterminated placeholders
// =========================================================================

#[test]
fn unterminated_placeholder_is_literal() {
    let values = params! { "x" => 1 };
    assert_eq!(eval("abc {{x", &MapLookup::new(&values)).unwrap(), "abc {{x");
}

#[test]
fn text_after_unterminated_placeholder_is_not_scanned() {
    let values = params! { "a" => 1, "b" => 2 };
    assert_eq!(
        eval("{{a}} and {{b", &MapLookup::new(&values)).unwrap(),
        "1 and {{b"
    );
}

#[test]
fn placeholder_runs_to_next_closing_delimiter() {
    let values = params! { "a" => 1, "b" => 2 };
    let err = eval("{{a}} and {{b and {{a}}", &MapLookup::new(&values)).unwrap_err();
    assert!(matches!(
        err,
        TemplateError::UnresolvedExpression { ref expressions, .. } if expressions == &["b and {{a"]
    ));
}

// =========================================================================
// Declined placeholders
// =========================================================================

#[test]
fn declined_placeholder_is_unresolved_expression() {
    let values = params! {};
    let err = eval("Hello {{name}}!", &MapLookup::new(&values)).unwrap_err();
    match err {
        TemplateError::UnresolvedExpression {
            template,
            expressions,
        } => {
            assert_eq!(template, "Hello {{name}}!");
            assert_eq!(expressions, vec!["name"]);
        }
        other => panic!("expected UnresolvedExpression, got {other:?}"),
    }
}

#[test]
fn declined_names_are_deduplicated_in_encounter_order() {
    let values = params! { "known" => 1 };
    let err = eval(
        "{{b}} {{a}} {{known}} {{ b }} {{a}}",
        &MapLookup::new(&values),
    )
    .unwrap_err();
    match err {
        TemplateError::UnresolvedExpression { expressions, .. } => {
            assert_eq!(expressions, vec!["b", "a"]);
        }
        other => panic!("expected UnresolvedExpression, got {other:?}"),
    }
}

#[test]
fn empty_placeholder_is_declined_by_map() {
    let values = sample_values();
    let err = eval("{{}}", &MapLookup::new(&values)).unwrap_err();
    assert!(matches!(
        err,
        TemplateError::UnresolvedExpression { ref expressions, .. } if expressions == &[String::new()]
    ));
}

// =========================================================================
// Resolver failures
// =========================================================================

fn failing_on_boom() -> LookupFunction<
    impl Fn(&str) -> Result<Value, ResolveError>,
    impl Fn(&str) -> bool,
> {
    LookupFunction::new(
        |name: &str| {
            if name == "boom" {
                Err(ResolveError::failed("kaboom"))
            } else {
                Ok(Value::from(name))
            }
        },
        |name: &str| name != "missing",
    )
}

#[test]
fn failing_resolution_is_malformed_template() {
    let resolver = failing_on_boom();
    let err = eval("{{boom}} {{missing}}", &resolver).unwrap_err();
    match err {
        TemplateError::MalformedTemplate {
            offset,
            template,
            expression,
            cause,
            ..
        } => {
            assert_eq!(offset, 0);
            assert_eq!(template, "{{boom}} {{missing}}");
            assert_eq!(expression, "boom");
            assert_eq!(cause.to_string(), "kaboom");
        }
        other => panic!("expected MalformedTemplate, got {other:?}"),
    }
}

#[test]
fn malformed_template_wins_over_earlier_declined_placeholder() {
    let resolver = failing_on_boom();
    let err = eval("{{missing}} {{boom}}", &resolver).unwrap_err();
    match err {
        TemplateError::MalformedTemplate {
            offset, expression, ..
        } => {
            // The cursor sits right after the declined placeholder.
            assert_eq!(offset, "{{missing}}".len());
            assert_eq!(expression, "boom");
        }
        other => panic!("expected MalformedTemplate, got {other:?}"),
    }
}

#[test]
fn malformed_offset_excludes_literal_before_failing_placeholder() {
    let resolver = failing_on_boom();
    let template = "{{a}} and then {{boom}}";
    let err = eval(template, &resolver).unwrap_err();
    match err {
        TemplateError::MalformedTemplate { offset, .. } => {
            assert_eq!(offset, "{{a}}".len());
            assert_ne!(offset, template.find("{{boom}}").unwrap());
        }
        other => panic!("expected MalformedTemplate, got {other:?}"),
    }
}

#[test]
fn scanning_stops_at_first_failure() {
    let calls = Cell::new(0);
    let resolver = LookupFunction::accepting_all(|name: &str| {
        calls.set(calls.get() + 1);
        if name == "boom" {
            Err(ResolveError::failed("kaboom"))
        } else {
            Ok(Value::from(name))
        }
    });
    assert!(eval("{{a}}{{boom}}{{c}}", &resolver).is_err());
    assert_eq!(calls.get(), 2);
}

// =========================================================================
// Destination buffer
// =========================================================================

#[test]
fn eval_into_appends_after_existing_content() {
    let values = sample_values();
    let mut dest = String::from("prefix: ");
    eval_into("n={{n}}", &MapLookup::new(&values), &mut dest).unwrap();
    assert_eq!(dest, "prefix: n=12");
}

#[test]
fn eval_into_accumulates_several_evaluations() {
    let values = sample_values();
    let resolver = MapLookup::new(&values);
    let mut dest = String::new();
    eval_into("{{today}}", &resolver, &mut dest).unwrap();
    eval_into(" / ", &resolver, &mut dest).unwrap();
    eval_into("{{kind}}", &resolver, &mut dest).unwrap();
    assert_eq!(dest, "2021-03-12 / simple");
}
