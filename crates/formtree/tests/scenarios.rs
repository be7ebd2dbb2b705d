#![forbid(unsafe_code)]

//! End-to-end form scenarios through the public facade.

use formtree::mask::format;
use formtree::prelude::*;
use serde_json::json;
use time::macros::datetime;

/// Identifiers as a host application would declare them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    First,
    Second,
    Quantity,
    Card,
    Items,
    Born,
    Contact,
}

fn changed(path: &[usize], input: &str) -> FieldEvent {
    FieldEvent::Changed {
        path: path.to_vec(),
        input: input.to_owned(),
        cursor: None,
    }
}

// ============================================================================
// Error aggregation
// ============================================================================

#[test]
fn same_failure_decoded_twice_is_reported_once() {
    let mut tree = construct::group([], vec![construct::int([
        attr::identifier(Key::Quantity),
        attr::required(true),
    ])]);
    let twice = parse::map2(
        parse::field(Key::Quantity, parse::int()),
        parse::field(Key::Quantity, parse::int()),
        |a, b| a + b,
    );
    assert_eq!(
        parse::validate_and_parse(&twice, &mut tree),
        Err(vec![Error::IsBlank(Some(Key::Quantity))])
    );
}

#[test]
fn errors_follow_field_order() {
    let mut tree = construct::group(
        [],
        vec![
            construct::text([attr::identifier(Key::First), attr::required(true)]),
            construct::text([attr::identifier(Key::Second), attr::required(true)]),
        ],
    );
    // Decode in reverse order; the report still follows the tree.
    let both = parse::map2(
        parse::field(Key::Second, parse::string()),
        parse::field(Key::First, parse::string()),
        |b, a| (a, b),
    );
    assert_eq!(
        parse::validate_and_parse(&both, &mut tree),
        Err(vec![
            Error::IsBlank(Some(Key::First)),
            Error::IsBlank(Some(Key::Second)),
        ])
    );
}

#[test]
fn decode_and_validation_failures_follow_field_order() {
    let mut tree = construct::group(
        [],
        vec![
            construct::int([attr::identifier(Key::Quantity), attr::string_value("abc")]),
            construct::text([attr::identifier(Key::First), attr::required(true)]),
        ],
    );
    // The first field only fails decoding, the second only fails validation.
    let both = parse::map2(
        parse::field(Key::Quantity, parse::int()),
        parse::field(Key::First, parse::string()),
        |quantity, name| (quantity, name),
    );
    assert_eq!(
        parse::validate_and_parse(&both, &mut tree),
        Err(vec![
            Error::ParseError(Some(Key::Quantity)),
            Error::IsBlank(Some(Key::First)),
        ])
    );
}

#[test]
fn failing_checks_on_one_node_merge() {
    let mut tree = construct::select([attr::identifier(Key::First), attr::required(true)]);
    let result = parse::validate_and_parse(&parse::string(), &mut tree);
    assert_eq!(
        result,
        Err(vec![Error::ErrorList(
            Some(Key::First),
            vec![
                Error::IsBlank(Some(Key::First)),
                Error::NoOptionsProvided(Some(Key::First)),
            ],
        )])
    );
}

#[test]
fn errors_render_for_humans() {
    let errors = formtree::Errors::from(vec![
        Error::IsBlank(Some("name")),
        Error::EmailInvalid(Some("email")),
    ]);
    assert_eq!(
        errors.to_string(),
        "\"name\": this field is required\n\"email\": invalid email address"
    );
    assert_eq!(errors.as_slice().len(), 2);
}

// ============================================================================
// Masks
// ============================================================================

#[test]
fn card_number_mask() {
    let mask = Mask::parse("{d}{d}{d}{d} {d}{d}{d}{d} {d}{d}{d}{d} {d}{d}{d}{d}");
    let full = format(&mask, "1234567890123456", 16);
    assert_eq!(full.formatted, "1234 5678 9012 3456");
    assert!(full.consumed);

    let partial = format(&mask, "12345678", 8);
    assert_eq!(partial.formatted, "1234 5678");
    assert!(!partial.consumed);
}

#[test]
fn masked_field_reformats_as_typed() {
    let mut form = Form::new(construct::text([
        attr::identifier(Key::Card),
        attr::pattern("{d}{d}{d}{d} {d}{d}{d}{d}"),
    ]));
    assert!(form.handle_event(&changed(&[], "12345")));
    assert_eq!(form.tree().value().value(), &Value::from("1234 5"));
    assert_eq!(form.tree().value().cursor(), Some(6));
    // Pattern errors show before the field is touched.
    assert_eq!(
        form.tree().value().visible_errors(),
        vec![&Error::PatternError(Some(Key::Card))]
    );

    assert!(form.handle_event(&changed(&[], "1234 5678")));
    assert_eq!(
        form.submit(&parse::string()),
        Ok("1234 5678".to_owned())
    );
}

// ============================================================================
// Coercion
// ============================================================================

#[test]
fn malformed_int_is_blank_when_required() {
    let mut tree = construct::int([
        attr::identifier(Key::Quantity),
        attr::required(true),
        attr::string_value("abc"),
    ]);
    assert_eq!(tree.value().value(), &Value::Blank);
    assert_eq!(
        parse::validate_and_parse(&parse::int(), &mut tree),
        Err(vec![Error::IsBlank(Some(Key::Quantity))])
    );
}

#[test]
fn malformed_int_is_parse_error_when_optional() {
    let mut tree = construct::int([attr::identifier(Key::Quantity), attr::string_value("abc")]);
    assert_eq!(validate_tree(&mut tree), Ok(()));
    assert_eq!(
        parse::validate_and_parse(&parse::int(), &mut tree),
        Err(vec![Error::ParseError(Some(Key::Quantity))])
    );
}

#[test]
fn dates_decode_to_instants() {
    let mut tree = construct::date([attr::identifier(Key::Born), attr::string_value("1990-04-01")]);
    assert_eq!(
        parse::parse(&parse::posix(), &mut tree),
        Ok(datetime!(1990-04-01 0:00 UTC))
    );
}

// ============================================================================
// Ranges
// ============================================================================

#[test]
fn both_bounds_report_not_in_range() {
    let mut tree = construct::int([attr::min(10i64), attr::max(20i64), attr::value(25i64)]);
    assert_eq!(
        validate_tree::<Key>(&mut tree),
        Err(vec![Error::ValueNotInRange {
            id: None,
            value: Value::Integer(25),
            min: Value::Integer(10),
            max: Value::Integer(20),
        }])
    );
}

#[test]
fn lone_min_reports_too_small() {
    let mut tree = construct::int([attr::min(10i64), attr::value(5i64)]);
    assert_eq!(
        validate_tree::<Key>(&mut tree),
        Err(vec![Error::ValueTooSmall {
            id: None,
            value: Value::Integer(5),
            min: Value::Integer(10),
        }])
    );
}

// ============================================================================
// Repeatables
// ============================================================================

#[test]
fn repeatable_bounds_hold_through_events() {
    let mut form = Form::new(construct::repeatable(
        [
            attr::identifier(Key::Items),
            attr::repeatable_min(2),
            attr::repeatable_max(5),
        ],
        construct::text([]),
        Vec::new(),
    ));
    assert_eq!(form.tree().children().len(), 2);

    let remove = FieldEvent::Removed { path: vec![0] };
    assert!(!form.handle_event(&remove));
    assert_eq!(form.tree().children().len(), 2);

    let add = FieldEvent::Added { path: Vec::new() };
    for _ in 0..10 {
        form.handle_event(&add);
    }
    assert_eq!(form.tree().children().len(), 5);

    assert!(form.handle_event(&remove));
    assert_eq!(form.tree().children().len(), 4);
}

#[test]
fn repeatable_entries_decode_as_list() {
    let entry = construct::group(
        [],
        vec![construct::email([attr::identifier(Key::Contact), attr::required(true)])],
    );
    let mut form = Form::new(construct::repeatable(
        [attr::identifier(Key::Items), attr::name("contacts")],
        entry,
        vec![Vec::new(), Vec::new()],
    ));
    form.handle_event(&changed(&[0, 0], "a@example.org"));
    form.handle_event(&changed(&[1, 0], "nope"));

    let contacts = parse::field(Key::Items, parse::list(parse::field(Key::Contact, parse::string())));
    assert_eq!(
        form.submit(&contacts),
        Err(vec![Error::EmailInvalid(Some(Key::Contact))])
    );

    form.handle_event(&changed(&[1, 0], "b@example.org"));
    assert_eq!(
        form.submit(&contacts),
        Ok(vec!["a@example.org".to_owned(), "b@example.org".to_owned()])
    );
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn json_round_trip() {
    let shape = || {
        construct::group::<Key>(
            [],
            vec![construct::group(
                [attr::name("g")],
                vec![construct::text([attr::name("x")])],
            )],
        )
    };
    let mut source = shape();
    source.update(&[0, 0], |node| node.value_mut().set_value(Value::from("hi")));
    let encoded = formtree::encode(&source);
    assert_eq!(encoded, Ok(json!({"g": {"x": "hi"}})));

    let mut target = shape();
    assert_eq!(
        formtree::update_values_from_json(&mut target, &json!({"g": {"x": "hi"}})),
        Ok(())
    );
    assert_eq!(
        target.get_value(&[0, 0]).map(Field::value),
        Some(&Value::from("hi"))
    );
}

#[test]
fn unnamed_repeatable_cannot_encode() {
    let form = Form::new(construct::repeatable(
        [attr::identifier(Key::Items)],
        construct::text([]),
        Vec::new(),
    ));
    assert_eq!(
        form.encode_json(),
        Err(vec![Error::RepeatableHasNoName(Some(Key::Items))])
    );
}

// ============================================================================
// Status gating
// ============================================================================

#[test]
fn required_error_shows_after_blur() {
    let mut form = Form::new(construct::text([
        attr::identifier(Key::First),
        attr::required(true),
    ]));
    let _ = validate_tree(form.tree_mut());
    assert_eq!(form.tree().value().status(), Status::Pristine);
    assert!(form.tree().value().visible_errors().is_empty());

    assert!(form.handle_event(&FieldEvent::Blurred { path: Vec::new() }));
    assert_eq!(form.tree().value().status(), Status::Touched);
    assert_eq!(
        form.tree().value().visible_errors(),
        vec![&Error::IsBlank(Some(Key::First))]
    );
}

#[test]
fn hiding_a_failed_field_clears_its_errors() {
    let mut form = Form::new(construct::group(
        [],
        vec![construct::text([attr::identifier(Key::Second), attr::required(true)])],
    ));
    let optional = parse::field(Key::Second, parse::maybe(parse::string()));
    assert_eq!(
        form.submit(&optional),
        Err(vec![Error::IsBlank(Some(Key::Second))])
    );

    assert_eq!(form.update_with_id(&Key::Second, [attr::hidden(true)]), Ok(()));
    assert_eq!(form.submit(&optional), Ok(None));
    assert!(form.tree().children()[0].value().errors().is_empty());
}

#[test]
fn hidden_fields_do_not_block_submit() {
    let mut form = Form::new(construct::group(
        [],
        vec![
            construct::text([attr::identifier(Key::First), attr::value("ok")]),
            construct::text([
                attr::identifier(Key::Second),
                attr::required(true),
                attr::hidden(true),
            ]),
        ],
    ));
    assert_eq!(
        form.submit(&parse::field(Key::First, parse::string())),
        Ok("ok".to_owned())
    );
    assert_eq!(form.update_with_id(&Key::Second, [attr::hidden(false)]), Ok(()));
    assert!(form.submit(&parse::field(Key::First, parse::string())).is_ok());
    assert!(form.submit(&parse::json()).is_err());
}
