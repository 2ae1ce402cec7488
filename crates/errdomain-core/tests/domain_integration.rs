//! Integration tests for domains and descriptors.
//!
//! These exercise the public API end to end: code allocation, override
//! precedence, identity checks and the generator factories.
//!
//! Tests CAN use `.unwrap()` and `.expect()`.

use errdomain_core::{
    format_code, increment_number, CodedError, DescriptorOptions, Domain, DomainError,
    DomainOptions, ErrorClass, ErrorCode, ExtraProperties,
};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

// ============================================================================
// Test Helpers
// ============================================================================

fn props(value: Value) -> ExtraProperties {
    value.as_object().cloned().expect("object literal")
}

fn assert_created(err: &CodedError, message: &str, code: &str, class: &ErrorClass) {
    assert!(err.instance_of(class), "wrong class: {}", err.class());
    assert_eq!(err.message(), message);
    assert_eq!(err.code().map(ErrorCode::as_str), Some(code));
}

fn assert_extra(err: &CodedError, expected: &ExtraProperties) {
    for (key, value) in expected {
        assert_eq!(err.property(key), Some(value), "property {key}");
    }
}

// ============================================================================
// Code Allocation
// ============================================================================

#[test]
fn test_generated_codes_are_distinct_and_ordered() {
    let mut domain = Domain::new();
    domain.create(DescriptorOptions::new().code("3")).unwrap();

    let codes: Vec<String> = (0..5)
        .map(|_| {
            domain
                .create(DescriptorOptions::new())
                .unwrap()
                .code()
                .to_string()
        })
        .collect();

    assert_eq!(codes, vec!["1", "2", "4", "5", "6"]);
    let unique: HashSet<&String> = codes.iter().collect();
    assert_eq!(unique.len(), codes.len());
}

#[test]
fn test_stubbed_generator_skips_taken_codes() {
    let emitted = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&emitted);
    let mut i = 0_i64;
    let generator = move || {
        i += 10;
        let code = ErrorCode::from(i);
        log.lock().unwrap().push(code.clone());
        code
    };

    let mut domain = Domain::with_options(DomainOptions::new().code_generator(generator));
    domain.create_positional(None, Some("10".into()), None).unwrap();
    domain.create_positional(None, Some("20".into()), None).unwrap();
    assert!(emitted.lock().unwrap().is_empty());

    let err = domain.create(DescriptorOptions::new()).unwrap().with_message("msg");
    assert_created(&err, "msg", "30", &ErrorClass::error());
    assert_eq!(emitted.lock().unwrap().len(), 3);
}

#[test]
fn test_duplicate_code_leaves_domain_unchanged() {
    let mut domain = Domain::new();
    let original = domain.create("first").unwrap();

    let err = domain.create_positional(Some("second"), Some("1".into()), None).unwrap_err();
    assert!(matches!(err, DomainError::DuplicateCode { .. }));
    assert_eq!(err.to_string(), "Code \"1\" is already taken");

    let found = domain.find_error_descriptor_for_code("1").unwrap();
    assert_eq!(found, &original);
    assert_eq!(found.default_message(), "first");
    assert_eq!(domain.len(), 1);

    // The generator was not advanced by the failed call.
    assert_eq!(domain.create("third").unwrap().code(), "2");
}

#[test]
fn test_numeric_code_is_normalised() {
    let mut domain = Domain::new();
    let d = domain.create(DescriptorOptions::new().code(404_u32)).unwrap();
    assert_eq!(d.code(), "404");
    assert!(domain.is_taken("404"));
}

// ============================================================================
// Override Precedence
// ============================================================================

#[test]
fn test_round_trip_of_configured_defaults() {
    let class = ErrorClass::new("CustomError");
    let extra = props(json!({"status": 404, "retry": false}));
    let mut domain = Domain::new();
    let d = domain
        .create(
            DescriptorOptions::new()
                .message("Not found")
                .extra_properties(extra.clone())
                .error_class(class.clone()),
        )
        .unwrap();

    let err = d.error();
    assert_created(&err, "Not found", d.code().as_str(), &class);
    assert_extra(&err, &extra);
}

#[test]
fn test_per_call_overrides() {
    let defaults = props(json!({"a": "default", "b": 1}));
    let per_call = props(json!({"b": 2, "c": "new"}));
    let mut domain = Domain::new();
    let d = domain
        .create_positional(Some("default message"), None, Some(defaults))
        .unwrap();

    let err = d.call(Some("override"), Some(per_call));
    assert_created(&err, "override", "1", &ErrorClass::error());
    assert_extra(&err, &props(json!({"a": "default", "b": 2, "c": "new"})));

    // The descriptor itself is unchanged.
    assert_eq!(d.error().property("b"), Some(&json!(1)));
}

#[test]
fn test_builder_chain() {
    let other = ErrorClass::new("Other");
    let mut domain = Domain::new();
    let d = domain.create("Value %d out of range").unwrap();

    let err = d
        .builder()
        .format_message(&[json!(42)])
        .override_error_class(other.clone())
        .extra_properties(props(json!({"field": "age"})))
        .create();

    assert_created(&err, "Value 42 out of range", "1", &other);
    assert_eq!(err.property("field"), Some(&json!("age")));
    assert!(!d.is(&err));
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn test_is_checks_class_and_code() {
    let custom = ErrorClass::new("CustomError");
    let mut domain = Domain::new();
    let simple = domain.create(DescriptorOptions::new()).unwrap();
    let with_class = domain
        .create(DescriptorOptions::new().error_class(custom.clone()))
        .unwrap();

    assert!(simple.is(&simple.construct(None, None)));
    assert!(!simple.is(&ErrorClass::error().construct("")));
    assert!(!simple.is(&json!({"code": simple.code().as_str()})));

    assert!(with_class.is(&with_class.construct(None, None)));
    assert!(!with_class.is(&ErrorClass::error().construct("")));
    assert!(!with_class.is(&json!({"code": with_class.code().as_str()})));
    assert!(!with_class.is(&custom.construct("test")));

    assert!(!simple.is(&with_class.error()));
}

#[test]
fn test_format_uses_default_message() {
    let mut domain = Domain::new();
    let d = domain.create("How about %s?").unwrap();
    let err = d.format(&[json!("foo")]);
    assert_eq!(err.message(), "How about foo?");
    assert!(d.is(&err));
}

// ============================================================================
// Generator Factories
// ============================================================================

#[test]
fn test_domain_with_increment_number() {
    let mut domain = Domain::with_options(DomainOptions::new().code_generator(increment_number(200, 10)));
    let codes: Vec<String> = (0..3)
        .map(|_| domain.create("x").unwrap().code().to_string())
        .collect();
    assert_eq!(codes, vec!["200", "210", "220"]);
}

#[test]
fn test_domain_with_format_code() {
    let mut domain = Domain::with_options(DomainOptions::new().code_generator(format_code("WOO_%d", 1, 1)));
    let codes: Vec<String> = (0..3)
        .map(|_| domain.create("x").unwrap().code().to_string())
        .collect();
    assert_eq!(codes, vec!["WOO_1", "WOO_2", "WOO_3"]);
}

// ============================================================================
// Errors in `?` chains
// ============================================================================

fn lookup(id: u32, missing: &errdomain_core::Descriptor) -> Result<(), Box<dyn std::error::Error>> {
    Err(Box::new(missing.format(&[json!(id)])))
}

#[test]
fn test_coded_error_propagates_as_std_error() {
    let mut domain = Domain::new();
    let missing = domain.create("User %d missing").unwrap();

    let err = lookup(7, &missing).unwrap_err();
    assert!(missing.is_error(err.as_ref()));
    assert_eq!(err.to_string(), "Error: User 7 missing");
}
