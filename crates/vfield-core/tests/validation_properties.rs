//! Behavioral properties of the validator: short-circuiting, list paths,
//! sub-error placement, and determinism.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use serde_json::{json, Value};
use vfield_core::{demo, rule_error, FieldConfig, FieldSpec, ObjectType, Position, TypeNode};

fn reject_bad() -> impl Fn(&Value) -> Option<Value> + Send + Sync + 'static {
    |v: &Value| (v == "bad").then(|| json!("bad item"))
}

#[test]
fn items_after_the_first_failure_are_not_evaluated() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let spec = FieldSpec::new(TypeNode::list(TypeNode::string())).validate_item(move |v| {
        log.lock().unwrap().push(v.clone());
        (v == "bad").then(|| json!("bad item"))
    });

    let outcome = vfield_core::walker::validate(
        &spec,
        &json!(["ok", "ok", "bad", "ok"]),
        Position::CHILD,
    );

    assert_eq!(outcome.path(), Some(&[2][..]));
    assert_eq!(outcome.error(), Some(&json!("bad item")));
    assert_eq!(*seen.lock().unwrap(), vec![json!("ok"), json!("ok"), json!("bad")]);
}

#[test]
fn nested_list_path_has_one_index_per_level() {
    let spec = FieldSpec::new(TypeNode::list(TypeNode::list(TypeNode::string())))
        .validate_item(reject_bad());
    let outcome = vfield_core::walker::validate(
        &spec,
        &json!([["ok", "ok"], ["ok", "bad"]]),
        Position::CHILD,
    );
    assert_eq!(outcome.path(), Some(&[1, 1][..]));
}

#[test]
fn outer_rule_failure_never_runs_the_computation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let field = FieldConfig::<()>::new("close", TypeNode::boolean(), move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(json!(true))
    })
    .arg(
        "reason",
        FieldSpec::new(TypeNode::string()).validate(|_| Some(json!("always fails"))),
    )
    .validate(|_| Some(rule_error("closed", "Already closed")))
    .error_codes(["closed"])
    .build()
    .unwrap();

    let envelope = field.resolve(&(), &json!({ "reason": "x" })).unwrap();
    assert!(!envelope.is_valid());
    assert_eq!(envelope.errors().error().unwrap()["code"], "closed");
    assert!(envelope.errors().suberrors().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

fn address() -> ObjectType {
    ObjectType::builder("AddressInput")
        .field(
            "city",
            FieldSpec::new(TypeNode::string())
                .validate(|v| (v == "").then(|| json!("city required"))),
        )
        .build()
        .unwrap()
}

#[test]
fn own_rule_and_invalid_child_use_separate_buckets() {
    let object = ObjectType::builder("Args")
        .field(
            "address",
            FieldSpec::new(TypeNode::object(address())).validate(|_| None),
        )
        .build()
        .unwrap();
    let spec = FieldSpec::new(TypeNode::object(object));
    let outcome = vfield_core::walker::validate(
        &spec,
        &json!({ "address": { "city": "" } }),
        Position::ROOT,
    );

    let address = outcome.suberror("address").unwrap();
    assert!(address.suberror("city").is_some());
    assert!(address.fields().is_empty());
}

#[test]
fn own_rule_failure_and_children_are_exclusive() {
    // A failing own rule stops the walk, so the object reports only its
    // direct error even when a child is also invalid.
    let spec = FieldSpec::new(TypeNode::object(address()))
        .validate(|_| Some(json!("address rejected")));
    let outcome = vfield_core::walker::validate(&spec, &json!({ "city": "" }), Position::CHILD);
    assert_eq!(outcome.to_value(), json!({ "error": "address rejected" }));
}

#[test]
fn pass_through_child_surfaces_under_its_own_key() {
    let object = ObjectType::builder("Args")
        .field("address", FieldSpec::new(TypeNode::object(address())))
        .build()
        .unwrap();
    let spec = FieldSpec::new(TypeNode::object(object));
    let outcome = vfield_core::walker::validate(
        &spec,
        &json!({ "address": { "city": "" } }),
        Position::ROOT,
    );

    assert_eq!(
        outcome.to_value(),
        json!({ "suberrors": { "address": { "city": { "error": "city required" } } } })
    );
}

#[test]
fn address_book_nested_contact_errors() {
    let field = demo::update_address_book().unwrap();
    let envelope = field
        .resolve_json(
            &(),
            &json!({
                "owner": "Ada",
                "contacts": [
                    { "name": "Grace", "email": "grace@example.org" },
                    {
                        "name": "Alan",
                        "phone": "555",
                        "address": { "postcode": "12", "city": "Wilmslow" }
                    }
                ]
            }),
        )
        .unwrap();

    assert_eq!(envelope["valid"], false);
    let contacts = &envelope["suberrors"]["contacts"];
    assert_eq!(contacts["path"], json!([1]));
    assert!(contacts.get("error").is_none());
    assert_eq!(
        contacts["suberrors"]["address"]["postcode"]["error"]["code"],
        "invalidPostcode"
    );
}

#[test]
fn address_book_item_rule_wraps_payload() {
    let field = demo::update_address_book().unwrap();
    let envelope = field
        .resolve_json(
            &(),
            &json!({ "owner": "Ada", "contacts": [{ "name": "Nobody" }] }),
        )
        .unwrap();

    let contacts = &envelope["suberrors"]["contacts"];
    assert_eq!(contacts["path"], json!([0]));
    assert_eq!(contacts["error"]["code"], "unreachable");
    assert!(contacts.get("suberrors").is_none());
}

#[test]
fn address_book_too_many_contacts() {
    let field = demo::update_address_book().unwrap();
    let contacts: Vec<Value> = (0..=demo::MAX_CONTACTS)
        .map(|i| json!({ "name": format!("c{i}"), "phone": "1" }))
        .collect();
    let envelope = field
        .resolve(&(), &json!({ "owner": "Ada", "contacts": contacts }))
        .unwrap();

    let list = envelope.errors().suberror("contacts").unwrap();
    assert_eq!(list.error().unwrap()["code"], "tooManyContacts");
    assert!(list.path().is_none());
}

#[test]
fn address_book_tag_path() {
    let field = demo::update_address_book().unwrap();
    let envelope = field
        .resolve(
            &(),
            &json!({ "owner": "Ada", "tags": [["home"], ["work", "Urgent"]] }),
        )
        .unwrap();

    let tags = envelope.errors().suberror("tags").unwrap();
    assert_eq!(tags.path(), Some(&[1, 1][..]));
}

#[test]
fn address_book_valid_update() {
    let field = demo::update_address_book().unwrap();
    let envelope = field
        .resolve_json(
            &(),
            &json!({
                "owner": "Ada",
                "contacts": [
                    { "name": "Grace", "email": "grace@example.org" },
                    { "name": "Alan", "phone": "555", "address": { "postcode": "12345" } }
                ],
                "tags": [["home", "family"], []]
            }),
        )
        .unwrap();

    assert_eq!(envelope, json!({ "valid": true, "result": 2 }));
}

fn phone_input() -> impl Strategy<Value = Value> {
    let number = prop_oneof!["[0-9-]{1,12}", "[a-z0-9-]{0,12}"];
    prop::collection::vec(number, 0..8).prop_map(|numbers| json!({ "phoneNumbers": numbers }))
}

proptest! {
    /// Validating the same value twice yields identical outcomes.
    #[test]
    fn validation_is_idempotent(args in phone_input()) {
        let field = demo::save_phone_numbers().unwrap();
        let first = field.validate(&args);
        let second = field.validate(&args);
        prop_assert_eq!(first, second);
    }

    /// Validity and result presence are mutually exclusive with errors.
    #[test]
    fn envelope_invariants_hold(args in phone_input()) {
        let field = demo::save_phone_numbers().unwrap();
        let envelope = field.resolve(&(), &args).unwrap();
        prop_assert_eq!(envelope.is_valid(), envelope.result().is_some());
        prop_assert_eq!(envelope.is_valid(), envelope.errors().is_empty());
    }
}
