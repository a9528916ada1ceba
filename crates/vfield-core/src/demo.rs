//! # Demonstration Fields
//!
//! A small built-in registry used by the HTTP and CLI harnesses and by the
//! integration tests:
//!
//! - `savePhoneNumbers(phoneNumbers: [String])`: a non-empty list of
//!   phone numbers matching `^[0-9-]+$`.
//! - `updateAddressBook(owner: String, contacts: [ContactInput], tags:
//!   [[String]])`: nested objects, lists of objects and lists of lists.

use regex::Regex;
use serde_json::{json, Value};

use crate::error::SchemaError;
use crate::field::{FieldConfig, ValidatedField};
use crate::registry::FieldRegistry;
use crate::types::{rule_error, FieldSpec, ObjectType, TypeNode};

const PHONE_PATTERN: &str = "^[0-9-]+$";
const POSTCODE_PATTERN: &str = "^[0-9]{5}$";

/// Most contacts one address book update may carry.
pub const MAX_CONTACTS: usize = 5;

fn compile(pattern: &str) -> Result<Regex, SchemaError> {
    Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

fn is_blank(value: &Value) -> bool {
    value.as_str().map_or(true, |s| s.trim().is_empty())
}

/// Registry holding every demonstration field.
pub fn registry() -> Result<FieldRegistry<()>, SchemaError> {
    let mut registry = FieldRegistry::new();
    registry.register(save_phone_numbers()?)?;
    registry.register(update_address_book()?)?;
    Ok(registry)
}

/// `savePhoneNumbers`: returns `true` once the numbers pass validation.
pub fn save_phone_numbers() -> Result<ValidatedField<()>, SchemaError> {
    let phone = compile(PHONE_PATTERN)?;

    let phone_numbers = FieldSpec::new(TypeNode::list(TypeNode::string()))
        .description("Numbers to store, digits and dashes only")
        .error_codes(["requiredValue"])
        .validate(|numbers| {
            numbers.as_array().is_some_and(Vec::is_empty).then(|| {
                rule_error("requiredValue", "You must enter at least one phone number")
            })
        })
        .suberror_codes(["invalidPhoneNumber"])
        .validate_item(move |number| {
            let matches = number.as_str().is_some_and(|s| phone.is_match(s));
            (!matches).then(|| {
                rule_error("invalidPhoneNumber", "That is not a valid phone number")
            })
        });

    FieldConfig::new("savePhoneNumbers", TypeNode::boolean(), |_, _| Ok(json!(true)))
        .arg("phoneNumbers", phone_numbers)
        .build()
}

/// `updateAddressBook`: returns the number of contacts stored.
pub fn update_address_book() -> Result<ValidatedField<()>, SchemaError> {
    let postcode = compile(POSTCODE_PATTERN)?;

    let address = ObjectType::builder("AddressInput")
        .field(
            "postcode",
            FieldSpec::new(TypeNode::string())
                .error_codes(["invalidPostcode"])
                .validate(move |v| {
                    let matches = v.as_str().is_some_and(|s| postcode.is_match(s));
                    (!matches).then(|| rule_error("invalidPostcode", "Postcodes have five digits"))
                }),
        )
        .field("city", FieldSpec::new(TypeNode::string()))
        .build()?;

    let contact = ObjectType::builder("ContactInput")
        .field(
            "name",
            FieldSpec::new(TypeNode::non_null(TypeNode::string())?)
                .error_codes(["nameRequired"])
                .validate(|v| is_blank(v).then(|| rule_error("nameRequired", "A contact needs a name"))),
        )
        .field(
            "email",
            FieldSpec::new(TypeNode::string())
                .error_codes(["invalidEmail"])
                .validate(|v| {
                    let ok = v.as_str().is_some_and(|s| s.contains('@'));
                    (!ok).then(|| rule_error("invalidEmail", "That is not an email address"))
                }),
        )
        .field("phone", FieldSpec::new(TypeNode::string()))
        .field("address", FieldSpec::new(TypeNode::object(address)))
        .build()?;

    let contacts = FieldSpec::new(TypeNode::list(TypeNode::non_null(TypeNode::object(contact))?))
        .error_codes(["tooManyContacts"])
        .validate(|list| {
            let count = list.as_array().map_or(0, Vec::len);
            (count > MAX_CONTACTS).then(|| {
                rule_error(
                    "tooManyContacts",
                    &format!("An address book holds at most {MAX_CONTACTS} contacts"),
                )
            })
        })
        .suberror_codes(["unreachable"])
        .validate_item(|contact| {
            let reachable = ["email", "phone"]
                .iter()
                .any(|key| contact.get(key).is_some_and(|v| !v.is_null()));
            (!reachable).then(|| rule_error("unreachable", "Give an email or a phone number"))
        });

    let tags = FieldSpec::new(TypeNode::list(TypeNode::list(TypeNode::string())))
        .suberror_codes(["invalidTag"])
        .validate_item(|tag| {
            let ok = tag
                .as_str()
                .is_some_and(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase()));
            (!ok).then(|| rule_error("invalidTag", "Tags are lower-case letters only"))
        });

    FieldConfig::new("updateAddressBook", TypeNode::int(), |_, args: &Value| {
        let stored = args["contacts"].as_array().map_or(0, Vec::len);
        Ok(json!(stored))
    })
    .arg(
        "owner",
        FieldSpec::new(TypeNode::non_null(TypeNode::string())?)
            .error_codes(["ownerRequired"])
            .validate(|v| is_blank(v).then(|| rule_error("ownerRequired", "Every address book needs an owner"))),
    )
    .arg("contacts", contacts)
    .arg("tags", tags)
    .build()
}
