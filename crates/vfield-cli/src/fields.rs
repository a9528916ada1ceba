//! # Fields Subcommand
//!
//! Lists the registered fields with the name of their result type.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use serde_json::json;
use vfield_core::FieldRegistry;

/// Arguments for the `vfield fields` subcommand.
#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Emit a JSON array instead of one line per field.
    #[arg(long)]
    pub json: bool,
}

/// Execute the fields subcommand.
pub fn run_fields(args: &FieldsArgs, registry: &FieldRegistry<()>, out: &mut impl Write) -> Result<u8> {
    let listing: Vec<(&str, &str)> = registry
        .names()
        .filter_map(|name| {
            registry
                .get(name)
                .map(|field| (name, field.output_type().root_name()))
        })
        .collect();

    if args.json {
        let body: Vec<_> = listing
            .iter()
            .map(|(name, result_type)| json!({ "name": name, "resultType": result_type }))
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
    } else {
        for (name, result_type) in listing {
            writeln!(out, "{name}\t{result_type}")?;
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use vfield_core::demo;

    #[test]
    fn lists_fields_in_name_order() {
        let registry = demo::registry().unwrap();
        let mut out = Vec::new();
        run_fields(&FieldsArgs { json: false }, &registry, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "savePhoneNumbers\tSavePhoneNumbersResult",
                "updateAddressBook\tUpdateAddressBookResult",
            ]
        );
    }

    #[test]
    fn json_listing_carries_result_type() {
        let registry = demo::registry().unwrap();
        let mut out = Vec::new();
        run_fields(&FieldsArgs { json: true }, &registry, &mut out).unwrap();
        let listing: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(listing[0]["name"], "savePhoneNumbers");
        assert_eq!(listing[1]["resultType"], "UpdateAddressBookResult");
    }
}
