//! # Run Subcommand
//!
//! Reads a JSON argument object from `--args`, `--input`, or stdin, resolves
//! the named field, and writes the result envelope to stdout.

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use vfield_core::{FieldError, FieldRegistry};

/// Exit code when the field's arguments fail validation.
pub const EXIT_INVALID: u8 = 1;

/// Arguments for the `vfield run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Name of the registered field to invoke.
    pub field: String,

    /// Read the argument object from this file instead of stdin.
    #[arg(long, conflicts_with = "args")]
    pub input: Option<PathBuf>,

    /// Argument object given inline as JSON.
    #[arg(long)]
    pub args: Option<String>,

    /// Pretty-print the result envelope.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the run subcommand.
///
/// `stdin` is only read when neither `--args` nor `--input` is given.
pub fn run_field(
    args: &RunArgs,
    registry: &FieldRegistry<()>,
    stdin: impl Read,
    out: &mut impl Write,
) -> Result<u8> {
    let field = registry
        .get(&args.field)
        .ok_or_else(|| FieldError::UnknownField(args.field.clone()))?;

    let arguments = read_arguments(args, stdin)?;
    anyhow::ensure!(
        arguments.is_object(),
        "field arguments must be a JSON object, got: {arguments}"
    );

    let envelope = field
        .resolve(&(), &arguments)
        .with_context(|| format!("failed to resolve field '{}'", args.field))?;
    tracing::info!(field = %args.field, valid = envelope.is_valid(), "field resolved");

    let body = envelope.to_value(field.valid_name(), field.result_name());
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&body)?
    } else {
        serde_json::to_string(&body)?
    };
    writeln!(out, "{rendered}")?;

    Ok(if envelope.is_valid() { 0 } else { EXIT_INVALID })
}

fn read_arguments(args: &RunArgs, mut stdin: impl Read) -> Result<Value> {
    let (source, raw) = if let Some(inline) = &args.args {
        ("--args".to_string(), inline.clone())
    } else if let Some(path) = &args.input {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        (path.display().to_string(), raw)
    } else {
        let mut raw = String::new();
        stdin
            .read_to_string(&mut raw)
            .context("failed to read arguments from stdin")?;
        ("stdin".to_string(), raw)
    };

    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {source}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vfield_core::demo;

    fn run_args(field: &str) -> RunArgs {
        RunArgs {
            field: field.to_string(),
            input: None,
            args: None,
            pretty: false,
        }
    }

    fn run(args: &RunArgs, stdin: &str) -> Result<(u8, Value)> {
        let registry = demo::registry()?;
        let mut out = Vec::new();
        let code = run_field(args, &registry, stdin.as_bytes(), &mut out)?;
        let printed: Value = serde_json::from_slice(&out)?;
        Ok((code, printed))
    }

    #[test]
    fn valid_arguments_exit_zero_with_result() {
        let (code, printed) = run(
            &run_args("savePhoneNumbers"),
            r#"{"phoneNumbers": ["123-456", "789"]}"#,
        )
        .unwrap();
        assert_eq!(code, 0);
        assert_eq!(printed, json!({"valid": true, "result": true}));
    }

    #[test]
    fn invalid_arguments_exit_one_with_error_tree() {
        let (code, printed) = run(
            &run_args("savePhoneNumbers"),
            r#"{"phoneNumbers": ["123", "abc"]}"#,
        )
        .unwrap();
        assert_eq!(code, EXIT_INVALID);
        assert_eq!(printed["valid"], json!(false));
        assert_eq!(printed["suberrors"]["phoneNumbers"]["path"], json!([1]));
        assert!(printed.get("result").is_none());
    }

    #[test]
    fn inline_args_take_precedence_over_stdin() {
        let mut args = run_args("savePhoneNumbers");
        args.args = Some(r#"{"phoneNumbers": []}"#.to_string());
        let (code, printed) = run(&args, "not json").unwrap();
        assert_eq!(code, EXIT_INVALID);
        assert_eq!(
            printed["suberrors"]["phoneNumbers"]["error"]["code"],
            json!("requiredValue")
        );
    }

    #[test]
    fn reads_arguments_from_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("args.json");
        std::fs::write(&path, r#"{"phoneNumbers": ["555-0100"]}"#).unwrap();

        let mut args = run_args("savePhoneNumbers");
        args.input = Some(path);
        let (code, _) = run(&args, "").unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn empty_input_is_an_empty_argument_object() {
        let (code, printed) = run(&run_args("savePhoneNumbers"), "  \n").unwrap();
        assert_eq!(code, 0);
        assert_eq!(printed["valid"], json!(true));
    }

    #[test]
    fn unknown_field_is_an_error() {
        let err = run(&run_args("nope"), "{}").unwrap_err();
        assert!(err.to_string().contains("nope"), "{err}");
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = run(&run_args("savePhoneNumbers"), "{oops").unwrap_err();
        assert!(format!("{err:#}").contains("invalid JSON in stdin"), "{err:#}");
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        let err = run(&run_args("savePhoneNumbers"), "[1, 2]").unwrap_err();
        assert!(err.to_string().contains("JSON object"), "{err}");
    }

    #[test]
    fn missing_input_file_names_the_path() {
        let mut args = run_args("savePhoneNumbers");
        args.input = Some(PathBuf::from("/nonexistent/vfield/args.json"));
        let err = run(&args, "").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/vfield/args.json"));
    }
}
