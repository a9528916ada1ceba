//! # Schema Subcommand
//!
//! Prints the assembled result types in GraphQL SDL, either for every
//! registered field or for a single one.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use vfield_core::{FieldError, FieldRegistry};

/// Arguments for the `vfield schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Only print the types belonging to this field.
    pub field: Option<String>,
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs, registry: &FieldRegistry<()>, out: &mut impl Write) -> Result<u8> {
    let sdl = match &args.field {
        Some(name) => registry
            .get(name)
            .ok_or_else(|| FieldError::UnknownField(name.clone()))?
            .output_type()
            .to_sdl(),
        None => registry.to_sdl(),
    };
    write!(out, "{sdl}")?;
    Ok(0)
}
