//! # vfield-cli: Command-Line Front End for Validated Fields
//!
//! Provides the `vfield` command-line interface over the demonstration
//! [`FieldRegistry`](vfield_core::FieldRegistry).
//!
//! ## Subcommands
//!
//! - `vfield run <field>`: Validate an argument object and, if it passes,
//!   run the field. Prints the result envelope as JSON.
//! - `vfield schema [field]`: Print the assembled result types as SDL.
//! - `vfield fields`: List registered fields.
//!
//! ## Exit Codes
//!
//! ```text
//! 0  valid (or informational command succeeded)
//! 1  arguments failed validation
//! 2  operational error: unreadable input, unknown field, resolver failure
//! ```

pub mod fields;
pub mod run;
pub mod schema;
