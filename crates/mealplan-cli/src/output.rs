//! Printing helpers shared by the command handlers.
//!
//! Everything written to stdout is JSON so the CLI can be scripted; logs go
//! to stderr.

use anyhow::{Context, Result, bail};
use serde::Serialize;

use mealplan_core::ServiceResponse;

/// Pretty-print `value` as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Print a read result, or fail with `what` when there is nothing to show.
pub fn print_found<T: Serialize>(value: Option<T>, what: &str) -> Result<()> {
    match value {
        Some(value) => print_json(&value),
        None => bail!("{what} not found"),
    }
}

/// Print the envelope of a mutation. A non-success envelope is still printed,
/// then reported as an error so the process exits non-zero.
pub fn print_response(response: &ServiceResponse) -> Result<()> {
    print_json(response)?;
    if !response.is_success() {
        bail!("{response}");
    }
    Ok(())
}
