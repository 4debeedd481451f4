//! JSON output formatting.

use crate::api::{ErrorResponse, ScanResponse};
use serde::Serialize;
use std::io::{self, Write};

fn write_json<T: Serialize>(value: &T, pretty: bool) -> io::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(io::Error::other)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", json)
}

/// Print a scan response.
pub fn print_response(response: &ScanResponse, pretty: bool) -> io::Result<()> {
    write_json(response, pretty)
}

/// Print a rejected request body.
pub fn print_error_response(response: &ErrorResponse, pretty: bool) -> io::Result<()> {
    write_json(response, pretty)
}
