//! Output formatting module.
//!
//! The response JSON goes to stdout; progress and status lines go to stderr
//! so the JSON stays machine-readable.

mod json_format;
mod plain;

pub use json_format::{print_error_response, print_response};
pub use plain::{
    print_error, print_info, print_scan_header, print_success, print_summary, print_warning,
};
