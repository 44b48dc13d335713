//! Input checks for free-text tool arguments.
//!
//! Search text is forwarded verbatim to the upstream API as a query
//! parameter. C0 control characters other than tab, newline and carriage
//! return are rejected rather than stripped so the caller sees why.

use crate::{Error, Result};

/// C0 control characters except `\t`, `\n`, `\r`.
fn is_unsafe_control(c: char) -> bool {
    let code = c as u32;
    code <= 0x1F && code != 0x09 && code != 0x0A && code != 0x0D
}

/// Reject strings carrying unsafe control characters.
///
/// # Errors
///
/// Returns `Error::InvalidArguments` naming `field` when one is found.
pub fn reject_control_chars(field: &str, value: &str) -> Result<()> {
    if value.chars().any(is_unsafe_control) {
        return Err(Error::InvalidArguments(format!(
            "{field} contains invalid control characters"
        )));
    }
    Ok(())
}
