//! Security checks: SSRF protection for the API origin and input
//! validation for free-text tool arguments.

pub mod sanitize;
pub mod ssrf;

pub use sanitize::reject_control_chars;
pub use ssrf::validate_api_url;
