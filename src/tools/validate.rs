//! Argument checks shared by the tool handlers.

use std::sync::OnceLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::security::reject_control_chars;
use crate::{Error, Result};

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidArguments(message.into())
}

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("static regex"))
}

fn lowercase_code() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[a-z]{2}$")
}

fn country_code() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[A-Z]{2}$")
}

fn genre_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[a-zA-Z\s&-]+$")
}

fn audio_codec() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[a-zA-Z0-9.]+$")
}

fn hex_hash() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[a-fA-F0-9]{40}$")
}

/// Decode tool arguments into `T`; a missing payload reads as `{}`.
pub(crate) fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| invalid(e.to_string()))
}

/// Free text of `min..=max` characters without control characters.
pub(crate) fn text(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min {
        return Err(invalid(format!(
            "{field} must be at least {min} character{}",
            if min == 1 { "" } else { "s" }
        )));
    }
    if len > max {
        return Err(invalid(format!("{field} must be at most {max} characters")));
    }
    reject_control_chars(field, value)
}

/// Value must be one of `allowed`.
pub(crate) fn one_of(field: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!(
            "{field} must be one of: {} (got '{value}')",
            allowed.join(", ")
        )))
    }
}

/// Numeric value within `min..=max`.
pub(crate) fn range<T>(field: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min || value > max {
        return Err(invalid(format!("{field} must be between {min} and {max}")));
    }
    Ok(())
}

/// Lowercase ISO 639-1 code such as `en`.
pub(crate) fn language(field: &str, value: &str) -> Result<()> {
    if lowercase_code().is_match(value) {
        Ok(())
    } else {
        Err(invalid(format!(
            "{field} must be a lowercase 2-letter language code"
        )))
    }
}

/// Uppercase ISO 3166-1 code such as `US`.
pub(crate) fn country(value: &str) -> Result<()> {
    if country_code().is_match(value) {
        Ok(())
    } else {
        Err(invalid(
            "country must be an uppercase 2-letter ISO 3166-1 country code",
        ))
    }
}

pub(crate) fn genre(value: &str) -> Result<()> {
    if value.chars().count() > 50 {
        return Err(invalid("genre must be at most 50 characters"));
    }
    if !genre_name().is_match(value) {
        return Err(invalid(
            "genre must contain only letters, spaces, ampersands, and hyphens",
        ));
    }
    Ok(())
}

pub(crate) fn audio(value: &str) -> Result<()> {
    if audio_codec().is_match(value) {
        Ok(())
    } else {
        Err(invalid(
            "audio must contain only alphanumeric characters and dots",
        ))
    }
}

/// 40-digit hex info hash, returned lowercased.
pub(crate) fn info_hash(value: &str) -> Result<String> {
    if hex_hash().is_match(value) {
        Ok(value.to_ascii_lowercase())
    } else {
        Err(invalid("info_hash must be a 40-character hex string"))
    }
}

/// Single `@` with something on both sides, at most 200 characters.
pub(crate) fn email(value: &str) -> Result<()> {
    if value.chars().count() > 200 {
        return Err(invalid("email must be at most 200 characters"));
    }
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(invalid("email must be a valid email address"))
    }
}
