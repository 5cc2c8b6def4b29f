//! Human-readable resource quantities
//!
//! Compose files express memory as strings such as `512m` or `1.5g`, while
//! ECS wants whole megabytes. CPU reservations are plain integer CPU units.

use crate::error::{EcsctlError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// `<number>[ ]<k|m|g|t|p>[i][b]`, case-insensitive
static QUANTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+(?:\.\d+)?) ?(?:([kmgtp])i?)?b?$").unwrap());

const KIB: f64 = 1024.0;

/// Parse a memory quantity to bytes (base 1024).
///
/// # Examples
/// - "1g" -> 1073741824
/// - "512m" -> 536870912
/// - "64kb" -> 65536
/// - "100" -> 100
pub fn to_bytes(quantity: &str) -> Result<i64> {
    let invalid = || EcsctlError::InvalidQuantity(quantity.to_string());

    let caps = QUANTITY_REGEX.captures(quantity).ok_or_else(invalid)?;
    let value: f64 = caps[1].parse().map_err(|_| invalid())?;

    let exponent = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        None => 0,
        Some(unit) => match unit.as_str() {
            "k" => 1,
            "m" => 2,
            "g" => 3,
            "t" => 4,
            "p" => 5,
            _ => return Err(invalid()),
        },
    };

    let bytes = value * KIB.powi(exponent);
    if !bytes.is_finite() || bytes >= i64::MAX as f64 {
        return Err(invalid());
    }

    Ok(bytes as i64)
}

/// Parse a memory quantity to whole megabytes, truncating.
pub fn to_megabytes(quantity: &str) -> Result<i64> {
    Ok(to_bytes(quantity)? / 1024 / 1024)
}

/// Parse a CPU reservation as base-10 integer CPU units.
pub fn parse_cpu_units(value: &str) -> Result<i64> {
    value
        .parse::<i64>()
        .map_err(|_| EcsctlError::InvalidQuantity(value.to_string()))
}
