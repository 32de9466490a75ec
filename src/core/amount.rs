//! Conversion between caller-facing decimal amounts and PayU minor units.
//!
//! PayU transmits every monetary value as an integer count of hundredths,
//! encoded as a base-10 string (`29.99` travels as `"2999"`). Only the keys in
//! [`CONVERTIBLE_FIELDS`] carry money; they are converted wherever they occur,
//! including inside nested objects and product arrays.

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

use super::error::{AppError, Result};

/// JSON keys holding monetary values on the PayU wire
pub const CONVERTIBLE_FIELDS: [&str; 5] = ["amount", "total", "available", "unitPrice", "totalAmount"];

const MINOR_UNIT_SCALE: u32 = 2;

fn is_convertible(key: &str) -> bool {
    CONVERTIBLE_FIELDS.contains(&key)
}

/// Centify a decimal amount: `29.99` becomes `"2999"`.
///
/// Scaling is exact. Amounts with more than two significant fractional digits
/// and negative amounts are rejected instead of being rounded.
pub fn to_wire(amount: Decimal) -> Result<String> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::validation(format!(
            "Amount cannot be negative: {}",
            amount
        )));
    }

    let scaled = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| AppError::validation(format!("Amount {} is too large", amount)))?;
    if !scaled.fract().is_zero() {
        return Err(AppError::validation(format!(
            "Amount {} has more than {} fractional digits",
            amount, MINOR_UNIT_SCALE
        )));
    }
    // from_wire reads minor units as i64
    if scaled > Decimal::from(i64::MAX) {
        return Err(AppError::validation(format!("Amount {} is too large", amount)));
    }

    Ok(scaled.trunc().normalize().to_string())
}

/// Normalize a minor-unit string: `"2999"` becomes `29.99` (scale 2).
pub fn from_wire(value: &str) -> Result<Decimal> {
    let minor = value
        .trim()
        .parse::<i64>()
        .map_err(|e| AppError::validation(format!("Invalid minor-unit amount '{}': {}", value, e)))?;

    Ok(Decimal::new(minor, MINOR_UNIT_SCALE))
}

/// Outbound pass: converts every convertible field of a request body.
///
/// `null` values are left untouched.
pub fn centify(value: Value) -> Result<Value> {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, field) in map {
                let converted = if is_convertible(&key) && is_scalar(&field) {
                    Value::String(to_wire(decimal_from_json(&key, &field)?)?)
                } else {
                    centify(field)?
                };
                out.insert(key, converted);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => items
            .into_iter()
            .map(centify)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        other => Ok(other),
    }
}

/// Inbound pass: converts every convertible field of a response or callback body.
///
/// Converted amounts are rendered as decimal strings with exactly two
/// fractional digits so typed models can deserialize them into [`Decimal`].
pub fn normalize(value: Value) -> Result<Value> {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, field) in map {
                let converted = if is_convertible(&key) && is_scalar(&field) {
                    Value::String(minor_units_from_json(&key, &field)?.to_string())
                } else {
                    normalize(field)?
                };
                out.insert(key, converted);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => items
            .into_iter()
            .map(normalize)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        other => Ok(other),
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::Number(_) | Value::String(_) | Value::Bool(_))
}

fn decimal_from_json(key: &str, value: &Value) -> Result<Decimal> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => {
            return Err(AppError::validation(format!(
                "Field '{}' must hold an amount, got {}",
                key, other
            )))
        }
    };

    Decimal::from_str(raw.trim())
        .or_else(|_| Decimal::from_scientific(raw.trim()))
        .map_err(|e| AppError::validation(format!("Invalid amount in '{}': {} ({})", key, raw, e)))
}

fn minor_units_from_json(key: &str, value: &Value) -> Result<Decimal> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => from_wire(&n.to_string()),
        Value::String(s) => from_wire(s),
        other => Err(AppError::validation(format!(
            "Field '{}' must hold a minor-unit integer, got {}",
            key, other
        ))),
    }
}
