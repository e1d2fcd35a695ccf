//! Numeric coercion of raw mission parameters.

use once_cell::sync::Lazy;
use regex::Regex;

static DECIMAL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+(?:\.\d+)?|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("Invalid regex pattern")
});

static INTEGER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("Invalid regex pattern"));

/// How text that is not a clean number is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumericPolicy {
    /// Reject anything that doesn't parse in full.
    #[default]
    Strict,
    /// Use the longest numeric prefix, or zero when there is none.
    Lenient,
}

/// Outcome of coercing one raw value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parsed<T> {
    Exact(T),
    /// Lenient mode had to drop text or fall back to zero.
    Coerced(T),
    Invalid,
}

impl NumericPolicy {
    pub fn decimal(self, raw: &str) -> Parsed<f64> {
        if let Some(v) = strict_decimal(raw) {
            return Parsed::Exact(v);
        }
        match self {
            NumericPolicy::Strict => Parsed::Invalid,
            NumericPolicy::Lenient => Parsed::Coerced(
                DECIMAL_PREFIX
                    .captures(raw)
                    .and_then(|c| c[1].parse::<f64>().ok())
                    .filter(|v| v.is_finite())
                    .unwrap_or(0.0),
            ),
        }
    }

    pub fn integer(self, raw: &str) -> Parsed<i64> {
        if let Ok(v) = raw.trim().parse::<i64>() {
            return Parsed::Exact(v);
        }
        match self {
            NumericPolicy::Strict => Parsed::Invalid,
            NumericPolicy::Lenient => Parsed::Coerced(
                INTEGER_PREFIX
                    .captures(raw)
                    .and_then(|c| c[1].parse::<i64>().ok())
                    .unwrap_or(0),
            ),
        }
    }
}

fn strict_decimal(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Renders a decimal in its shortest round-trip form, in positional
/// notation and always with a fractional part (`5.0`, `12.34`).
pub fn format_decimal(value: f64) -> String {
    let mut text = value.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}
