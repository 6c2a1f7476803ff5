//! Amount Decoder
//!
//! Solscan reports token movements as raw integer amounts plus the token's
//! decimals. The engine works with decimal (UI) amounts.

use serde_json::Value;

/// Scale a raw integer amount by `decimals`
pub fn to_ui_amount(raw: u128, decimals: u8) -> f64 {
    raw as f64 / 10f64.powi(decimals as i32)
}

/// Parse a raw amount that may arrive as a JSON number or a numeric string
pub fn parse_raw_amount(value: &Value) -> Option<u128> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u128)),
        Value::String(s) => s.trim().parse::<u128>().ok(),
        _ => None,
    }
}

/// Decode an optional raw amount with optional decimals into a UI amount.
///
/// Missing amount yields `None`; missing decimals are treated as 0.
pub fn decode_amount(raw: Option<&Value>, decimals: Option<u8>) -> Option<f64> {
    let raw = parse_raw_amount(raw?)?;
    Some(to_ui_amount(raw, decimals.unwrap_or(0)))
}
