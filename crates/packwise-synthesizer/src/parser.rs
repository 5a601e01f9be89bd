//! Parse model JSON into packing items

use crate::error::SynthesisError;
use packwise_domain::PackingItem;
use serde_json::Value;

/// Parse `{"packing_list": [{"item": .., "quantity": ..}, ..]}`
///
/// Every entry must be valid; a single bad entry fails the whole list.
pub fn parse_packing_list(json_str: &str) -> Result<Vec<PackingItem>, SynthesisError> {
    let json: Value = serde_json::from_str(json_str)?;

    let entries = json
        .get("packing_list")
        .ok_or_else(|| malformed("missing 'packing_list'"))?
        .as_array()
        .ok_or_else(|| malformed("'packing_list' is not an array"))?;

    if entries.is_empty() {
        return Err(malformed("'packing_list' is empty"));
    }

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| parse_item(entry).map_err(|e| malformed(format!("entry {}: {}", idx, e))))
        .collect()
}

/// Coerce a model-emitted quantity to a positive integer
///
/// Accepts JSON integers, integral floats (`3.0`) and strings holding an
/// integer (`"3"`, `" 3 "`). Zero, negatives and fractions are rejected.
pub fn coerce_quantity(value: &Value) -> Result<u32, String> {
    let n: u64 = match value {
        Value::Number(n) => {
            if let Some(n) = n.as_u64() {
                n
            } else {
                match n.as_f64() {
                    Some(f) if f >= 1.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => f as u64,
                    _ => return Err(format!("quantity {} is not a positive integer", n)),
                }
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("quantity {:?} is not a positive integer", s))?,
        other => return Err(format!("quantity has unsupported type: {}", other)),
    };

    match u32::try_from(n) {
        Ok(q) if q >= 1 => Ok(q),
        _ => Err(format!("quantity {} is out of range", n)),
    }
}

fn parse_item(entry: &Value) -> Result<PackingItem, String> {
    let obj = entry
        .as_object()
        .ok_or_else(|| "item is not a JSON object".to_string())?;

    let item = obj
        .get("item")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "missing or invalid 'item'".to_string())?;

    let quantity = obj
        .get("quantity")
        .ok_or_else(|| "missing 'quantity'".to_string())
        .and_then(coerce_quantity)?;

    PackingItem::new(item, quantity).ok_or_else(|| "invalid item".to_string())
}

fn malformed(msg: impl Into<String>) -> SynthesisError {
    SynthesisError::MalformedOutput(msg.into())
}
