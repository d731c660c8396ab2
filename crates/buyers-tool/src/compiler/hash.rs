use serde_json::Value;

use super::domain::BuyerInput;

const FNV32_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a. Used for dedup and log correlation only; not collision resistant.
pub fn fnv1a32(bytes: &[u8]) -> u32 {
    let mut hash = FNV32_OFFSET_BASIS;
    for byte in bytes {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(FNV32_PRIME);
    }
    hash
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|left, right| left.0.cmp(&right.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// JSON rendering of the input with object keys sorted at every level.
pub fn canonical_json(input: &BuyerInput) -> String {
    // Sorted explicitly so the hash survives `serde_json/preserve_order` being enabled.
    match serde_json::to_value(input) {
        Ok(value) => sort_keys(value).to_string(),
        Err(_) => format!("{input:?}"),
    }
}

pub fn input_hash(input: &BuyerInput) -> String {
    format!("{:08x}", fnv1a32(canonical_json(input).as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a32_matches_reference_vectors() {
        assert_eq!(fnv1a32(b""), 0x811c_9dc5);
        assert_eq!(fnv1a32(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a32(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn canonical_json_sorts_nested_keys() {
        let value = serde_json::json!({ "b": { "z": 1, "a": [{ "y": 2, "x": 3 }] }, "a": 0 });
        assert_eq!(
            sort_keys(value).to_string(),
            r#"{"a":0,"b":{"a":[{"x":3,"y":2}],"z":1}}"#
        );
    }
}
