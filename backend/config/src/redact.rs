//! Config redaction: safe-to-share config snapshots with secrets masked.

use serde_json::Value;

use crate::schema::TelefaxConfig;

static SECRET_KEYS: &[&str] = &["botToken", "bot_token", "token", "secret", "password"];

/// Serialize the config with every secret field replaced by a `"1234***"` hint.
pub fn redact(config: &TelefaxConfig) -> Value {
    let value = serde_json::to_value(config).unwrap_or(Value::Null);
    redact_value(&value)
}

/// Redact an arbitrary JSON tree.
pub fn redact_value(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_sensitive_key(key) && !s.is_empty() => {
            // The numeric bot id before `:` is not secret; show a short prefix of it.
            let hint = if s.chars().count() > 8 {
                format!("{}***", s.chars().take(4).collect::<String>())
            } else {
                "***".to_string()
            };
            Value::String(hint)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}
