use serde_json::Value;

use crate::error::DecodeError;

/// Walks a dotted path (`"object_attributes.url"`) through nested JSON objects.
pub fn lookup<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(raw, |value, key| value.get(key))
        .filter(|value| !value.is_null())
}

pub fn required_str(raw: &Value, path: &str) -> Result<String, DecodeError> {
    match lookup(raw, path) {
        None => Err(DecodeError::MissingField(path.to_string())),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(DecodeError::InvalidField {
            path: path.to_string(),
            expected: "a string",
        }),
    }
}

pub fn optional_str<'a>(raw: &'a Value, path: &str) -> Option<&'a str> {
    lookup(raw, path).and_then(Value::as_str)
}

pub fn required_u64(raw: &Value, path: &str) -> Result<u64, DecodeError> {
    match lookup(raw, path) {
        None => Err(DecodeError::MissingField(path.to_string())),
        Some(value) => value.as_u64().ok_or_else(|| DecodeError::InvalidField {
            path: path.to_string(),
            expected: "a non-negative integer",
        }),
    }
}

/// Usernames are the identity we look up on the chat side, so they must be usable as a path
/// segment there.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username cannot be empty".to_string());
    }

    if username.len() > 255 {
        return Err("Username too long (maximum 255 characters)".to_string());
    }

    let valid_chars = username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.');

    if !valid_chars {
        return Err("Username contains invalid characters".to_string());
    }

    Ok(())
}
