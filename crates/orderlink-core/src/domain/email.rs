use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Matching key for email addresses: trimmed and lowercased, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedEmail(String);

impl NormalizedEmail {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn normalize_email(value: &str) -> Option<NormalizedEmail> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(NormalizedEmail(trimmed.to_lowercase()))
}

/// Reads an email out of a raw field value. Falsy values (`null`, `false`,
/// `0`, `""`) carry no email; other scalars are coerced to their text form.
/// A whitespace-only string is no email either, so blank rows never share a key.
pub fn email_from_value(value: &Value) -> Option<NormalizedEmail> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => normalize_email("true"),
        Value::Number(number) => {
            if number.as_f64() == Some(0.0) {
                return None;
            }
            normalize_email(&number.to_string())
        }
        Value::String(text) => normalize_email(text),
        Value::Array(_) | Value::Object(_) => normalize_email(&value.to_string()),
    }
}
