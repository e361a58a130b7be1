// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure config-value coercion shared by `SetConfig` in the inline
//! `UpdatePupConfig` handler.
//!
//! None of this touches I/O: given a manifest's declared config fields
//! and a raw payload, it produces the canonical string map the pup
//! manager persists, or rejects the payload outright.

use crate::CoreError;
use serde_json::Value;
use std::collections::HashMap;

/// The closed set of config field types a pup manifest may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigFieldType {
    Text,
    Password,
    Number,
    Toggle,
    Email,
    Textarea,
    Select,
    Checkbox,
    Radio,
    Date,
    Range,
    Color,
}

impl ConfigFieldType {
    /// Parse a manifest-declared field type name. The field-type set is
    /// closed; anything else is an error rather than a silently-ignored
    /// field.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Ok(match s {
            "text" => ConfigFieldType::Text,
            "password" => ConfigFieldType::Password,
            "number" => ConfigFieldType::Number,
            "toggle" => ConfigFieldType::Toggle,
            "email" => ConfigFieldType::Email,
            "textarea" => ConfigFieldType::Textarea,
            "select" => ConfigFieldType::Select,
            "checkbox" => ConfigFieldType::Checkbox,
            "radio" => ConfigFieldType::Radio,
            "date" => ConfigFieldType::Date,
            "range" => ConfigFieldType::Range,
            "color" => ConfigFieldType::Color,
            other => {
                return Err(CoreError::InvalidConfig(format!(
                    "unsupported config field type {other:?}"
                )))
            }
        })
    }

    /// Toggle-shaped fields normalize to the literal strings `"true"`/`"false"`.
    fn is_boolean(self) -> bool {
        matches!(self, ConfigFieldType::Toggle | ConfigFieldType::Checkbox)
    }

    /// Number-shaped fields normalize to a canonical decimal string.
    fn is_numeric(self) -> bool {
        matches!(self, ConfigFieldType::Number | ConfigFieldType::Range)
    }
}

/// One config field as declared in a pup manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestConfigField {
    pub key: String,
    pub field_type: ConfigFieldType,
    pub required: bool,
    pub default: Option<String>,
}

fn value_to_raw_string(key: &str, value: &Value) -> Result<String, CoreError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(CoreError::InvalidConfig(format!(
            "field {key}: unsupported value shape {other}"
        ))),
    }
}

fn coerce_bool(key: &str, raw: &str) -> Result<&'static str, CoreError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok("true"),
        "false" | "0" | "no" | "off" => Ok("false"),
        other => Err(CoreError::InvalidConfig(format!(
            "field {key}: unrecognized boolean {other:?}"
        ))),
    }
}

fn coerce_number(key: &str, raw: &str) -> Result<String, CoreError> {
    let parsed: f64 = raw.trim().parse().map_err(|_| {
        CoreError::InvalidConfig(format!("field {key}: {raw:?} is not a valid number"))
    })?;
    if !parsed.is_finite() {
        return Err(CoreError::InvalidConfig(format!(
            "field {key}: {raw:?} is not a finite number"
        )));
    }
    // A plain `{}` format is deterministic for a given f64 and is its
    // own fixed point under reparse-then-reformat, which is what the
    // round-trip property requires.
    Ok(format!("{parsed}"))
}

fn coerce_one(field: &ManifestConfigField, value: &Value) -> Result<String, CoreError> {
    let raw = value_to_raw_string(&field.key, value)?;
    if field.field_type.is_boolean() {
        return coerce_bool(&field.key, &raw).map(str::to_string);
    }
    if field.field_type.is_numeric() {
        return coerce_number(&field.key, &raw);
    }
    // text, password, email, textarea, select, checkbox... wait: checkbox
    // handled above as boolean. radio, date, color: verbatim.
    Ok(raw)
}

/// Normalize a raw payload against a manifest's declared config fields.
///
/// Unknown keys (not present in `manifest_config`) are silently dropped.
/// Rejects a value that fails numeric parse for `number`/`range`, or an
/// unrecognized boolean spelling for `toggle`/`checkbox`.
pub fn normalize(
    manifest_config: &[ManifestConfigField],
    raw: &HashMap<String, Value>,
) -> Result<HashMap<String, String>, CoreError> {
    let mut out = HashMap::new();
    for field in manifest_config {
        if let Some(value) = raw.get(&field.key) {
            out.insert(field.key.clone(), coerce_one(field, value)?);
        }
    }
    Ok(out)
}

/// Run the same normalization over each field's declared `default`,
/// skipping fields that have none.
pub fn extract_defaults(
    manifest_config: &[ManifestConfigField],
) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for field in manifest_config {
        let Some(default) = &field.default else {
            continue;
        };
        // Defaults are already-authored strings from the manifest; run
        // them through the same coercion so a malformed default never
        // reaches the pup as a different value than what SetConfig would
        // have produced for the equivalent user input. A default that
        // fails to coerce is treated as absent rather than panicking the
        // manifest loader.
        if let Ok(value) = coerce_one(field, &Value::String(default.clone())) {
            out.insert(field.key.clone(), value);
        }
    }
    out
}

/// True iff any required field is absent or whitespace-only in `values`.
pub fn needs_values(manifest_config: &[ManifestConfigField], values: &HashMap<String, String>) -> bool {
    manifest_config.iter().any(|field| {
        field.required
            && values
                .get(&field.key)
                .map(|v| v.trim().is_empty())
                .unwrap_or(true)
    })
}

#[cfg(test)]
#[path = "config_field_tests.rs"]
mod tests;
