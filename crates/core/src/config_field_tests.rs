// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn field(key: &str, ty: ConfigFieldType, required: bool, default: Option<&str>) -> ManifestConfigField {
    ManifestConfigField {
        key: key.to_string(),
        field_type: ty,
        required,
        default: default.map(str::to_string),
    }
}

fn sample_manifest() -> Vec<ManifestConfigField> {
    vec![
        field("PORT", ConfigFieldType::Number, true, None),
        field("ENABLE_CACHE", ConfigFieldType::Toggle, false, Some("false")),
        field("NAME", ConfigFieldType::Text, false, None),
    ]
}

#[test]
fn field_type_parses_closed_set() {
    for s in [
        "text", "password", "number", "toggle", "email", "textarea", "select", "checkbox",
        "radio", "date", "range", "color",
    ] {
        assert!(ConfigFieldType::parse(s).is_ok(), "{s} should parse");
    }
    assert!(ConfigFieldType::parse("bogus").is_err());
}

#[test]
fn unknown_keys_are_dropped() {
    let manifest = sample_manifest();
    let mut raw = HashMap::new();
    raw.insert("PORT".to_string(), json!(22555));
    raw.insert("UNKNOWN".to_string(), json!("x"));
    let out = normalize(&manifest, &raw).unwrap();
    assert_eq!(out.get("PORT").map(String::as_str), Some("22555"));
    assert!(!out.contains_key("UNKNOWN"));
}

#[test]
fn toggle_accepts_case_insensitive_spellings() {
    let manifest = vec![field("X", ConfigFieldType::Toggle, false, None)];
    for (input, expected) in [
        ("true", "true"),
        ("TRUE", "true"),
        ("1", "true"),
        ("yes", "true"),
        ("On", "true"),
        ("false", "false"),
        ("0", "false"),
        ("no", "false"),
        ("OFF", "false"),
    ] {
        let mut raw = HashMap::new();
        raw.insert("X".to_string(), json!(input));
        let out = normalize(&manifest, &raw).unwrap();
        assert_eq!(out["X"], expected, "input {input}");
    }
}

#[test]
fn toggle_rejects_unrecognized_spelling() {
    let manifest = vec![field("X", ConfigFieldType::Toggle, false, None)];
    let mut raw = HashMap::new();
    raw.insert("X".to_string(), json!("maybe"));
    assert!(normalize(&manifest, &raw).is_err());
}

#[test]
fn number_rejects_non_numeric_string() {
    let manifest = sample_manifest();
    let mut raw = HashMap::new();
    raw.insert("PORT".to_string(), json!("not-a-number"));
    assert!(normalize(&manifest, &raw).is_err());
}

#[test]
fn number_accepts_json_number_and_numeric_string() {
    let manifest = sample_manifest();

    let mut raw = HashMap::new();
    raw.insert("PORT".to_string(), json!(22555));
    assert_eq!(normalize(&manifest, &raw).unwrap()["PORT"], "22555");

    let mut raw = HashMap::new();
    raw.insert("PORT".to_string(), json!("22555"));
    assert_eq!(normalize(&manifest, &raw).unwrap()["PORT"], "22555");
}

#[test]
fn text_family_is_verbatim() {
    let manifest = sample_manifest();
    let mut raw = HashMap::new();
    raw.insert("NAME".to_string(), json!("My Pup"));
    assert_eq!(normalize(&manifest, &raw).unwrap()["NAME"], "My Pup");
}

#[test]
fn normalize_is_idempotent_under_stringify_reapply() {
    // Property 8: Normalize(cfg, Stringify(Normalize(cfg, x))) == Normalize(cfg, x)
    let manifest = sample_manifest();
    let mut raw = HashMap::new();
    raw.insert("PORT".to_string(), json!(22555.0));
    raw.insert("ENABLE_CACHE".to_string(), json!("YES"));
    raw.insert("NAME".to_string(), json!("pup"));

    let once = normalize(&manifest, &raw).unwrap();
    let restringified: HashMap<String, Value> = once
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    let twice = normalize(&manifest, &restringified).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn extract_defaults_skips_fields_without_one() {
    let manifest = sample_manifest();
    let defaults = extract_defaults(&manifest);
    assert_eq!(defaults.get("ENABLE_CACHE").map(String::as_str), Some("false"));
    assert!(!defaults.contains_key("PORT"));
    assert!(!defaults.contains_key("NAME"));
}

#[test]
fn needs_values_true_when_required_field_missing_or_blank() {
    let manifest = sample_manifest();
    assert!(needs_values(&manifest, &HashMap::new()));

    let mut values = HashMap::new();
    values.insert("PORT".to_string(), "   ".to_string());
    assert!(needs_values(&manifest, &values));

    let mut values = HashMap::new();
    values.insert("PORT".to_string(), "22555".to_string());
    assert!(!needs_values(&manifest, &values));
}
