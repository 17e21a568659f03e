//! Translation selection for language-keyed values
//!
//! Markup dictionaries and page titles store text either as a plain string or
//! as an object keyed by language code:
//!
//! ```json
//! { "caption": { "en": "Photo", "de": "Foto" } }
//! ```
//!
//! [`select_translation`] picks the string for one language out of such a
//! value.

use serde_json::Value;

/// Pick the text for `lang` out of a raw dictionary value
///
/// Lookup order for language-keyed objects: `lang`, then `default_lang`, then
/// the first string entry in document order. A present but empty translation
/// is returned as the empty string; it does not trigger the fallback.
pub fn select_translation(value: &Value, lang: &str, default_lang: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(map) => map
            .get(lang)
            .and_then(scalar_text)
            .or_else(|| map.get(default_lang).and_then(scalar_text))
            .or_else(|| map.values().find_map(scalar_text))
            .unwrap_or_default(),
        Value::Null | Value::Array(_) => String::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
