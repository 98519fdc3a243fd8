//! Test fixtures and factory functions for creating feed data.

use serde_json::{json, Value};

/// One word entry as the export script writes it.
pub fn word(en: &str, cz: &str, rating: u8) -> Value {
    json!({
        "en": en,
        "cz": cz,
        "pron": "",
        "example": format!("Example with {}.", en),
        "meaning_en": "",
        "rating": rating,
    })
}

/// Generate a vocab list with ratings cycling through 1-5.
pub fn sample_vocab(num_words: usize) -> String {
    let words: Vec<Value> = (0..num_words)
        .map(|i| word(&format!("word{}", i + 1), &format!("slovo{}", i + 1), (i % 5) as u8 + 1))
        .collect();
    Value::Array(words).to_string()
}

/// A vocab list with the irregular values hand-edited data tends to have.
pub fn messy_vocab() -> String {
    json!([
        {"en": "cat", "cz": "kočka", "rating": "4"},
        {"en": "dog", "cz": "pes", "rating": 7},
        {"en": "owl", "cz": "sova", "rating": null},
        {"en": "", "cz": "nic", "rating": 3},
        {"en": "fox", "cz": "liška", "rating": 2.9}
    ])
    .to_string()
}

/// Create a latest.json body.
pub fn latest(version: &str, count: usize) -> String {
    json!({ "version": version, "count": count }).to_string()
}
