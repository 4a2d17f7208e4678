//! Alias resolution from heterogeneous column names to [`CanonicalRecord`].
//!
//! Each canonical field has an ordered list of candidate keys covering the
//! English and Korean header conventions seen in exported sheets, ending with
//! the positional key used when a sheet has no header row. The first key whose
//! value is non-empty after trimming wins.

use crate::core::{CanonicalRecord, RawRecord};
use crate::domain::model::DEFAULT_GROUP;
use serde_json::Value;

pub const CHARACTER_ALIASES: &[&str] = &[
    "ch", "char", "hanja", "한자", "자", "character", "Character", "0",
];

pub const READING_ALIASES: &[&str] = &[
    "read", "kor", "ko", "음", "독음", "음/훈", "훈음", "reading", "Reading", "1",
];

pub const MEANING_ALIASES: &[&str] = &[
    "mean", "desc", "뜻", "설명", "훈", "의미", "meaning", "Meaning", "2",
];

pub const GROUP_ALIASES: &[&str] = &["group", "grp", "묶음", "그룹", "Group", "3"];

/// First non-empty trimmed value among `aliases`, or an empty string.
pub fn resolve(record: &RawRecord, aliases: &[&str]) -> String {
    aliases
        .iter()
        .filter_map(|key| record.data.get(*key))
        .filter_map(scalar_text)
        .map(|text| text.trim().to_string())
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// Text form of a scalar value. Null, arrays and objects count as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        // 1.0 要印成 "1"，和試算表的數字儲存格一致
        Value::Number(n) if n.is_f64() => n.as_f64().map(|f| f.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

pub fn normalize(record: &RawRecord) -> CanonicalRecord {
    let group = resolve(record, GROUP_ALIASES);

    CanonicalRecord {
        character: resolve(record, CHARACTER_ALIASES),
        reading: resolve(record, READING_ALIASES),
        meaning: resolve(record, MEANING_ALIASES),
        group: if group.is_empty() {
            DEFAULT_GROUP.to_string()
        } else {
            group
        },
    }
}

/// Normalizes every record and drops the ones that fail [`CanonicalRecord::is_retained`].
/// Source order is kept. Returns the retained items and the number dropped.
pub fn normalize_all(records: &[RawRecord]) -> (Vec<CanonicalRecord>, usize) {
    let items: Vec<CanonicalRecord> = records
        .iter()
        .map(normalize)
        .filter(CanonicalRecord::is_retained)
        .collect();

    let dropped = records.len() - items.len();
    (items, dropped)
}
