use crate::core::{CanonicalRecord, ChangeDetection, LoadOutcome, OutputDocument, Storage};
use crate::utils::error::Result;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};

pub const GENERATED_AT_FIELD: &str = "generatedAt";

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
pub fn generated_at_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn build_document(
    key: &str,
    items: Vec<CanonicalRecord>,
    generated_at: String,
) -> OutputDocument {
    OutputDocument {
        key: key.to_string(),
        items,
        generated_at,
    }
}

/// 2-space indented JSON, no trailing newline.
pub fn render(document: &OutputDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash used for change detection. In `Content` mode a JSON object is compared
/// without its `generatedAt` field; anything else is hashed verbatim.
pub fn fingerprint(text: &str, mode: ChangeDetection) -> String {
    if mode == ChangeDetection::Full {
        return content_hash(text);
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(mut obj)) => {
            obj.remove(GENERATED_AT_FIELD);
            content_hash(&Value::Object(obj).to_string())
        }
        _ => content_hash(text),
    }
}

/// Writes `document` to `path` unless the stored file already has the same fingerprint.
pub fn write_if_changed<S: Storage + ?Sized>(
    storage: &S,
    path: &str,
    document: &OutputDocument,
    mode: ChangeDetection,
    dry_run: bool,
) -> Result<LoadOutcome> {
    let next = render(document)?;

    let prev = if storage.exists(path) {
        String::from_utf8_lossy(&storage.read_file(path)?).into_owned()
    } else {
        String::new()
    };

    let next_hash = fingerprint(&next, mode);
    let prev_hash = fingerprint(&prev, mode);
    tracing::debug!(
        "Change detection ({}): previous {} / next {}",
        mode,
        &prev_hash[..12],
        &next_hash[..12]
    );

    if prev_hash == next_hash {
        return Ok(LoadOutcome::Unchanged {
            path: path.to_string(),
        });
    }

    let count = document.items.len();
    if dry_run {
        tracing::info!("🔍 Dry run, leaving {} untouched", path);
        return Ok(LoadOutcome::DryRun {
            path: path.to_string(),
            count,
        });
    }

    storage.write_file(path, next.as_bytes())?;
    tracing::debug!("Wrote {} bytes to {}", next.len(), path);

    Ok(LoadOutcome::Written {
        path: path.to_string(),
        count,
    })
}
