use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Group assigned to entries whose source row carries none.
pub const DEFAULT_GROUP: &str = "import";

/// One row as it came out of the source file, keyed by whatever column names it used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub data: HashMap<String, serde_json::Value>,
}

impl RawRecord {
    /// Builds a record from `(field, text)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let data = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), serde_json::Value::String(v.into())))
            .collect();
        Self { data }
    }
}

/// A normalized vocabulary entry. Field names on the wire are the short public schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    #[serde(rename = "ch")]
    pub character: String,
    #[serde(rename = "read")]
    pub reading: String,
    #[serde(rename = "mean")]
    pub meaning: String,
    pub group: String,
}

impl CanonicalRecord {
    /// A record is kept only with a character and at least one of reading/meaning.
    pub fn is_retained(&self) -> bool {
        !self.character.is_empty() && (!self.reading.is_empty() || !self.meaning.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDocument {
    pub key: String,
    pub items: Vec<CanonicalRecord>,
    pub generated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Spreadsheet,
    DelimitedText,
    Json,
}

impl SourceFormat {
    /// 依副檔名判斷格式；無法辨識的一律當成 JSON
    pub fn from_path(path: &str) -> Self {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("xlsx" | "xls" | "xlsm" | "xlsb" | "ods") => SourceFormat::Spreadsheet,
            Some("csv") => SourceFormat::DelimitedText,
            _ => SourceFormat::Json,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Spreadsheet => write!(f, "spreadsheet"),
            SourceFormat::DelimitedText => write!(f, "csv"),
            SourceFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub format: SourceFormat,
}

impl SourceFile {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let format = SourceFormat::from_path(&path);
        Self { path, format }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub items: Vec<CanonicalRecord>,
    pub dropped: usize,
}

/// How the writer decides whether the output changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDetection {
    /// Ignore `generatedAt` when comparing.
    #[default]
    Content,
    /// Compare the literal text, timestamp included.
    Full,
}

impl FromStr for ChangeDetection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "content" => Ok(ChangeDetection::Content),
            "full" => Ok(ChangeDetection::Full),
            other => Err(format!(
                "unknown change detection mode '{}' (expected 'content' or 'full')",
                other
            )),
        }
    }
}

impl fmt::Display for ChangeDetection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeDetection::Content => write!(f, "content"),
            ChangeDetection::Full => write!(f, "full"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Unchanged { path: String },
    Written { path: String, count: usize },
    DryRun { path: String, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    NoSource,
    NoItems { source: SourceFile },
    Loaded { source: SourceFile, outcome: LoadOutcome },
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::NoSource => write!(f, "No source file found; skipping."),
            RunOutcome::NoItems { .. } => write!(f, "No items parsed; skipping."),
            RunOutcome::Loaded { outcome, .. } => match outcome {
                LoadOutcome::Unchanged { .. } => write!(f, "No changes in JSON."),
                LoadOutcome::Written { path, count } => {
                    write!(f, "Wrote {} with {} items.", path, count)
                }
                LoadOutcome::DryRun { path, count } => {
                    write!(f, "Dry run: would write {} with {} items.", path, count)
                }
            },
        }
    }
}
