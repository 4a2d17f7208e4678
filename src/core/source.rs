use crate::core::{SourceFile, Storage};

/// Default candidates, highest priority first.
pub const DEFAULT_SOURCES: [&str; 4] = [
    "codefree/1000ja.xlsx",
    "codefree/1000ja.xls",
    "codefree/1000ja.csv",
    "codefree/thousandChars_v1.json",
];

/// Extensions a source candidate may carry.
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["xlsx", "xls", "xlsm", "xlsb", "ods", "csv", "json"];

pub fn default_sources() -> Vec<String> {
    DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect()
}

/// Returns the first candidate that exists in `storage`.
pub fn select_source<S: Storage + ?Sized>(storage: &S, candidates: &[String]) -> Option<SourceFile> {
    candidates
        .iter()
        .inspect(|candidate| tracing::debug!("Checking source candidate: {}", candidate))
        .find(|candidate| storage.exists(candidate))
        .map(|path| SourceFile::new(path.clone()))
}
