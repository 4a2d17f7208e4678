use crate::core::{RawRecord, SourceFormat};
use crate::utils::error::Result;
use serde_json::Value;
use std::collections::HashMap;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Columns picked up when a sheet has no usable header row.
const POSITIONAL_COLUMNS: usize = 4;

/// Turns the raw bytes of a source file into records, dispatching on format.
pub fn read_records(format: SourceFormat, bytes: &[u8]) -> Result<Vec<RawRecord>> {
    match format {
        SourceFormat::Spreadsheet => read_spreadsheet(bytes),
        SourceFormat::DelimitedText => read_delimited(bytes),
        SourceFormat::Json => read_json(bytes),
    }
}

#[cfg(feature = "xlsx")]
pub fn read_spreadsheet(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    use calamine::{open_workbook_auto_from_rs, Reader};

    let mut workbook = open_workbook_auto_from_rs(std::io::Cursor::new(bytes.to_vec()))?;

    // 只讀第一個工作表
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => {
            tracing::warn!("Workbook contains no sheets");
            return Ok(Vec::new());
        }
    };

    tracing::debug!("First sheet spans {:?}", range.get_size());

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(rows_to_records(rows))
}

#[cfg(not(feature = "xlsx"))]
pub fn read_spreadsheet(_bytes: &[u8]) -> Result<Vec<RawRecord>> {
    Err(crate::utils::error::EtlError::DependencyUnavailable {
        capability: "spreadsheet parsing (xlsx feature)".to_string(),
    })
}

#[cfg(feature = "xlsx")]
fn cell_text(cell: &calamine::Data) -> String {
    use calamine::Data;

    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        // f64 的 Display 會把 3.0 印成 "3"
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

pub fn read_delimited(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    tracing::debug!("Parsed {} CSV rows", rows.len());
    Ok(rows_to_records(rows))
}

pub fn read_json(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let document: Value = serde_json::from_slice(bytes)?;

    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut obj) => {
            // `items` 有實際內容時優先，否則才看 `data`
            let wrapped = match obj.remove("items") {
                Some(items) if is_truthy(&items) => Some(items),
                _ => obj.remove("data").filter(is_truthy),
            };
            match wrapped {
                Some(Value::Array(items)) => items,
                _ => {
                    tracing::warn!("JSON object has no `items` or `data` array");
                    Vec::new()
                }
            }
        }
        _ => {
            tracing::warn!("JSON document is neither an array nor an object");
            Vec::new()
        }
    };

    Ok(items.into_iter().map(json_item_to_record).collect())
}

/// null, false, 0 and "" are treated as absent wrappers.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_item_to_record(item: Value) -> RawRecord {
    match item {
        Value::Object(obj) => RawRecord {
            data: obj.into_iter().collect(),
        },
        // 陣列元素視為位置欄位 0..3
        Value::Array(values) => RawRecord {
            data: values
                .into_iter()
                .take(POSITIONAL_COLUMNS)
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
        },
        _ => RawRecord::default(),
    }
}

/// Shared by the spreadsheet and CSV readers: header-keyed rows, or positional
/// columns when the header yields nothing.
pub(crate) fn rows_to_records(rows: Vec<Vec<String>>) -> Vec<RawRecord> {
    let keyed = keyed_records(&rows);
    if !keyed.is_empty() {
        return keyed;
    }

    if !rows.is_empty() {
        tracing::debug!("No header-keyed rows, falling back to positional columns");
    }
    rows.iter().map(|row| positional_record(row)).collect()
}

fn keyed_records(rows: &[Vec<String>]) -> Vec<RawRecord> {
    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };

    let columns: Vec<(usize, &str)> = header
        .iter()
        .enumerate()
        .map(|(i, name)| (i, name.trim()))
        .filter(|(_, name)| !name.is_empty())
        .collect();

    if columns.is_empty() {
        return Vec::new();
    }

    body.iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| {
            let mut data = HashMap::with_capacity(columns.len());
            for (i, name) in &columns {
                let value = row.get(*i).cloned().unwrap_or_default();
                // 重複的欄名以第一個為準
                data.entry(name.to_string())
                    .or_insert(Value::String(value));
            }
            RawRecord { data }
        })
        .collect()
}

fn positional_record(row: &[String]) -> RawRecord {
    let data = (0..POSITIONAL_COLUMNS)
        .map(|i| {
            let value = row.get(i).cloned().unwrap_or_default();
            (i.to_string(), Value::String(value))
        })
        .collect();
    RawRecord { data }
}
