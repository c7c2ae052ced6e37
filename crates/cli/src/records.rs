//! Tabular record readers - CSV and JSON files into ordered records

use anyhow::{Context, Result};
use std::path::Path;
use textgraph_core::{Record, TableMapping};

/// Load a declared column mapping from a JSON file
pub fn load_mapping(path: &Path) -> Result<TableMapping> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read mapping file: {}", path.display()))?;
    let mapping: TableMapping = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse mapping file: {}", path.display()))?;
    Ok(mapping)
}

/// Read a CSV file into ordered records, one per row
pub fn read_csv(path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .context("CSV file has no header row")?
        .iter()
        .map(|h| h.trim().replace(' ', "_"))
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.context("Malformed CSV row")?;
        let columns = headers
            .iter()
            .zip(row.iter())
            .map(|(header, field)| (header.clone(), parse_field(field)))
            .collect();
        records.push(Record::new(columns));
    }

    Ok(records)
}

/// Read a JSON file (array of objects, or a single object) into records
pub fn read_json(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file: {}", path.display()))?;

    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::Object(map) => Ok(Record::new(map.into_iter().collect())),
                _ => anyhow::bail!("Expected an array of JSON objects"),
            })
            .collect(),
        serde_json::Value::Object(map) => Ok(vec![Record::new(map.into_iter().collect())]),
        _ => anyhow::bail!("Unsupported JSON structure"),
    }
}

/// Parse a CSV field into the richest JSON value it reads as. Empty fields
/// and the usual null spellings become null so the builder's coercion can
/// flag them.
fn parse_field(field: &str) -> serde_json::Value {
    let field = field.trim();

    if field.is_empty() || matches!(field, "null" | "NULL" | "nan" | "NaN") {
        return serde_json::Value::Null;
    }
    if let Ok(i) = field.parse::<i64>() {
        return serde_json::Value::from(i);
    }
    if let Ok(f) = field.parse::<f64>() {
        return serde_json::Value::from(f);
    }
    match field {
        "true" | "True" => return serde_json::Value::Bool(true),
        "false" | "False" => return serde_json::Value::Bool(false),
        _ => {}
    }

    serde_json::Value::String(field.to_string())
}
