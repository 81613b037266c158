// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory upgrade of format 2 and 3 documents to format 4.
//!
//! Older documents nest their cells under `worksheets` and use different
//! field names for code cells and outputs. Only the layout changes; cell
//! sources are carried over verbatim.

use serde_json::{Map, Value};

/// Oldest structural version that can be upgraded.
pub const OLDEST_UPGRADABLE: u64 = 2;

/// Minor version written on upgraded documents.
const UPGRADED_MINOR: u64 = 4;

/// Output keys of format 3 mime bundles and their format 4 mime types.
const MIME_KEYS: &[(&str, &str)] = &[
    ("text", "text/plain"),
    ("html", "text/html"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("jpeg", "image/jpeg"),
    ("latex", "text/latex"),
    ("javascript", "application/javascript"),
    ("json", "application/json"),
    ("pdf", "application/pdf"),
];

/// Rewrite a format 2 or 3 document as format 4.
pub fn to_v4(doc: &mut Map<String, Value>, from: u64) {
    let cells: Vec<Value> = match doc.remove("worksheets") {
        Some(Value::Array(worksheets)) => worksheets
            .into_iter()
            .filter_map(|mut ws| match ws.get_mut("cells").map(Value::take) {
                Some(Value::Array(cells)) => Some(cells),
                _ => None,
            })
            .flatten()
            .map(upgrade_cell)
            .collect(),
        _ => Vec::new(),
    };

    let metadata = doc
        .entry("metadata")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(metadata) = metadata {
        metadata.remove("name");
        metadata.remove("signature");
        metadata.insert("orig_nbformat".to_string(), Value::from(from));
    }

    doc.insert("nbformat".to_string(), Value::from(4));
    doc.insert("nbformat_minor".to_string(), Value::from(UPGRADED_MINOR));
    doc.insert("cells".to_string(), Value::Array(cells));
}

fn upgrade_cell(cell: Value) -> Value {
    let Value::Object(mut cell) = cell else {
        return cell;
    };

    let mut metadata = match cell.remove("metadata") {
        Some(Value::Object(metadata)) => metadata,
        _ => Map::new(),
    };

    match cell.get("cell_type").and_then(Value::as_str) {
        Some("code") => {
            cell.remove("language");
            let source = cell.remove("input").unwrap_or_else(|| Value::from(""));
            cell.insert("source".to_string(), source);

            let count = cell.remove("prompt_number").unwrap_or(Value::Null);
            cell.insert("execution_count".to_string(), count);

            if let Some(collapsed) = cell.remove("collapsed") {
                metadata.insert("collapsed".to_string(), collapsed);
            }

            let outputs = match cell.remove("outputs") {
                Some(Value::Array(outputs)) => outputs.into_iter().map(upgrade_output).collect(),
                _ => Vec::new(),
            };
            cell.insert("outputs".to_string(), Value::Array(outputs));
        }
        Some("heading") => {
            let level = cell
                .remove("level")
                .and_then(|level| level.as_u64())
                .unwrap_or(1)
                .clamp(1, 6) as usize;
            let source = joined_source(cell.remove("source"));
            cell.insert("cell_type".to_string(), Value::from("markdown"));
            cell.insert(
                "source".to_string(),
                Value::from(format!("{} {}", "#".repeat(level), source)),
            );
        }
        Some("html") => {
            cell.insert("cell_type".to_string(), Value::from("markdown"));
        }
        _ => {}
    }

    cell.entry("source").or_insert_with(|| Value::from(""));
    cell.insert("metadata".to_string(), Value::Object(metadata));
    Value::Object(cell)
}

fn upgrade_output(output: Value) -> Value {
    let Value::Object(mut output) = output else {
        return output;
    };

    match output.get("output_type").and_then(Value::as_str) {
        Some("pyout") => {
            output.insert("output_type".to_string(), Value::from("execute_result"));
            let count = output.remove("prompt_number").unwrap_or(Value::Null);
            output.insert("execution_count".to_string(), count);
            move_mime_bundle(&mut output);
        }
        Some("display_data") => move_mime_bundle(&mut output),
        Some("pyerr") => {
            output.insert("output_type".to_string(), Value::from("error"));
        }
        Some("stream") => {
            let name = output
                .remove("stream")
                .unwrap_or_else(|| Value::from("stdout"));
            output.insert("name".to_string(), name);
        }
        _ => {}
    }

    Value::Object(output)
}

fn move_mime_bundle(output: &mut Map<String, Value>) {
    let mut data = Map::new();
    for (key, mime) in MIME_KEYS {
        if let Some(value) = output.remove(*key) {
            data.insert((*mime).to_string(), value);
        }
    }
    output.insert("data".to_string(), Value::Object(data));
    output
        .entry("metadata")
        .or_insert_with(|| Value::Object(Map::new()));
}

fn joined_source(source: Option<Value>) -> String {
    match source {
        Some(Value::String(text)) => text,
        Some(Value::Array(lines)) => lines.iter().filter_map(Value::as_str).collect(),
        _ => String::new(),
    }
}

#[cfg(test)]
#[path = "upgrade_tests.rs"]
mod tests;
