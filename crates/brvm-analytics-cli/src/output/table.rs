use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::flatten;

/// Format output as tables: one for the result's scalar fields, one per row
/// set (forecasts, valuation methods, history), then warnings.
pub fn print_table(value: &Value) {
    let envelope = value.as_object();
    let result = envelope.and_then(|m| m.get("result")).unwrap_or(value);

    let flat = flatten(result, true);
    if !flat.fields.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in &flat.fields {
            builder.push_record([key.as_str(), val.as_str()]);
        }
        println!("{}", Table::from(builder));
    }

    for (name, rows) in &flat.tables {
        println!("\n{}:", name);
        print_rows(rows);
    }

    let Some(envelope) = envelope else { return };

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_rows(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    // Headers are the flattened keys of the first row
    let first = flatten(&rows[0], false);
    let headers: Vec<String> = first.fields.iter().map(|(k, _)| k.clone()).collect();

    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(String::as_str));
    for row in rows {
        let cells = flatten(row, false);
        let line: Vec<String> = headers
            .iter()
            .map(|h| {
                cells
                    .fields
                    .iter()
                    .find(|(k, _)| k == h)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default()
            })
            .collect();
        builder.push_record(line);
    }
    println!("{}", Table::from(builder));
}
