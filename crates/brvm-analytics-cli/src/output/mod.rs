pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Result fields keyed by dotted path (`valuation.recommendation.tier`).
///
/// With `split_tables`, arrays of objects (forecasts, valuation methods) are
/// returned as separate row sets instead of being flattened with indices.
pub(crate) struct Flattened {
    pub fields: Vec<(String, String)>,
    pub tables: Vec<(String, Vec<Value>)>,
}

pub(crate) fn flatten(value: &Value, split_tables: bool) -> Flattened {
    let mut out = Flattened {
        fields: Vec::new(),
        tables: Vec::new(),
    };
    walk("", value, split_tables, &mut out);
    out
}

fn walk(prefix: &str, value: &Value, split_tables: bool, out: &mut Flattened) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        }
    };

    match value {
        Value::Object(map) => {
            for (key, val) in map {
                walk(&join(key), val, split_tables, out);
            }
        }
        Value::Array(items) if items.iter().any(Value::is_object) => {
            if split_tables {
                out.tables.push((prefix.to_string(), items.clone()));
            } else {
                for (i, item) in items.iter().enumerate() {
                    walk(&join(&i.to_string()), item, split_tables, out);
                }
            }
        }
        _ => out.fields.push((prefix.to_string(), scalar_text(value))),
    }
}

/// Render a leaf value; scalar arrays are joined with ", ".
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(scalar_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_paths() {
        let value = json!({
            "valuation": { "recommendation": { "tier": "BUY" } },
            "warnings": ["a", "b"]
        });
        let flat = flatten(&value, true);
        assert_eq!(
            flat.fields,
            vec![
                ("valuation.recommendation.tier".to_string(), "BUY".to_string()),
                ("warnings".to_string(), "a, b".to_string()),
            ]
        );
        assert!(flat.tables.is_empty());
    }

    #[test]
    fn test_object_arrays_split_or_indexed() {
        let value = json!({ "forecasts": [{ "year": 2024 }, { "year": 2025 }] });

        let split = flatten(&value, true);
        assert!(split.fields.is_empty());
        assert_eq!(split.tables[0].0, "forecasts");
        assert_eq!(split.tables[0].1.len(), 2);

        let indexed = flatten(&value, false);
        assert_eq!(indexed.fields[1], ("forecasts.1.year".to_string(), "2025".to_string()));
    }
}
