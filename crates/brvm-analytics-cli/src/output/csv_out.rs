use serde_json::Value;
use std::io;

use super::flatten;

/// Write output as CSV to stdout.
///
/// Row sets such as `forecasts` are written as a wide table when the result
/// is a single array; everything else becomes `field,value` rows with dotted
/// paths (`forecasts.0.revenue`).
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Array(rows) if rows.iter().all(Value::is_object) && !rows.is_empty() => {
            write_rows(&mut wtr, rows);
        }
        _ => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in flatten(result, false).fields {
                let _ = wtr.write_record([key.as_str(), val.as_str()]);
            }
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let headers: Vec<String> = flatten(&rows[0], false)
        .fields
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    let _ = wtr.write_record(&headers);

    for row in rows {
        let cells = flatten(row, false).fields;
        let line: Vec<String> = headers
            .iter()
            .map(|h| {
                cells
                    .iter()
                    .find(|(k, _)| k == h)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default()
            })
            .collect();
        let _ = wtr.write_record(&line);
    }
}
