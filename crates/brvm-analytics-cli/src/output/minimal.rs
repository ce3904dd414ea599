use serde_json::Value;

use super::scalar_text;

/// Headline answer of each command, in priority order.
const HEADLINE_POINTERS: [&str; 5] = [
    "/valuation/recommendation/tier",
    "/recommendation/tier",
    "/forecasts/0/revenue",
    "/net_margin",
    "/roe",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match headline(result_obj) {
        Some(line) => println!("{}", line),
        None => println!("{}", scalar_text(result_obj)),
    }
}

/// The first non-null headline field, else `key: value` for the first field
/// of an object result.
fn headline(result: &Value) -> Option<String> {
    let prioritised = HEADLINE_POINTERS
        .iter()
        .filter_map(|pointer| result.pointer(pointer))
        .find(|val| !val.is_null())
        .map(scalar_text);
    if prioritised.is_some() {
        return prioritised;
    }

    result
        .as_object()
        .and_then(|map| map.iter().next())
        .map(|(key, val)| format!("{}: {}", key, scalar_text(val)))
}
