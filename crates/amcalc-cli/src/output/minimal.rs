use serde_json::Value;

use super::scalar_text;

/// Key answers, in the order they are looked for.
const PRIORITY_KEYS: [&str; 4] = ["paymentAmount", "valid", "totalPayments", "totalInterest"];

/// Print just the headline value of the output: the periodic payment for a
/// calculation, the verdict for a validation, the final balance for a schedule.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Object(map) => {
            for key in PRIORITY_KEYS {
                if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                    println!("{}", scalar_text(val));
                    return;
                }
            }
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, scalar_text(val));
            }
        }
        Value::Array(rows) => match rows.last().and_then(|r| r.get("remainingBalance")) {
            Some(balance) => println!("{}", scalar_text(balance)),
            None => println!("{} rows", rows.len()),
        },
        other => println!("{}", scalar_text(other)),
    }
}
