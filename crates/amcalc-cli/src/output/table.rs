use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{row_array, scalar_text};

/// Format output as tables using the tabled crate.
///
/// Scalar fields are shown as a Field/Value table; nested objects such as the
/// loan summary are flattened with dotted names, and row arrays such as the
/// schedule get a table of their own.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_report(result, map),
            _ => print_object(map),
        },
        Value::Array(rows) => print_rows(rows),
        _ => println!("{}", value),
    }
}

fn print_report(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    print_object(result);

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    push_fields(&mut builder, "", map);
    println!("{}", Table::from(builder));

    if let Some((key, rows)) = row_array(map) {
        println!("\n{} ({} rows)", key, rows.len());
        print_rows(rows);
    }
}

fn push_fields(builder: &mut Builder, prefix: &str, map: &Map<String, Value>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(nested) => push_fields(builder, &name, nested),
            Value::Array(items) if matches!(items.first(), Some(Value::Object(_))) => {}
            Value::Array(items) => {
                let joined: Vec<String> = items.iter().map(scalar_text).collect();
                builder.push_record([name, joined.join(", ")]);
            }
            other => builder.push_record([name, scalar_text(other)]),
        }
    }
}

fn print_rows(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = rows.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for row in rows.iter().filter_map(Value::as_object) {
            let cells: Vec<String> = headers
                .iter()
                .map(|h| row.get(h.as_str()).map(scalar_text).unwrap_or_default())
                .collect();
            builder.push_record(cells);
        }

        println!("{}", Table::from(builder));
    } else {
        for item in rows {
            println!("{}", scalar_text(item));
        }
    }
}
