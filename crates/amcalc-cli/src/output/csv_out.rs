use serde_json::{Map, Value};
use std::io;

use super::{row_array, scalar_text};

/// Write output as CSV to stdout.
///
/// A result carrying a schedule is exported row by row; anything else is
/// written as two-column field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let _ = write_csv(&mut wtr, value);
    let _ = wtr.flush();
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    match value {
        Value::Object(map) => {
            let target = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            match row_array(target) {
                Some((_, rows)) => write_rows(wtr, rows),
                None => write_fields(wtr, target),
            }
        }
        Value::Array(rows) => write_rows(wtr, rows),
        other => wtr.write_record([scalar_text(other)]),
    }
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.as_str(), &scalar_text(val)])?;
    }
    Ok(())
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            wtr.write_record([scalar_text(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&headers)?;

    for row in rows.iter().filter_map(Value::as_object) {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(scalar_text).unwrap_or_default())
            .collect();
        wtr.write_record(&cells)?;
    }
    Ok(())
}
