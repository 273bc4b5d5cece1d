use serde_json::Value;
use std::io;

use super::{format_scalar, schedule_rows};

/// Write output as CSV to stdout.
///
/// A schedule run writes its month rows, a refinance run its plan summary,
/// and anything else a two-column field/value listing of scalar results.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.get("result").unwrap_or(value);
    if let Some(rows) = result.get("schedule").and_then(schedule_rows) {
        write_rows(&mut wtr, rows);
    } else if let Some(Value::Array(summary)) = result.get("summary") {
        write_rows(&mut wtr, summary);
    } else if let Value::Object(map) = result {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map.iter().filter(|(_, v)| !v.is_object() && !v.is_array()) {
            let _ = wtr.write_record([key.as_str(), &format_scalar(val)]);
        }
    } else {
        let _ = wtr.write_record([&format_scalar(result)]);
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
