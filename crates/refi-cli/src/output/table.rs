use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_scalar, schedule_rows};

/// Format output as tables: scalar fields as Field/Value pairs, nested
/// plans as their own sections, and every schedule or row list as a grid.
pub fn print_table(value: &Value) {
    let result = value.get("result").unwrap_or(value);
    match result {
        Value::Object(map) => print_section(None, map),
        Value::Array(arr) => print_rows(arr),
        _ => println!("{}", format_scalar(result)),
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_section(title: Option<&str>, map: &Map<String, Value>) {
    if let Some(t) = title {
        println!("\n[{}]", t);
    }

    let scalars: Vec<(&String, &Value)> = map
        .iter()
        .filter(|(_, v)| !v.is_object() && !is_row_list(v))
        .collect();
    if !scalars.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in scalars {
            builder.push_record([key.as_str(), &format_scalar(val)]);
        }
        println!("{}", Table::from(builder));
    }

    for (key, val) in map {
        if let Some(rows) = schedule_rows(val) {
            println!("\n{} ({} months)", key, rows.len());
            print_rows(rows);
        } else if let Value::Array(arr) = val {
            if is_row_list(val) {
                println!("\n{}", key);
                print_rows(arr);
            }
        } else if let Value::Object(inner) = val {
            print_section(Some(key.as_str()), inner);
        }
    }
}

fn is_row_list(value: &Value) -> bool {
    matches!(value, Value::Array(arr) if arr.first().is_some_and(Value::is_object))
}

fn print_rows(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_scalar).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_scalar(item));
        }
    }
}
