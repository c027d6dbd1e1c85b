use serde_json::Value;
use std::io;

use super::format_scalar;

/// Write the envelope as two-column CSV; array fields are exploded into
/// indexed rows (cashFlows[0], cashFlows[1], ...).
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let _ = wtr.write_record(["field", "value"]);

    match result {
        Value::Object(fields) => {
            for (key, val) in fields {
                match val {
                    Value::Array(arr) => {
                        for (i, item) in arr.iter().enumerate() {
                            let _ = wtr.write_record([
                                format!("{key}[{i}]").as_str(),
                                &format_scalar(item),
                            ]);
                        }
                    }
                    other => {
                        let _ = wtr.write_record([key.as_str(), &format_scalar(other)]);
                    }
                }
            }
        }
        other => {
            let _ = wtr.write_record(["value", &format_scalar(other)]);
        }
    }

    let _ = wtr.flush();
}
