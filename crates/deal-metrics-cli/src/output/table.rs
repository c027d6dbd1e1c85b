use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::format_scalar;

/// Format the computation envelope as tables: scalar metrics first, then the
/// year-indexed cash-flow schedule, then any warnings and the methodology.
pub fn print_table(value: &Value) {
    let Some(envelope) = value.as_object() else {
        println!("{}", value);
        return;
    };

    let result = envelope.get("result").unwrap_or(value);

    if let Value::Object(fields) = result {
        let mut builder = Builder::default();
        builder.push_record(["Metric", "Value"]);
        for (key, val) in fields {
            if val.is_array() {
                continue; // schedules get their own table below
            }
            builder.push_record([key.as_str(), &format_scalar(val)]);
        }
        println!("{}", Table::from(builder));

        if let Some(Value::Array(flows)) = fields.get("cashFlows") {
            println!();
            print_schedule(flows);
        }
    } else {
        println!("{}", format_scalar(result));
    }

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

    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}

/// Year 0 is the initial outlay; the last year carries sale proceeds.
fn print_schedule(flows: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record(["Year", "Cash Flow"]);
    for (year, flow) in flows.iter().enumerate() {
        builder.push_record([year.to_string(), format_scalar(flow)]);
    }
    println!("{}", Table::from(builder));
}
