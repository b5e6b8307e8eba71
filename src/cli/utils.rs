use serde_json::Value;

use crate::cli::OutputFormat;

/// Print a fetched value in the selected format. Text mode renders a
/// compact line per item for arrays and pretty JSON otherwise.
pub fn output_value(output: &OutputFormat, value: &Value) -> anyhow::Result<()> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => match value {
            Value::Array(items) => {
                if items.is_empty() {
                    println!("(empty)");
                }
                for item in items {
                    println!("{}", summarize(item));
                }
            }
            other => println!("{}", serde_json::to_string_pretty(other)?),
        },
    }
    Ok(())
}

pub fn output_success(output: &OutputFormat, message: &str) {
    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "success": true, "message": message }));
        }
        OutputFormat::Text => println!("✓ {}", message),
    }
}

fn summarize(item: &Value) -> String {
    let id = item.get("id").and_then(Value::as_str).unwrap_or("-");
    let label = item
        .get("title")
        .or_else(|| item.get("name"))
        .or_else(|| item.get("email"))
        .and_then(Value::as_str)
        .unwrap_or("-");
    format!("{}  {}", id, label)
}
