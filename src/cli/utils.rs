use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format.
/// Object `data` is merged into the JSON envelope; text mode prints only the message.
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(envelope)) = (data, response.as_object_mut()) {
                envelope.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a list under a heading; JSON mode emits `{ key: [...] }`
pub fn output_list(output_format: &OutputFormat, key: &str, heading: &str, items: &[String]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ key: items }))?);
        }
        OutputFormat::Text => {
            println!("{} ({})", heading, items.len());
            for item in items {
                println!("  {}", item);
            }
        }
    }
    Ok(())
}
