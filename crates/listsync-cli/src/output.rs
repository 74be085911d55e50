use listsync_core::usecases::ApiResponse;
use serde_json::Value;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Trait for formatting CLI output
pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn print_json(&self, value: &Value);
}

/// Human-readable output formatter with checkmarks and indentation
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {}", message);
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {}", message);
    }
    fn warn(&self, message: &str) {
        eprintln!("\u{26a0} Warning: {}", message);
    }
    fn info(&self, message: &str) {
        println!("  {}", message);
    }
    fn print_json(&self, _value: &Value) {
        // Human formatter doesn't print JSON
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!(
            "{}",
            serde_json::json!({"success": true, "message": message})
        );
    }
    fn error(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"success": false, "error": message})
        );
    }
    fn warn(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"level": "warning", "message": message})
        );
    }
    fn info(&self, _message: &str) {}
    fn print_json(&self, value: &Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
}

pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter)
    }
}

/// Prints an operation result
///
/// JSON mode prints the whole `{status, body}` envelope; human mode prints
/// one `key: value` line per snapshot field.
pub fn render_response(format: OutputFormat, response: &ApiResponse) {
    let formatter = get_formatter(matches!(format, OutputFormat::Json));

    if matches!(format, OutputFormat::Json) {
        let envelope = serde_json::to_value(response).unwrap_or(Value::Null);
        formatter.print_json(&envelope);
        return;
    }

    if !response.is_success() {
        formatter.error(&format!(
            "{} ({})",
            response.message().unwrap_or("Request failed"),
            response.status
        ));
        if let Some(errors) = response.body.get("errors").and_then(Value::as_object) {
            for (field, messages) in errors {
                for message in messages.as_array().into_iter().flatten() {
                    formatter.info(&format!("{}: {}", field, display_value(message)));
                }
            }
        }
        return;
    }

    match &response.body {
        Value::Null => formatter.success("Done"),
        Value::Array(items) => {
            formatter.success(&format!(
                "{} record{}",
                items.len(),
                if items.len() == 1 { "" } else { "s" }
            ));
            for item in items {
                formatter.info("");
                print_fields(&*formatter, item);
            }
        }
        body => {
            formatter.success(if response.status == ApiResponse::CREATED {
                "Created"
            } else {
                "OK"
            });
            print_fields(&*formatter, body);
        }
    }
}

fn print_fields(formatter: &dyn OutputFormatter, value: &Value) {
    match value.as_object() {
        Some(fields) => {
            for (key, field) in fields {
                formatter.info(&format!("{}: {}", key, display_value(field)));
            }
        }
        None => formatter.info(&display_value(value)),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
