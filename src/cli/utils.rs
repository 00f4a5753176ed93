use serde_json::{json, Value};
use std::io::BufRead;

use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::DatabaseManager;

/// Output a success message in the appropriate format.
/// In JSON mode the fields of `data` are merged next to `success` and `message`.
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let (Some(Value::Object(fields)), Some(target)) = (data, response.as_object_mut()) {
                target.extend(fields);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a list of rows: pretty JSON array, or one tab-separated line per row.
pub fn output_rows(
    output_format: OutputFormat,
    collection_name: &str,
    rows: Vec<Value>,
    columns: &[&str],
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: rows }))?);
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No {} found", collection_name);
                return Ok(());
            }
            println!("{}", columns.join("\t"));
            for row in &rows {
                let line: Vec<String> = columns.iter().map(|c| text_cell(row.get(*c))).collect();
                println!("{}", line.join("\t"));
            }
        }
    }
    Ok(())
}

fn text_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Use the given value, or read one line from stdin so secrets stay out of shell history.
pub fn value_or_stdin(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    eprint!("{}: ", prompt);
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let line = line.trim_end_matches(['\r', '\n']).to_string();
    if line.is_empty() {
        anyhow::bail!("{} is required", prompt);
    }
    Ok(line)
}

/// Eager pool for one-shot commands; fails fast when the database is unreachable.
pub async fn connect() -> anyhow::Result<sqlx::PgPool> {
    let pool = DatabaseManager::connect(&config().database).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_cells_render_plainly() {
        assert_eq!(text_cell(None), "-");
        assert_eq!(text_cell(Some(&Value::Null)), "-");
        assert_eq!(text_cell(Some(&json!("curator"))), "curator");
        assert_eq!(text_cell(Some(&json!(3))), "3");
        assert_eq!(text_cell(Some(&json!(true))), "true");
    }

    #[test]
    fn provided_value_skips_stdin() {
        assert_eq!(value_or_stdin(Some("pw".to_string()), "Password").unwrap(), "pw");
    }
}
