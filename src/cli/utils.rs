use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::error::ClientError;
use crate::models::ResourceKind;
use crate::notify::{Alert, AlertLevel};
use crate::permissions::Affordance;
use crate::table::TableFooter;

/// A client failure that has already been printed with its details
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ReportedError(pub ClientError);

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a client error, including per-field and per-row details
pub fn output_error(output_format: &OutputFormat, err: &ClientError) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = err.to_json();
            response["success"] = json!(false);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", err.message());
            if let Some(fields) = err.field_errors() {
                for (field, messages) in fields {
                    for message in messages {
                        eprintln!("  {}: {}", field, message);
                    }
                }
            }
            if let Some(rows) = err.import_rows() {
                for row in rows {
                    eprintln!("  row {} ({}): {}", row.row, row.attribute, row.errors.join(", "));
                }
            }
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: &OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    collection_name: []
                }))?
            );
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Print success and warning alerts; errors already surface as command failures
pub fn output_alerts(output_format: &OutputFormat, alerts: &[Alert]) -> anyhow::Result<()> {
    if let OutputFormat::Text = output_format {
        for alert in alerts {
            match alert.level {
                AlertLevel::Success => println!("✓ {}: {}", alert.title, alert.message),
                AlertLevel::Warning => eprintln!("! {}: {}", alert.title, alert.message),
                AlertLevel::Error => {}
            }
        }
    }
    Ok(())
}

pub fn output_record(output_format: &OutputFormat, kind: ResourceKind, record: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        OutputFormat::Text => {
            println!("{} #{}", kind.singular(), cell(record, "id"));
            for (header, value) in headers(kind).iter().zip(row_cells(kind, record)) {
                println!("  {:<12} {}", format!("{}:", header), value);
            }
            if let Some(description) = record.get("description").and_then(Value::as_str) {
                if !description.is_empty() {
                    println!("  {:<12} {}", "Description:", description);
                }
            }
        }
    }
    Ok(())
}

pub fn output_table(
    output_format: &OutputFormat,
    kind: ResourceKind,
    rows: &[Value],
    footer: &TableFooter,
    toolbar: &[Affordance],
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "data": rows,
                    "footer": footer,
                    "actions": toolbar,
                }))?
            );
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No {} found", kind.plural());
            } else {
                let headers = headers(kind);
                let cells: Vec<Vec<String>> = rows.iter().map(|r| row_cells(kind, r)).collect();
                let widths: Vec<usize> = headers
                    .iter()
                    .enumerate()
                    .map(|(i, h)| {
                        cells
                            .iter()
                            .map(|row| row[i].chars().count())
                            .chain(std::iter::once(h.len()))
                            .max()
                            .unwrap_or(0)
                    })
                    .collect();

                let line = |values: Vec<String>| {
                    values
                        .iter()
                        .zip(&widths)
                        .map(|(v, w)| format!("{:<width$}", v, width = *w))
                        .collect::<Vec<_>>()
                        .join("  ")
                };
                println!("{}", line(headers.iter().map(|h| h.to_string()).collect()));
                for row in cells {
                    println!("{}", line(row));
                }
            }
            println!();
            println!("{}    {}", footer.showing, footer.page_label);
            if !toolbar.is_empty() {
                let labels: Vec<&str> = toolbar.iter().map(|a| a.label.as_str()).collect();
                println!("Actions: {}", labels.join(", "));
            }
        }
    }
    Ok(())
}

fn headers(kind: ResourceKind) -> &'static [&'static str] {
    match kind {
        ResourceKind::Users => &["ID", "Name", "Email", "Roles"],
        ResourceKind::Roles => &["ID", "Label", "Permissions"],
        ResourceKind::Permissions => &["ID", "Name", "Label", "Module"],
        ResourceKind::MasterData => &["ID", "Type", "Name", "Code", "Parent", "Status"],
    }
}

fn row_cells(kind: ResourceKind, row: &Value) -> Vec<String> {
    match kind {
        ResourceKind::Users => {
            let roles = match row.get("roles").and_then(Value::as_array) {
                Some(roles) if !roles.is_empty() => roles
                    .iter()
                    .map(|r| cell(r, "label"))
                    .collect::<Vec<_>>()
                    .join(", "),
                _ => cell(row, "role"),
            };
            vec![cell(row, "id"), cell(row, "name"), cell(row, "email"), roles]
        }
        ResourceKind::Roles => {
            let count = row
                .get("permissions")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            vec![cell(row, "id"), cell(row, "label"), count.to_string()]
        }
        ResourceKind::Permissions => vec![
            cell(row, "id"),
            cell(row, "name"),
            cell(row, "label"),
            cell(row, "module"),
        ],
        ResourceKind::MasterData => {
            let parent = row.get("parent").map(|p| cell(p, "name")).unwrap_or_default();
            let status = match row.get("status") {
                Some(Value::Bool(true)) => "Active",
                Some(Value::Number(n)) if n.as_i64() == Some(1) => "Active",
                _ => "Inactive",
            };
            vec![
                cell(row, "id"),
                cell(row, "type"),
                cell(row, "name"),
                cell(row, "code"),
                parent,
                status.to_string(),
            ]
        }
    }
}

fn cell(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Parse `key=value`; the value is read as JSON when it parses, else as a string
pub fn parse_assignment(raw: &str) -> anyhow::Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Expected key=value, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow::anyhow!("Missing field name in '{}'", raw));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
