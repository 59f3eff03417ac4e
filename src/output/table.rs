use anyhow::{Context, Result};
use serde::Serialize;

/// Output format for tabular views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            _ => OutputFormat::Table,
        }
    }
}

/// Render rows in the requested format. Returns `None` for an empty set so
/// callers can print a notice instead.
pub fn render<T: Serialize>(rows: &[T], format: OutputFormat) -> Result<Option<String>> {
    if rows.is_empty() {
        return Ok(None);
    }
    let out = match format {
        OutputFormat::Table => format_table(rows)?,
        OutputFormat::Json => serde_json::to_string_pretty(rows)?,
        OutputFormat::Csv => format_csv(rows)?,
    };
    Ok(Some(out))
}

/// Serialize rows to CSV text, header first. Field order follows the struct.
pub fn format_csv<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().context("Failed to flush CSV buffer")?;
    let text = String::from_utf8(bytes).context("CSV output is not valid UTF-8")?;
    Ok(text)
}

/// Align rows into fixed-width columns.
fn format_table<T: Serialize>(rows: &[T]) -> Result<String> {
    // Round-trip through CSV so nested enums and options flatten the same
    // way they do in exported files.
    let text = format_csv(rows)?;
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_uppercase()).collect();
    let records: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for record in &records {
        for (i, field) in record.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(field.chars().count());
            }
        }
    }

    let mut lines = Vec::with_capacity(records.len() + 2);
    lines.push(join_padded(columns.iter().map(|s| s.as_str()), &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for record in &records {
        lines.push(join_padded(record.iter(), &widths));
    }
    lines.push(format!("({} rows)", records.len()));
    Ok(lines.join("\n"))
}

fn join_padded<'a>(fields: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    fields
        .zip(widths)
        .map(|(f, w)| format!("{:<width$}", f, width = *w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
