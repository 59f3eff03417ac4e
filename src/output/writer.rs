use anyhow::{Context, Result};
use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Write rows to a headered CSV file, creating parent directories.
///
/// An empty row set still gets a header line, taken from the row type's
/// field list.
pub fn write_table<T: Serialize + DeserializeOwned>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    if rows.is_empty() {
        writer
            .write_record(column_names::<T>())
            .with_context(|| format!("Failed to write header to {}", path.display()))?;
    }
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "Wrote table");
    Ok(())
}

/// Field names of a serde-derived row struct, in declaration order.
///
/// Derived `Deserialize` impls pass their field list to `deserialize_struct`.
/// [`FieldNames`] records it and aborts. Row types written as tables carry
/// no `alias` attributes, which would otherwise show up in the list.
pub fn column_names<T: DeserializeOwned>() -> &'static [&'static str] {
    let mut fields: &'static [&'static str] = &[];
    // Always Err(Stop): only the recorded field list matters.
    let _ = T::deserialize(FieldNames {
        fields: &mut fields,
    });
    fields
}

struct FieldNames<'a> {
    fields: &'a mut &'static [&'static str],
}

#[derive(Debug)]
struct Stop;

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("field list recorded")
    }
}

impl std::error::Error for Stop {}

impl de::Error for Stop {
    fn custom<M: fmt::Display>(_msg: M) -> Self {
        Stop
    }
}

impl<'de> Deserializer<'de> for FieldNames<'_> {
    type Error = Stop;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> std::result::Result<V::Value, Stop> {
        Err(Stop)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        _visitor: V,
    ) -> std::result::Result<V::Value, Stop> {
        *self.fields = fields;
        Err(Stop)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::budget::BudgetAlert;
    use crate::cost::summary::TeamCostSummary;
    use tempfile::TempDir;

    #[test]
    fn column_names_follow_declaration_order() {
        assert_eq!(
            column_names::<BudgetAlert>(),
            &["team_id", "alert_type", "threshold_pct", "triggered_at", "status"]
        );
    }

    #[test]
    fn empty_table_keeps_its_header() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("derived").join("budget_alerts.csv");

        write_table(&path, &Vec::<BudgetAlert>::new()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "team_id,alert_type,threshold_pct,triggered_at,status\n"
        );
    }

    #[test]
    fn non_empty_header_matches_empty_header() {
        let tmp = TempDir::new().unwrap();
        let empty = tmp.path().join("empty.csv");
        let full = tmp.path().join("full.csv");
        let row = TeamCostSummary {
            team_id: "T01".to_string(),
            team_name: "Platform".to_string(),
            monthly_budget_usd: 100.0,
            total_cost_usd: 12.5,
            budget_usage_pct: 12.5,
            budget_status: crate::cost::budget::BudgetStatus::Normal,
        };

        write_table(&empty, &Vec::<TeamCostSummary>::new()).unwrap();
        write_table(&full, &[row]).unwrap();

        let empty = std::fs::read_to_string(&empty).unwrap();
        let full = std::fs::read_to_string(&full).unwrap();
        assert_eq!(full.lines().next(), empty.lines().next());
    }
}
