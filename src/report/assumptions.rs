// src/report/assumptions.rs

use std::io::Write;

use chrono::{DateTime, Utc};
use csv::Writer;
use serde::{Deserialize, Serialize};

use crate::distribution::DistParam;
use crate::error::Result;

/// Row-oriented snapshot of every tracked distribution: one row per
/// parameter, one column per attribute. A pure projection — building the
/// table never mutates the model, and rebuilding without intervening
/// mutation yields an identical table (up to `generated_at`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssumptionTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub generated_at: DateTime<Utc>,
}

impl AssumptionTable {
    /// Flatten parameters into a table, dropping any column named in
    /// `exclude_columns`.
    pub fn from_params<'a>(
        params: impl IntoIterator<Item = &'a DistParam>,
        exclude_columns: &[&str],
    ) -> Self {
        let columns: Vec<String> = DistParam::COLUMNS
            .iter()
            .filter(|column| !exclude_columns.contains(column))
            .map(|column| column.to_string())
            .collect();

        let rows = params
            .into_iter()
            .map(|param| {
                param
                    .to_record()
                    .into_iter()
                    .filter(|(column, _)| !exclude_columns.contains(column))
                    .map(|(_, value)| value)
                    .collect()
            })
            .collect();

        Self {
            columns,
            rows,
            generated_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as CSV: header row, then one record per distribution.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = Writer::from_writer(writer);
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Vec<DistParam> {
        vec![
            DistParam::from_samples("engagement", "pricing", "seg1", vec![1.0, 2.0]),
            DistParam::from_samples("price", "pricing", "seg1", vec![5.0, 5.0]),
            DistParam::from_samples("mcs", "pricing", "seg1", vec![5.0, 10.0]),
        ]
    }

    #[test]
    fn one_row_per_distribution() {
        let params = params();
        let table = AssumptionTable::from_params(params.iter(), &[]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.columns.len(), DistParam::COLUMNS.len());
        assert!(table.rows.iter().all(|row| row.len() == table.columns.len()));
    }

    #[test]
    fn excluded_columns_are_dropped_everywhere() {
        let params = params();
        let table = AssumptionTable::from_params(params.iter(), &["samples", "seed"]);
        assert!(!table.columns.iter().any(|c| c == "samples"));
        assert!(!table.columns.iter().any(|c| c == "seed"));
        assert_eq!(table.columns.len(), DistParam::COLUMNS.len() - 2);
        assert!(table.rows.iter().all(|row| row.len() == table.columns.len()));
    }

    #[test]
    fn rebuilding_without_mutation_is_idempotent() {
        let params = params();
        let first = AssumptionTable::from_params(params.iter(), &[]);
        let second = AssumptionTable::from_params(params.iter(), &[]);
        assert_eq!(first.columns, second.columns);
        assert_eq!(first.rows, second.rows);
    }

    #[test]
    fn csv_output_has_header_and_data_rows() {
        let params = params();
        let table = AssumptionTable::from_params(params.iter(), &[]);
        let csv = table.to_csv_string().unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("name,lever,segment"));
        assert_eq!(lines.count(), 3);
    }

    #[test]
    fn empty_model_still_emits_the_schema() {
        let table = AssumptionTable::from_params(std::iter::empty::<&DistParam>(), &[]);
        assert!(table.is_empty());
        assert_eq!(table.columns.len(), DistParam::COLUMNS.len());
    }
}
