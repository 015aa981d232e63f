// file: src/exporter/csv_export.rs
// description: writes the labeled coordinate table as delimiter-separated text
// reference: https://docs.rs/csv

use crate::error::{PipelineError, Result};
use crate::models::ClusteredTable;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const LABEL_COLUMN: &str = "cluster";

#[derive(Debug, Clone)]
pub struct CsvExporter {
    delimiter: u8,
}

impl CsvExporter {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Header row: latitude column, longitude column, label column.
    pub fn header(table: &ClusteredTable) -> [String; 3] {
        [
            table.columns.latitude.clone(),
            table.columns.longitude.clone(),
            label_column_name(table),
        ]
    }

    /// No index column is written; rows keep pipeline order.
    pub fn write<W: Write>(&self, table: &ClusteredTable, writer: W) -> Result<()> {
        let mut wtr = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        wtr.write_record(Self::header(table))?;
        for point in &table.points {
            wtr.write_record([
                format_float(point.latitude),
                format_float(point.longitude),
                point.cluster.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_string(&self, table: &ClusteredTable) -> Result<String> {
        let mut buffer = Vec::new();
        self.write(table, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| PipelineError::Serialization(e.to_string()))
    }

    pub fn write_file(&self, table: &ClusteredTable, dir: &Path, file_name: &str) -> Result<PathBuf> {
        let path = dir.join(file_name);
        let file = File::create(&path).map_err(|source| PipelineError::FileOperation {
            path: path.clone(),
            source,
        })?;
        self.write(table, file)?;
        info!("Wrote {} labeled rows to {}", table.len(), path.display());
        Ok(path)
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new(b',')
    }
}

/// `cluster`, unless a coordinate column already uses that name.
fn label_column_name(table: &ClusteredTable) -> String {
    let taken = |name: &str| table.columns.latitude == name || table.columns.longitude == name;
    let mut name = LABEL_COLUMN.to_string();
    let mut n = 1;
    while taken(&name) {
        name = format!("{}.{}", LABEL_COLUMN, n);
        n += 1;
    }
    name
}

/// Integral values keep one decimal place so the column still reads as float.
pub fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
