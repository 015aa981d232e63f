// file: src/models/coordinate.rs
// description: latitude/longitude column selection and the typed coordinate record
// reference: internal data structures

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};

/// The two columns of a raw table treated as geographic coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSelection {
    pub latitude: String,
    pub longitude: String,
}

impl ColumnSelection {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    /// Latitude and longitude must name different columns.
    pub fn ensure_distinct(&self) -> Result<()> {
        if self.latitude == self.longitude {
            return Err(PipelineError::IdenticalColumns(self.latitude.clone()));
        }
        Ok(())
    }
}

/// One cleaned row: both fields finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// zero-based data row index in the raw table
    pub source_row: usize,
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(source_row: usize, latitude: f64, longitude: f64) -> Self {
        Self {
            source_row,
            latitude,
            longitude,
        }
    }

    pub fn as_array(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_columns_rejected() {
        let selection = ColumnSelection::new("lat", "lat");
        assert!(matches!(
            selection.ensure_distinct(),
            Err(PipelineError::IdenticalColumns(ref c)) if c == "lat"
        ));
        assert!(ColumnSelection::new("lat", "lon").ensure_distinct().is_ok());
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        assert!(ColumnSelection::new("Lat", "lat").ensure_distinct().is_ok());
    }
}
