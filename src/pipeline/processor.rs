// file: src/pipeline/processor.rs
// description: validation and clustering pipeline from raw table to labeled coordinates
// reference: projects the coordinate columns, coerces, filters, scales and clusters

use crate::config::ClusteringConfig;
use crate::error::{PipelineError, Result};
use crate::models::{
    ClusterCount, ClusterSummary, ClusteredTable, ColumnSelection, Coordinate, LabeledPoint,
    RawTable,
};
use crate::parser::numeric::{CellValue, coerce};
use crate::pipeline::kmeans::{KMeans, KMeansParams, Point};
use crate::pipeline::scaler::StandardScaler;
use crate::pipeline::stats::PipelineStats;
use crate::utils::OperationTimer;
use tracing::{debug, info, warn};

/// Coordinates that survived coercion, with counts of what was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedCoordinates {
    pub coordinates: Vec<Coordinate>,
    pub rows_read: usize,
    pub rows_missing: usize,
    pub rows_non_numeric: usize,
}

impl CleanedCoordinates {
    pub fn rows_dropped(&self) -> usize {
        self.rows_missing + self.rows_non_numeric
    }
}

#[derive(Debug)]
pub struct ProcessingResult {
    pub table: ClusteredTable,
    pub stats: PipelineStats,
}

pub struct ClusterPipeline {
    config: ClusteringConfig,
}

impl ClusterPipeline {
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    /// Run every stage for one selection. Each call starts from scratch.
    pub fn run(
        &self,
        table: &RawTable,
        selection: &ColumnSelection,
        clusters: ClusterCount,
    ) -> Result<ProcessingResult> {
        let timer = OperationTimer::new("clustering pipeline");

        let cleaned = clean_coordinates(table, selection)?;
        timer.checkpoint("coordinates cleaned");

        if cleaned.coordinates.is_empty() {
            warn!(
                "No valid rows for columns '{}' / '{}'",
                selection.latitude, selection.longitude
            );
            return Err(PipelineError::NoValidData {
                total_rows: cleaned.rows_read,
            });
        }

        let k = clusters.get();
        if cleaned.coordinates.len() < k {
            return Err(PipelineError::InsufficientPoints {
                points: cleaned.coordinates.len(),
                clusters: k,
            });
        }

        let raw_points: Vec<Point> = cleaned.coordinates.iter().map(Coordinate::as_array).collect();
        let (scaler, scaled) = StandardScaler::fit_transform(&raw_points);
        debug!(
            "Scaler fitted: means=[{}, {}], scales=[{}, {}]",
            scaler.mean(0),
            scaler.mean(1),
            scaler.scale(0),
            scaler.scale(1)
        );

        let fit = KMeans::new(KMeansParams::from_config(k, &self.config)).fit(&scaled)?;
        timer.checkpoint("k-means finished");

        let points: Vec<LabeledPoint> = cleaned
            .coordinates
            .iter()
            .zip(&fit.labels)
            .map(|(c, &cluster)| LabeledPoint {
                source_row: c.source_row,
                latitude: c.latitude,
                longitude: c.longitude,
                cluster,
            })
            .collect();

        let summaries: Vec<ClusterSummary> = fit
            .centroids
            .iter()
            .zip(&fit.sizes)
            .enumerate()
            .map(|(label, (centroid, &size))| ClusterSummary {
                label,
                size,
                centroid: (size > 0).then(|| scaler.inverse_transform_point(*centroid)),
            })
            .collect();

        let duration = timer.finish_with_count(cleaned.rows_read);

        let stats = PipelineStats {
            rows_read: cleaned.rows_read,
            rows_kept: points.len(),
            rows_missing: cleaned.rows_missing,
            rows_non_numeric: cleaned.rows_non_numeric,
            iterations: fit.iterations,
            converged: fit.converged,
            inertia: fit.inertia,
            duration_ms: duration.as_millis() as u64,
        };

        info!(
            "Clustered {} points into {} clusters (inertia {:.4}, {} iterations)",
            stats.rows_kept, k, stats.inertia, stats.iterations
        );

        Ok(ProcessingResult {
            table: ClusteredTable {
                columns: selection.clone(),
                clusters,
                points,
                summaries,
                dropped: cleaned.rows_dropped(),
            },
            stats,
        })
    }
}

/// Check the selection, project the two columns and keep rows where both
/// cells are finite numbers. Row order is preserved.
pub fn clean_coordinates(table: &RawTable, selection: &ColumnSelection) -> Result<CleanedCoordinates> {
    selection.ensure_distinct()?;

    let lat_idx = table.column_index(&selection.latitude)?;
    let lon_idx = table.column_index(&selection.longitude)?;

    let mut coordinates = Vec::with_capacity(table.len());
    let mut rows_missing = 0;
    let mut rows_non_numeric = 0;

    for (row, (lat, lon)) in table
        .column_values(lat_idx)
        .zip(table.column_values(lon_idx))
        .enumerate()
    {
        match (coerce(lat), coerce(lon)) {
            (CellValue::Number(lat), CellValue::Number(lon)) => {
                coordinates.push(Coordinate::new(row, lat, lon));
            }
            (CellValue::Invalid, _) | (_, CellValue::Invalid) => rows_non_numeric += 1,
            _ => rows_missing += 1,
        }
    }

    let cleaned = CleanedCoordinates {
        coordinates,
        rows_read: table.len(),
        rows_missing,
        rows_non_numeric,
    };

    if cleaned.rows_dropped() > 0 {
        warn!(
            "Dropped {} of {} rows ({} missing, {} non-numeric)",
            cleaned.rows_dropped(),
            cleaned.rows_read,
            rows_missing,
            rows_non_numeric
        );
    }

    Ok(cleaned)
}
