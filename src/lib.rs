// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod utils;

pub use self::config::{ClusteringConfig, Config, Delimiter, InputConfig, OutputConfig};
pub use error::{PipelineError, Result};
pub use exporter::{CsvExporter, FeatureCollection, GeoJsonExporter, RunManifest, TablePreview};
pub use models::{
    ClusterCount, ClusterSummary, ClusteredTable, ColumnSelection, Coordinate, LabeledPoint,
    RawTable,
};
pub use parser::{CellValue, TableReader};
pub use pipeline::{ClusterPipeline, KMeans, KMeansParams, PipelineStats, ProcessingResult};
pub use utils::{OperationTimer, PerformanceMetrics, Validator};
