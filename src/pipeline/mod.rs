// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

pub mod kmeans;
mod processor;
pub mod scaler;
mod stats;

pub use kmeans::{KMeans, KMeansFit, KMeansParams, Point};
pub use processor::{CleanedCoordinates, ClusterPipeline, ProcessingResult, clean_coordinates};
pub use scaler::StandardScaler;
pub use stats::PipelineStats;
