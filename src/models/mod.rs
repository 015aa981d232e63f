// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod cluster;
pub mod coordinate;
pub mod table;

pub use cluster::{ClusterCount, ClusterSummary, ClusteredTable, LabeledPoint, MAX_CLUSTERS, MIN_CLUSTERS};
pub use coordinate::{ColumnSelection, Coordinate};
pub use table::RawTable;
