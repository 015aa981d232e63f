// file: src/models/cluster.rs
// description: cluster count bounds and the labeled output table
// reference: internal data structures

use crate::error::{PipelineError, Result};
use crate::models::ColumnSelection;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_CLUSTERS: usize = 2;
pub const MAX_CLUSTERS: usize = 10;

/// Number of clusters, always within `[MIN_CLUSTERS, MAX_CLUSTERS]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct ClusterCount(usize);

impl ClusterCount {
    pub fn new(k: usize) -> Result<Self> {
        if !(MIN_CLUSTERS..=MAX_CLUSTERS).contains(&k) {
            return Err(PipelineError::InvalidClusterCount {
                requested: k,
                min: MIN_CLUSTERS,
                max: MAX_CLUSTERS,
            });
        }
        Ok(Self(k))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for ClusterCount {
    type Error = PipelineError;

    fn try_from(value: usize) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ClusterCount> for usize {
    fn from(value: ClusterCount) -> Self {
        value.0
    }
}

impl fmt::Display for ClusterCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    pub source_row: usize,
    pub latitude: f64,
    pub longitude: f64,
    pub cluster: usize,
}

/// Per-cluster aggregate in original (unscaled) units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub label: usize,
    pub size: usize,
    /// `None` when the cluster received no points
    pub centroid: Option<[f64; 2]>,
}

/// Cleaned coordinate rows with their cluster labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusteredTable {
    pub columns: ColumnSelection,
    pub clusters: ClusterCount,
    pub points: Vec<LabeledPoint>,
    pub summaries: Vec<ClusterSummary>,
    /// rows removed by numeric/missing-value filtering
    pub dropped: usize,
}

impl ClusteredTable {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn labels(&self) -> Vec<usize> {
        self.points.iter().map(|p| p.cluster).collect()
    }

    /// Number of clusters that received at least one point.
    pub fn occupied_clusters(&self) -> usize {
        self.summaries.iter().filter(|s| s.size > 0).count()
    }

    /// Mean latitude and longitude of all points; `None` for an empty table.
    pub fn center(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let lat = self.points.iter().map(|p| p.latitude).sum::<f64>() / n;
        let lon = self.points.iter().map(|p| p.longitude).sum::<f64>() / n;
        Some((lat, lon))
    }

    pub fn head(&self, n: usize) -> &[LabeledPoint] {
        &self.points[..n.min(self.points.len())]
    }
}
