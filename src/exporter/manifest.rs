// file: src/exporter/manifest.rs
// description: json run manifest describing one clustering run and its outputs

use crate::error::{PipelineError, Result};
use crate::exporter::palette::color_for;
use crate::models::{ClusteredTable, ColumnSelection};
use crate::pipeline::PipelineStats;
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

pub const MANIFEST_FILE_NAME: &str = "run_manifest.json";

#[derive(Debug, Clone, Serialize)]
pub struct ClusterEntry {
    pub label: usize,
    pub size: usize,
    pub color: &'static str,
    /// `[latitude, longitude]`
    pub centroid: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub run_id: Uuid,
    pub generated_at: String,
    pub input_sha256: String,
    pub columns: ColumnSelection,
    pub clusters: usize,
    pub seed: u64,
    pub stats: PipelineStats,
    pub cluster_entries: Vec<ClusterEntry>,
    pub files: Vec<String>,
}

impl RunManifest {
    pub fn new(
        input: &[u8],
        table: &ClusteredTable,
        stats: &PipelineStats,
        seed: u64,
        files: Vec<String>,
    ) -> Self {
        let cluster_entries = table
            .summaries
            .iter()
            .map(|s| ClusterEntry {
                label: s.label,
                size: s.size,
                color: color_for(s.label, table.clusters),
                centroid: s.centroid,
            })
            .collect();

        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now().to_rfc3339(),
            input_sha256: input_digest(input),
            columns: table.columns.clone(),
            clusters: table.clusters.get(),
            seed,
            stats: stats.clone(),
            cluster_entries,
            files,
        }
    }

    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(MANIFEST_FILE_NAME);
        let body = serde_json::to_string_pretty(self)?;
        fs::write(&path, body).map_err(|source| PipelineError::FileOperation {
            path: path.clone(),
            source,
        })?;
        info!("Wrote run manifest {} to {}", self.run_id, path.display());
        Ok(path)
    }
}

pub fn input_digest(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClusterCount, ClusterSummary, LabeledPoint};
    use serde_json::Value;
    use tempfile::tempdir;

    fn sample() -> ClusteredTable {
        ClusteredTable {
            columns: ColumnSelection::new("lat", "lon"),
            clusters: ClusterCount::new(2).unwrap(),
            points: vec![LabeledPoint {
                source_row: 0,
                latitude: 1.0,
                longitude: 2.0,
                cluster: 0,
            }],
            summaries: vec![
                ClusterSummary {
                    label: 0,
                    size: 1,
                    centroid: Some([1.0, 2.0]),
                },
                ClusterSummary {
                    label: 1,
                    size: 0,
                    centroid: None,
                },
            ],
            dropped: 0,
        }
    }

    #[test]
    fn test_input_digest_is_stable() {
        assert_eq!(input_digest(b"lat,lon\n"), input_digest(b"lat,lon\n"));
        assert_ne!(input_digest(b"lat,lon\n"), input_digest(b"lon,lat\n"));
        assert_eq!(input_digest(b"").len(), 64);
    }

    #[test]
    fn test_manifest_written_as_json() {
        let dir = tempdir().unwrap();
        let manifest = RunManifest::new(
            b"lat,lon\n1,2\n",
            &sample(),
            &PipelineStats::new(),
            42,
            vec!["clustered_data.csv".to_string()],
        );
        let path = manifest.write(dir.path()).unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["clusters"], 2);
        assert_eq!(value["seed"], 42);
        assert_eq!(value["columns"]["latitude"], "lat");
        assert_eq!(value["cluster_entries"][0]["color"], "#1f77b4");
        assert!(value["cluster_entries"][1]["centroid"].is_null());
        assert_eq!(value["files"][0], "clustered_data.csv");
    }
}
