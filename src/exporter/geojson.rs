// file: src/exporter/geojson.rs
// description: map layer export, one colored point feature per labeled row
// reference: GeoJSON (RFC 7946) with simplestyle marker properties

use crate::error::{PipelineError, Result};
use crate::exporter::palette::color_for;
use crate::models::ClusteredTable;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_ZOOM: u8 = 12;

#[derive(Debug, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// map center as `[longitude, latitude]`
    pub center: Option<[f64; 2]>,
    pub zoom: u8,
    pub features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

#[derive(Debug, Serialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coordinates: [f64; 2],
}

#[derive(Debug, Serialize)]
pub struct FeatureProperties {
    pub cluster: usize,
    pub source_row: usize,
    #[serde(rename = "marker-color")]
    pub marker_color: &'static str,
    #[serde(rename = "marker-size")]
    pub marker_size: &'static str,
}

impl FeatureCollection {
    pub fn from_table(table: &ClusteredTable) -> Self {
        let features = table
            .points
            .iter()
            .map(|p| Feature {
                kind: "Feature",
                geometry: Geometry {
                    kind: "Point",
                    coordinates: [p.longitude, p.latitude],
                },
                properties: FeatureProperties {
                    cluster: p.cluster,
                    source_row: p.source_row,
                    marker_color: color_for(p.cluster, table.clusters),
                    marker_size: "small",
                },
            })
            .collect();

        Self {
            kind: "FeatureCollection",
            center: table.center().map(|(lat, lon)| [lon, lat]),
            zoom: DEFAULT_ZOOM,
            features,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GeoJsonExporter {
    pretty: bool,
}

impl GeoJsonExporter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn write<W: Write>(&self, table: &ClusteredTable, writer: W) -> Result<()> {
        let collection = FeatureCollection::from_table(table);
        if self.pretty {
            serde_json::to_writer_pretty(writer, &collection)?;
        } else {
            serde_json::to_writer(writer, &collection)?;
        }
        Ok(())
    }

    pub fn write_file(&self, table: &ClusteredTable, dir: &Path, file_name: &str) -> Result<PathBuf> {
        let path = dir.join(file_name);
        let file = File::create(&path).map_err(|source| PipelineError::FileOperation {
            path: path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.write(table, &mut writer)?;
        writer.flush()?;
        info!("Wrote map layer with {} points to {}", table.len(), path.display());
        Ok(path)
    }
}
