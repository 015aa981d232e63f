// file: src/exporter/mod.rs
// description: output writers for labeled tables, map layers and run manifests
// reference: internal module structure

pub mod csv_export;
pub mod geojson;
pub mod manifest;
pub mod palette;
pub mod preview;

pub use csv_export::CsvExporter;
pub use geojson::{FeatureCollection, GeoJsonExporter};
pub use manifest::{RunManifest, input_digest};
pub use palette::{color_for, palette};
pub use preview::TablePreview;
