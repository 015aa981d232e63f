// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::models::ClusterCount;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub input: InputConfig,
    pub clustering: ClusteringConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// `auto` or a single ASCII character
    pub delimiter: String,
    pub has_headers: bool,
    pub preview_rows: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClusteringConfig {
    pub default_clusters: usize,
    pub seed: u64,
    pub n_init: usize,
    pub max_iterations: usize,
    pub tolerance: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub csv_file_name: String,
    pub geojson_file_name: String,
    pub write_geojson: bool,
    pub write_manifest: bool,
}

/// Field delimiter for delimiter-separated input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Auto,
    Byte(u8),
}

impl InputConfig {
    pub fn delimiter(&self) -> Result<Delimiter> {
        parse_delimiter(&self.delimiter)
    }
}

pub fn parse_delimiter(raw: &str) -> Result<Delimiter> {
    match raw {
        "auto" => Ok(Delimiter::Auto),
        "\\t" | "tab" => Ok(Delimiter::Byte(b'\t')),
        other if other.len() == 1 && other.is_ascii() => Ok(Delimiter::Byte(other.as_bytes()[0])),
        other => Err(PipelineError::Config(format!(
            "delimiter must be 'auto' or a single ASCII character, got '{}'",
            other
        ))),
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            default_clusters: 5,
            seed: 42,
            n_init: 10,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = Self::default_config();
        let mut builder = config::Config::builder()
            .set_default("input.delimiter", defaults.input.delimiter)
            .and_then(|b| b.set_default("input.has_headers", defaults.input.has_headers))
            .and_then(|b| b.set_default("input.preview_rows", defaults.input.preview_rows as u64))
            .and_then(|b| {
                b.set_default(
                    "clustering.default_clusters",
                    defaults.clustering.default_clusters as u64,
                )
            })
            .and_then(|b| b.set_default("clustering.seed", defaults.clustering.seed))
            .and_then(|b| b.set_default("clustering.n_init", defaults.clustering.n_init as u64))
            .and_then(|b| {
                b.set_default(
                    "clustering.max_iterations",
                    defaults.clustering.max_iterations as u64,
                )
            })
            .and_then(|b| b.set_default("clustering.tolerance", defaults.clustering.tolerance))
            .and_then(|b| {
                b.set_default(
                    "output.directory",
                    defaults.output.directory.display().to_string(),
                )
            })
            .and_then(|b| b.set_default("output.csv_file_name", defaults.output.csv_file_name))
            .and_then(|b| {
                b.set_default("output.geojson_file_name", defaults.output.geojson_file_name)
            })
            .and_then(|b| b.set_default("output.write_geojson", defaults.output.write_geojson))
            .and_then(|b| b.set_default("output.write_manifest", defaults.output.write_manifest))
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(
                config::File::from(Path::new("config/default.toml")).required(false),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix("MOBILITY_CLUSTER")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            input: InputConfig {
                delimiter: "auto".to_string(),
                has_headers: true,
                preview_rows: 5,
            },
            clustering: ClusteringConfig::default(),
            output: OutputConfig {
                directory: PathBuf::from("./output"),
                csv_file_name: "clustered_data.csv".to_string(),
                geojson_file_name: "clustered_map.geojson".to_string(),
                write_geojson: false,
                write_manifest: true,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.input.delimiter()?;

        if self.input.preview_rows == 0 {
            return Err(PipelineError::Config(
                "preview_rows must be greater than 0".to_string(),
            ));
        }

        ClusterCount::new(self.clustering.default_clusters)
            .map_err(|e| PipelineError::Config(format!("default_clusters: {}", e)))?;

        if self.clustering.n_init == 0 {
            return Err(PipelineError::Config(
                "n_init must be greater than 0".to_string(),
            ));
        }

        if self.clustering.max_iterations == 0 {
            return Err(PipelineError::Config(
                "max_iterations must be greater than 0".to_string(),
            ));
        }

        if !self.clustering.tolerance.is_finite() || self.clustering.tolerance <= 0.0 {
            return Err(PipelineError::Config(
                "tolerance must be a finite positive number".to_string(),
            ));
        }

        if self.output.csv_file_name.trim().is_empty() {
            return Err(PipelineError::Config(
                "csv_file_name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
