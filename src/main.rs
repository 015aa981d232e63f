// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use mobility_cluster::config::{Delimiter, parse_delimiter};
use mobility_cluster::exporter::palette::palette;
use mobility_cluster::utils::logging::{
    format_error, format_info, format_step, format_success, format_swatch, format_warning,
};
use mobility_cluster::{
    ClusterCount, ClusterPipeline, ColumnSelection, Config, CsvExporter, GeoJsonExporter,
    OperationTimer, PipelineError, RawTable, RunManifest, TablePreview, TableReader, Validator,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "mobility_cluster")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(
    about = "Find high-demand mobility zones by k-means clustering of geographic points",
    long_about = None
)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the columns of a table
    Columns {
        /// Input file, or `-` for stdin
        input: PathBuf,

        #[arg(short, long)]
        delimiter: Option<String>,
    },

    /// Show the first rows of a table
    Preview {
        /// Input file, or `-` for stdin
        input: PathBuf,

        #[arg(short = 'n', long, value_name = "NUM")]
        rows: Option<usize>,

        #[arg(short, long)]
        delimiter: Option<String>,
    },

    /// Cluster the points and write the labeled table
    Run {
        /// Input file, or `-` for stdin
        input: PathBuf,

        #[arg(long, value_name = "COLUMN")]
        lat: String,

        #[arg(long, value_name = "COLUMN")]
        lon: String,

        /// Number of clusters (K)
        #[arg(short = 'k', long, value_parser = clap::value_parser!(u8).range(2..=10))]
        clusters: Option<u8>,

        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Also write a GeoJSON map layer
        #[arg(long)]
        geojson: bool,

        #[arg(long)]
        no_manifest: bool,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(short, long)]
        delimiter: Option<String>,

        /// Defaults to the input delimiter
        #[arg(long)]
        output_delimiter: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    mobility_cluster::utils::logging::init_logger(cli.color, cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<PipelineError>() {
            Some(pipeline_err) if pipeline_err.is_user_error() => {
                eprintln!("{}", format_warning(&pipeline_err.to_string()));
                ExitCode::from(2)
            }
            _ => {
                eprintln!("{}", format_error(&format!("{:#}", err)));
                ExitCode::FAILURE
            }
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    info!("Mobility Cluster");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Columns { input, delimiter } => cmd_columns(&config, &input, delimiter),
        Commands::Preview {
            input,
            rows,
            delimiter,
        } => cmd_preview(&config, &input, rows, delimiter),
        Commands::Run {
            input,
            lat,
            lon,
            clusters,
            output,
            geojson,
            no_manifest,
            seed,
            delimiter,
            output_delimiter,
        } => {
            let mut config = config;
            if let Some(seed) = seed {
                config.clustering.seed = seed;
            }
            if let Some(output) = output {
                config.output.directory = output;
            }
            config.output.write_geojson |= geojson;
            config.output.write_manifest &= !no_manifest;

            let clusters = clusters
                .map(usize::from)
                .unwrap_or(config.clustering.default_clusters);

            cmd_run(
                &config,
                &input,
                ColumnSelection::new(lat, lon),
                clusters,
                delimiter,
                output_delimiter,
            )
        }
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    let bytes = if path == Path::new("-") {
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    } else {
        Validator::validate_file_path(path)?;
        if let Err(e) = Validator::validate_table_extension(path) {
            warn!("{}", e);
        }
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
    };

    Validator::validate_content_not_empty(&bytes)?;
    Ok(bytes)
}

fn load_table(config: &Config, input: &Path, delimiter: Option<String>) -> Result<(Vec<u8>, RawTable)> {
    let timer = OperationTimer::new("load input");

    let mut input_config = config.input.clone();
    if let Some(delimiter) = delimiter {
        input_config.delimiter = delimiter;
    }

    let bytes = read_input(input)?;
    let reader = TableReader::from_config(&input_config)?;
    let table = reader.parse(&bytes).context("Failed to parse input table")?;

    timer.warn_if_slow(Duration::from_secs(5), "reading input");
    timer.finish_with_count(table.len());
    Ok((bytes, table))
}

fn cmd_columns(config: &Config, input: &Path, delimiter: Option<String>) -> Result<()> {
    let (_, table) = load_table(config, input, delimiter)?;

    println!(
        "{}",
        format_info(&format!(
            "{} columns, {} rows",
            table.column_count(),
            table.len()
        ))
    );
    for (i, column) in table.headers.iter().enumerate() {
        println!("  {:>3}  {}", i, column);
    }

    Ok(())
}

fn cmd_preview(
    config: &Config,
    input: &Path,
    rows: Option<usize>,
    delimiter: Option<String>,
) -> Result<()> {
    let (_, table) = load_table(config, input, delimiter)?;
    let rows = rows.unwrap_or(config.input.preview_rows);

    print!("{}", TablePreview::new(rows).raw(&table));
    Ok(())
}

fn cmd_run(
    config: &Config,
    input: &Path,
    selection: ColumnSelection,
    clusters: usize,
    delimiter: Option<String>,
    output_delimiter: Option<String>,
) -> Result<()> {
    const STEPS: usize = 4;

    let clusters = ClusterCount::new(clusters)?;
    let output_delimiter = output_delimiter
        .as_deref()
        .map(parse_delimiter)
        .transpose()?;
    Validator::validate_file_name(&config.output.csv_file_name)?;
    if config.output.write_geojson {
        Validator::validate_file_name(&config.output.geojson_file_name)?;
    }

    println!("{}", format_step(1, STEPS, "Loading raw data"));
    let (bytes, table) = load_table(config, input, delimiter)?;
    let output_delimiter = match output_delimiter {
        Some(Delimiter::Byte(b)) => b,
        Some(Delimiter::Auto) | None => table.delimiter,
    };
    let preview = TablePreview::new(config.input.preview_rows);
    print!("{}", preview.raw(&table));

    println!(
        "{}",
        format_step(
            2,
            STEPS,
            &format!(
                "Clustering '{}' / '{}' into {} clusters",
                selection.latitude, selection.longitude, clusters
            )
        )
    );
    let pipeline = ClusterPipeline::new(config.clustering.clone());
    let result = pipeline.run(&table, &selection, clusters)?;

    if result.table.dropped > 0 {
        println!(
            "{}",
            format_warning(&format!(
                "{} of {} rows dropped ({} missing, {} non-numeric)",
                result.table.dropped,
                result.stats.rows_read,
                result.stats.rows_missing,
                result.stats.rows_non_numeric
            ))
        );
    }

    println!("{}", format_step(3, STEPS, "Clustered data"));
    print!("{}", preview.clustered(&result.table));
    let occupied = result.table.occupied_clusters();
    if occupied < clusters.get() {
        println!(
            "{}",
            format_warning(&format!(
                "only {} of {} clusters received points (too few distinct locations)",
                occupied, clusters
            ))
        );
    }
    for (summary, color) in result.table.summaries.iter().zip(palette(clusters)) {
        let location = summary
            .centroid
            .map(|c| format!("centered at ({:.5}, {:.5})", c[0], c[1]))
            .unwrap_or_else(|| "empty".to_string());
        println!(
            "  {}",
            format_swatch(
                color,
                &format!(
                    "cluster {}: {} points, {}",
                    summary.label, summary.size, location
                )
            )
        );
    }

    println!("{}", format_step(4, STEPS, "Writing output"));
    let timer = OperationTimer::new("write output");
    let out_dir = &config.output.directory;
    Validator::ensure_output_directory(out_dir)?;

    let mut files = Vec::new();
    let csv_path = CsvExporter::new(output_delimiter).write_file(
        &result.table,
        out_dir,
        &config.output.csv_file_name,
    )?;
    files.push(config.output.csv_file_name.clone());
    println!(
        "{}",
        format_success(&format!("Clustered data: {}", csv_path.display()))
    );

    if config.output.write_geojson {
        let map_path = GeoJsonExporter::new(true).write_file(
            &result.table,
            out_dir,
            &config.output.geojson_file_name,
        )?;
        files.push(config.output.geojson_file_name.clone());
        println!(
            "{}",
            format_success(&format!("Cluster map: {}", map_path.display()))
        );
    }

    if config.output.write_manifest {
        let manifest = RunManifest::new(
            &bytes,
            &result.table,
            &result.stats,
            config.clustering.seed,
            files,
        );
        let manifest_path = manifest.write(out_dir)?;
        println!(
            "{}",
            format_success(&format!("Run manifest: {}", manifest_path.display()))
        );
    }

    timer.finish();

    info!(
        "Run complete: {} of {} rows kept ({:.1}%), {:.0} rows/sec",
        result.stats.rows_kept,
        result.stats.rows_read,
        result.stats.retention_rate(),
        result.stats.rows_per_second()
    );

    Ok(())
}
