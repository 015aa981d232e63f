// file: tests/pipeline_test.rs
// description: end-to-end checks from raw delimited text to exported outputs

use mobility_cluster::config::Delimiter;
use mobility_cluster::exporter::geojson::FeatureCollection;
use mobility_cluster::{
    ClusterCount, ClusterPipeline, ClusteringConfig, ColumnSelection, CsvExporter, PipelineError,
    TableReader,
};
use pretty_assertions::assert_eq;
use std::collections::{HashMap, HashSet};

const TRIPS: &str = "\
trip_id,pickup_lat,pickup_lon,fare
t1,40.7580,-73.9855,12.5
t2,40.7585,-73.9850,9.0
t3,40.6413,-73.7781,52.0
t4,,-73.7790,48.0
t5,40.6420,-73.7785,55.5
t6,north,-73.9860,10.0
t7,\"40.7579\",-73.9849,8.0
t8,40.6418,-73.7779,51.0
";

fn run(csv: &str, lat: &str, lon: &str, k: usize) -> mobility_cluster::Result<mobility_cluster::ProcessingResult> {
    let table = TableReader::default().parse(csv.as_bytes())?;
    ClusterPipeline::new(ClusteringConfig::default()).run(
        &table,
        &ColumnSelection::new(lat, lon),
        ClusterCount::new(k)?,
    )
}

#[test]
fn test_trips_split_into_midtown_and_airport() {
    let result = run(TRIPS, "pickup_lat", "pickup_lon", 2).unwrap();

    let rows: Vec<usize> = result.table.points.iter().map(|p| p.source_row).collect();
    assert_eq!(rows, vec![0, 1, 2, 4, 6, 7]);
    assert_eq!(result.stats.rows_missing, 1);
    assert_eq!(result.stats.rows_non_numeric, 1);

    // airport (lower latitude) sorts first
    let by_row: HashMap<usize, usize> = result
        .table
        .points
        .iter()
        .map(|p| (p.source_row, p.cluster))
        .collect();
    assert_eq!(by_row[&2], 0);
    assert_eq!(by_row[&4], 0);
    assert_eq!(by_row[&7], 0);
    assert_eq!(by_row[&0], 1);
    assert_eq!(by_row[&1], 1);
    assert_eq!(by_row[&6], 1);
}

#[test]
fn test_output_rows_match_valid_input_rows() {
    let result = run(TRIPS, "pickup_lat", "pickup_lon", 3).unwrap();
    assert_eq!(result.table.len(), 6);
    assert_eq!(result.table.dropped, 2);
    assert!(result.table.labels().iter().all(|&l| l < 3));
}

#[test]
fn test_same_column_twice_is_rejected() {
    let err = run(TRIPS, "pickup_lat", "pickup_lat", 2).unwrap_err();
    assert!(matches!(err, PipelineError::IdenticalColumns(_)));
    assert!(err.is_user_error());
}

#[test]
fn test_non_coordinate_columns_give_no_valid_data() {
    let err = run(TRIPS, "trip_id", "pickup_lon", 2).unwrap_err();
    assert!(matches!(err, PipelineError::NoValidData { total_rows: 8 }));
}

#[test]
fn test_identical_runs_give_identical_labels() {
    let first = run(TRIPS, "pickup_lat", "pickup_lon", 4).unwrap();
    let second = run(TRIPS, "pickup_lat", "pickup_lon", 4).unwrap();
    assert_eq!(first.table.points, second.table.points);
}

#[test]
fn test_shuffled_rows_keep_grouping_and_labels() {
    let mut lines: Vec<&str> = TRIPS.lines().collect();
    let header = lines.remove(0);
    lines.reverse();
    let shuffled = format!("{}\n{}\n", header, lines.join("\n"));

    let forward = run(TRIPS, "pickup_lat", "pickup_lon", 2).unwrap();
    let backward = run(&shuffled, "pickup_lat", "pickup_lon", 2).unwrap();

    let key = |p: &mobility_cluster::LabeledPoint| {
        (p.latitude.to_bits(), p.longitude.to_bits(), p.cluster)
    };
    let a: HashSet<_> = forward.table.points.iter().map(key).collect();
    let b: HashSet<_> = backward.table.points.iter().map(key).collect();
    assert_eq!(a, b);
}

#[test]
fn test_semicolon_input_to_csv_output() {
    let input = "lat;lon\n1;1\n1.1;1.1\n50;50\n50.1;50.1\nNaN;2\n";
    let table = TableReader::new(Delimiter::Auto, true)
        .parse(input.as_bytes())
        .unwrap();
    let result = ClusterPipeline::new(ClusteringConfig::default())
        .run(
            &table,
            &ColumnSelection::new("lat", "lon"),
            ClusterCount::new(2).unwrap(),
        )
        .unwrap();

    assert_eq!(table.delimiter, b';');
    let csv = CsvExporter::new(table.delimiter)
        .to_string(&result.table)
        .unwrap();
    assert_eq!(
        csv,
        "lat;lon;cluster\n1.0;1.0;0\n1.1;1.1;0\n50.0;50.0;1\n50.1;50.1;1\n"
    );

    let reread = TableReader::default().parse(csv.as_bytes()).unwrap();
    assert_eq!(reread.delimiter, b';');
    assert_eq!(reread.headers, vec!["lat", "lon", "cluster"]);
    assert_eq!(reread.len(), 4);

    let map = FeatureCollection::from_table(&result.table);
    assert_eq!(map.features.len(), 4);
    let colors: HashSet<_> = map
        .features
        .iter()
        .map(|f| f.properties.marker_color)
        .collect();
    assert_eq!(colors.len(), 2);
}
