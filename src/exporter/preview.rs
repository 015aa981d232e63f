// file: src/exporter/preview.rs
// description: fixed-width text rendering of the first rows of a table
// reference: terminal table output for the raw and clustered views

use crate::exporter::csv_export::{CsvExporter, format_float};
use crate::models::{ClusteredTable, RawTable};
use crate::utils::Validator;
use colored::Colorize;

const MAX_CELL_CHARS: usize = 24;

#[derive(Debug, Clone)]
pub struct TablePreview {
    rows: usize,
}

impl TablePreview {
    pub fn new(rows: usize) -> Self {
        Self { rows }
    }

    /// First rows of the raw input, with their row index.
    pub fn raw(&self, table: &RawTable) -> String {
        let headers: Vec<String> = table.headers.clone();
        let rows: Vec<(usize, Vec<String>)> = table
            .rows
            .iter()
            .take(self.rows)
            .enumerate()
            .map(|(i, row)| {
                let cells = (0..headers.len())
                    .map(|c| row.get(c).cloned().unwrap_or_default())
                    .collect();
                (i, cells)
            })
            .collect();

        render(&headers, &rows, table.len())
    }

    /// First rows of the labeled table; the index is the raw row it came from.
    pub fn clustered(&self, table: &ClusteredTable) -> String {
        let headers: Vec<String> = CsvExporter::header(table).to_vec();
        let rows: Vec<(usize, Vec<String>)> = table
            .head(self.rows)
            .iter()
            .map(|p| {
                (
                    p.source_row,
                    vec![
                        format_float(p.latitude),
                        format_float(p.longitude),
                        p.cluster.to_string(),
                    ],
                )
            })
            .collect();

        render(&headers, &rows, table.len())
    }
}

impl Default for TablePreview {
    fn default() -> Self {
        Self::new(5)
    }
}

fn render(headers: &[String], rows: &[(usize, Vec<String>)], total: usize) -> String {
    let headers: Vec<String> = headers
        .iter()
        .map(|h| Validator::truncate_text(h, MAX_CELL_CHARS))
        .collect();
    let rows: Vec<(String, Vec<String>)> = rows
        .iter()
        .map(|(idx, cells)| {
            (
                idx.to_string(),
                cells
                    .iter()
                    .map(|c| Validator::truncate_text(c, MAX_CELL_CHARS))
                    .collect(),
            )
        })
        .collect();

    let index_width = rows.iter().map(|(i, _)| i.chars().count()).max().unwrap_or(0);
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(c, h)| {
            rows.iter()
                .filter_map(|(_, cells)| cells.get(c))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad_left(h, *w))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(&" ".repeat(index_width));
    out.push_str("  ");
    out.push_str(&header_line.bold().to_string());
    out.push('\n');

    for (idx, cells) in &rows {
        out.push_str(&pad_left(idx, index_width));
        out.push_str("  ");
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad_left(c, *w))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(&line);
        out.push('\n');
    }

    if total > rows.len() {
        out.push_str(&format!("[{} of {} rows shown]\n", rows.len(), total));
    }

    out
}

fn pad_left(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", " ".repeat(width.saturating_sub(len)), text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClusterCount, ColumnSelection, LabeledPoint};

    #[test]
    fn test_raw_preview_limits_rows() {
        colored::control::set_override(false);
        let table = RawTable::new(
            vec!["lat".to_string(), "lon".to_string()],
            (0..8)
                .map(|i| vec![format!("{}.5", i), "2".to_string()])
                .collect(),
        );

        let out = TablePreview::new(3).raw(&table);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "   lat  lon");
        assert_eq!(lines[1], "0  0.5    2");
        assert_eq!(lines[4], "[3 of 8 rows shown]");
    }

    #[test]
    fn test_clustered_preview_uses_source_rows() {
        colored::control::set_override(false);
        let table = ClusteredTable {
            columns: ColumnSelection::new("lat", "lon"),
            clusters: ClusterCount::new(2).unwrap(),
            points: vec![LabeledPoint {
                source_row: 12,
                latitude: 1.0,
                longitude: 2.25,
                cluster: 1,
            }],
            summaries: vec![],
            dropped: 0,
        };

        let out = TablePreview::default().clustered(&table);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "    lat   lon  cluster");
        assert_eq!(lines[1], "12  1.0  2.25        1");
    }
}
