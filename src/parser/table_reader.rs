// file: src/parser/table_reader.rs
// description: reads delimiter-separated text with a header row into a RawTable
// reference: https://docs.rs/csv

use crate::config::{Delimiter, InputConfig};
use crate::error::{PipelineError, Result};
use crate::models::RawTable;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Delimiters tried when sniffing, in tie-break order.
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

#[derive(Debug, Clone)]
pub struct TableReader {
    delimiter: Delimiter,
    has_headers: bool,
}

impl TableReader {
    pub fn new(delimiter: Delimiter, has_headers: bool) -> Self {
        Self {
            delimiter,
            has_headers,
        }
    }

    pub fn from_config(config: &InputConfig) -> Result<Self> {
        Ok(Self::new(config.delimiter()?, config.has_headers))
    }

    pub fn read_path(&self, path: &Path) -> Result<RawTable> {
        let bytes = fs::read(path).map_err(|source| PipelineError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(&bytes)
    }

    pub fn parse(&self, bytes: &[u8]) -> Result<RawTable> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let delimiter = match self.delimiter {
            Delimiter::Byte(b) => b,
            Delimiter::Auto => sniff_delimiter(bytes),
        };
        debug!("Reading table with delimiter {:?}", delimiter as char);

        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut records = rdr.byte_records();

        let headers: Vec<String> = if self.has_headers {
            match records.next() {
                Some(record) => {
                    let record = record?;
                    dedupe_headers(record.iter().map(lossy).collect())
                }
                None => {
                    return Err(PipelineError::Validation(
                        "Input has no header row".to_string(),
                    ));
                }
            }
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            // blank and whitespace-only lines
            if record.iter().all(|f| f.iter().all(u8::is_ascii_whitespace)) {
                continue;
            }
            rows.push(record.iter().map(lossy).collect::<Vec<_>>());
        }

        let headers = if self.has_headers {
            headers
        } else {
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            (0..width).map(|i| i.to_string()).collect()
        };

        if headers.is_empty() {
            return Err(PipelineError::Validation("Input has no columns".to_string()));
        }

        info!(
            "Loaded table: {} rows x {} columns",
            rows.len(),
            headers.len()
        );

        Ok(RawTable::new(headers, rows).with_delimiter(delimiter))
    }
}

impl Default for TableReader {
    fn default() -> Self {
        Self::new(Delimiter::Auto, true)
    }
}

fn lossy(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

/// Pick the candidate delimiter that appears most often, outside quotes,
/// on the first non-empty line. Falls back to a comma.
pub fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let line = bytes
        .split(|&b| b == b'\n')
        .find(|l| l.iter().any(|b| !b.is_ascii_whitespace()))
        .unwrap_or(&[]);

    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut in_quotes = false;
    for &b in line {
        if b == b'"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(i) = CANDIDATE_DELIMITERS.iter().position(|&d| d == b) {
            counts[i] += 1;
        }
    }

    // first candidate wins ties, so a plain comma file stays comma
    let mut best = 0;
    for i in 1..counts.len() {
        if counts[i] > counts[best] {
            best = i;
        }
    }

    if counts[best] == 0 {
        b','
    } else {
        CANDIDATE_DELIMITERS[best]
    }
}

/// Repeated names get a `.N` suffix so every column stays addressable.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut result = Vec::with_capacity(headers.len());

    for header in headers {
        let header = header.trim_start_matches('\u{feff}').to_string();
        let count = seen.entry(header.clone()).or_insert(0);
        if *count == 0 {
            result.push(header);
        } else {
            result.push(format!("{}.{}", header, count));
        }
        *count += 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_comma_table() {
        let input = b"name,latitude,longitude\nA,1.5,2.5\nB,3.5,4.5\n";
        let table = TableReader::default().parse(input).unwrap();

        assert_eq!(table.headers, vec!["name", "latitude", "longitude"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(1, "longitude").unwrap(), Some("4.5"));
    }

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter(b"a;b;c\n1;2;3\n"), b';');
        assert_eq!(sniff_delimiter(b"a\tb\n1\t2\n"), b'\t');
        assert_eq!(sniff_delimiter(b"\"x,y\"|b|c\n"), b'|');
        assert_eq!(sniff_delimiter(b"single\n1\n"), b',');
        assert_eq!(sniff_delimiter(b"\n\na,b\n"), b',');
    }

    #[test]
    fn test_semicolon_auto_detected() {
        let input = b"lat;lon\n51.5;-0.12\n";
        let table = TableReader::default().parse(input).unwrap();
        assert_eq!(table.headers, vec!["lat", "lon"]);
        assert_eq!(table.value(0, "lon").unwrap(), Some("-0.12"));
        assert_eq!(table.delimiter, b';');
    }

    #[test]
    fn test_explicit_delimiter_overrides_sniffing() {
        let input = b"a;b,c\n1;2,3\n";
        let table = TableReader::new(Delimiter::Byte(b','), true)
            .parse(input)
            .unwrap();
        assert_eq!(table.headers, vec!["a;b", "c"]);
        assert_eq!(table.delimiter, b',');
    }

    #[test]
    fn test_ragged_rows_and_blank_lines() {
        let input = b"lat,lon,note\n1,2\n\n3,4,x,extra\n";
        let table = TableReader::default().parse(input).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, "note").unwrap(), None);
        assert_eq!(table.value(1, "note").unwrap(), Some("x"));
    }

    #[test]
    fn test_whitespace_only_lines_are_skipped() {
        let input = b"lat,lon\n1,2\n   \n\t\n \r\n3,4\n";
        let table = TableReader::default().parse(input).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(1, "lat").unwrap(), Some("3"));
    }

    #[test]
    fn test_duplicate_headers_are_suffixed() {
        let input = b"lat,lat,lon\n1,2,3\n";
        let table = TableReader::default().parse(input).unwrap();
        assert_eq!(table.headers, vec!["lat", "lat.1", "lon"]);
    }

    #[test]
    fn test_bom_is_stripped() {
        let input = b"\xEF\xBB\xBFlat,lon\n1,2\n";
        let table = TableReader::default().parse(input).unwrap();
        assert_eq!(table.headers[0], "lat");
    }

    #[test]
    fn test_headerless_input_gets_positional_names() {
        let input = b"1,2\n3,4\n";
        let table = TableReader::new(Delimiter::Auto, false).parse(input).unwrap();
        assert_eq!(table.headers, vec!["0", "1"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(TableReader::default().parse(b"").is_err());
    }

    #[test]
    fn test_read_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("points.csv");
        fs::write(&path, "lat,lon\n1,2\n").unwrap();

        let table = TableReader::default().read_path(&path).unwrap();
        assert_eq!(table.len(), 1);

        let missing = TableReader::default().read_path(&temp.path().join("nope.csv"));
        assert!(matches!(missing, Err(PipelineError::FileOperation { .. })));
    }
}
