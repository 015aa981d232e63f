// file: src/parser/mod.rs
// description: tabular input parsing module exports
// reference: internal module structure

pub mod numeric;
pub mod table_reader;

pub use numeric::{CellValue, coerce};
pub use table_reader::{TableReader, sniff_delimiter};
