// file: src/utils/validation.rs
// description: input path and output location checks used by the command line layer
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::fs;
use std::path::Path;

/// Extensions accepted for delimiter-separated input.
const TABLE_EXTENSIONS: &[&str] = &["csv", "tsv", "txt", "psv"];

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            PipelineError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(PipelineError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    pub fn validate_table_extension(path: &Path) -> Result<()> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if TABLE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => Ok(()),
            _ => Err(PipelineError::Validation(format!(
                "File is not a delimiter-separated table (expected .{}): {}",
                TABLE_EXTENSIONS.join(", ."),
                path.display()
            ))),
        }
    }

    pub fn validate_content_not_empty(content: &[u8]) -> Result<()> {
        if content.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(PipelineError::Validation("Input is empty".to_string()));
        }
        Ok(())
    }

    /// Creates the directory when missing; fails if the path is a file.
    pub fn ensure_output_directory(path: &Path) -> Result<()> {
        if path.exists() && !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Output path is not a directory: {}",
                path.display()
            )));
        }

        fs::create_dir_all(path).map_err(|source| PipelineError::FileOperation {
            path: path.to_path_buf(),
            source,
        })
    }

    /// A bare file name, no directory components.
    pub fn validate_file_name(name: &str) -> Result<()> {
        let trimmed = name.trim();
        if trimmed.is_empty()
            || trimmed.contains('/')
            || trimmed.contains('\\')
            || trimmed == "."
            || trimmed == ".."
        {
            return Err(PipelineError::Validation(format!(
                "Invalid output file name: '{}'",
                name
            )));
        }
        Ok(())
    }

    /// Shorten `text` to at most `max_chars` characters, marking the cut.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            text.to_string()
        } else {
            let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
            format!("{}…", cut)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_file_path() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("points.csv");
        fs::write(&file_path, "lat,lon").unwrap();

        assert!(Validator::validate_file_path(&file_path).is_ok());
        assert!(Validator::validate_file_path(temp.path()).is_err());
        assert!(Validator::validate_file_path(Path::new("/nonexistent/points.csv")).is_err());
    }

    #[test]
    fn test_validate_table_extension() {
        assert!(Validator::validate_table_extension(Path::new("trips.csv")).is_ok());
        assert!(Validator::validate_table_extension(Path::new("trips.CSV")).is_ok());
        assert!(Validator::validate_table_extension(Path::new("trips.tsv")).is_ok());
        assert!(Validator::validate_table_extension(Path::new("trips.xlsx")).is_err());
        assert!(Validator::validate_table_extension(Path::new("trips")).is_err());
    }

    #[test]
    fn test_validate_content_not_empty() {
        assert!(Validator::validate_content_not_empty(b"lat,lon").is_ok());
        assert!(Validator::validate_content_not_empty(b"").is_err());
        assert!(Validator::validate_content_not_empty(b" \n\t").is_err());
    }

    #[test]
    fn test_ensure_output_directory() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a/b");
        assert!(Validator::ensure_output_directory(&nested).is_ok());
        assert!(nested.is_dir());

        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(Validator::ensure_output_directory(&file).is_err());
    }

    #[test]
    fn test_validate_file_name() {
        assert!(Validator::validate_file_name("clustered_data.csv").is_ok());
        assert!(Validator::validate_file_name("../escape.csv").is_err());
        assert!(Validator::validate_file_name("  ").is_err());
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(Validator::truncate_text("a long street name", 6), "a lon…");
        assert_eq!(Validator::truncate_text("Zürich-Höngg", 4), "Zür…");
    }
}
