// file: src/parser/numeric.rs
// description: coercion of raw text cells into finite coordinates
// reference: missing-value tokens follow the common dataframe defaults

/// Tokens read as a missing value rather than as bad data.
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue {
    Number(f64),
    Missing,
    /// text that does not parse, or parses to an infinite value
    Invalid,
}

pub fn is_missing_token(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw)
}

/// Coerce one cell. `None` is an absent trailing field.
pub fn coerce(raw: Option<&str>) -> CellValue {
    let Some(raw) = raw else {
        return CellValue::Missing;
    };

    let trimmed = raw.trim();
    if is_missing_token(trimmed) {
        return CellValue::Missing;
    }

    match trimmed.parse::<f64>() {
        Ok(v) if v.is_nan() => CellValue::Missing,
        Ok(v) if v.is_finite() => CellValue::Number(v),
        _ => CellValue::Invalid,
    }
}
