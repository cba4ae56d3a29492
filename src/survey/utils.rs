use calamine::Data;

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Coerce a spreadsheet cell to `f64`.
///
/// Numeric cells pass through, text cells are cleaned and parsed, and every
/// other cell kind (empty, bool, dates, `#N/A`-style errors) is treated as missing.
/// NaN is reported as missing too, matching how a blank cell would be read.
pub fn parse_numeric_cell(cell: &Data) -> Option<f64> {
    let v = match cell {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        Data::String(s) => clean_str(s).parse::<f64>().ok()?,
        _ => return None,
    };
    (!v.is_nan()).then_some(v)
}

/// Header cells are matched by their trimmed text.
pub fn header_name(cell: &Data) -> String {
    match cell {
        Data::String(s) => clean_str(s),
        Data::Empty => String::new(),
        other => clean_str(&other.to_string()),
    }
}
