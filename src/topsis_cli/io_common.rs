use std::path::Path;

/// The content of a cell, as read from the input file.
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// The finite number in this cell, if any. Text cells are parsed.
    pub fn as_number(&self) -> Option<f64> {
        let x = match self {
            CellValue::Number(x) => *x,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Empty => return None,
        };
        if x.is_finite() {
            Some(x)
        } else {
            None
        }
    }

    /// The cell as it should be written back in the output.
    pub fn to_output(&self) -> String {
        match self {
            CellValue::Number(x) => x.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => "".to_string(),
        }
    }
}

/// A row of the input, as parsed by the readers.
#[derive(PartialEq, Debug, Clone)]
pub struct ParsedRow {
    /// The line number in the input, starting at 1 with the header.
    pub lineno: usize,
    pub cells: Vec<CellValue>,
}

/// A table, as parsed by the readers.
/// This is before selecting the criteria or checking that they are numeric.
#[derive(PartialEq, Debug, Clone)]
pub struct ParsedTable {
    pub header: Vec<String>,
    pub rows: Vec<ParsedRow>,
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// The lowercase extension of a file, used to guess the format of a file.
pub fn file_extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_in_cells() {
        assert_eq!(CellValue::Number(2.5).as_number(), Some(2.5));
        assert_eq!(CellValue::Text(" 12 ".to_string()).as_number(), Some(12.0));
        assert_eq!(CellValue::Text("1e3".to_string()).as_number(), Some(1000.0));
        assert_eq!(CellValue::Text("abc".to_string()).as_number(), None);
        assert_eq!(CellValue::Text("NaN".to_string()).as_number(), None);
        assert_eq!(CellValue::Text("inf".to_string()).as_number(), None);
        assert_eq!(CellValue::Empty.as_number(), None);
    }

    #[test]
    fn output_of_cells() {
        assert_eq!(CellValue::Number(250.0).to_output(), "250");
        assert_eq!(CellValue::Number(0.5).to_output(), "0.5");
        assert_eq!(CellValue::Text("M1".to_string()).to_output(), "M1");
        assert_eq!(CellValue::Empty.to_output(), "");
    }

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("/tmp/data/phones.csv"), "phones.csv");
        assert_eq!(file_extension("/tmp/data/phones.XLSX"), "xlsx");
        assert_eq!(file_extension("phones"), "");
    }
}
