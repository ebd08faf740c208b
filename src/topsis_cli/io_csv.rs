// Primitives for reading CSV files.

use crate::topsis_cli::{
    io_common::{CellValue, ParsedRow, ParsedTable},
    *,
};

/// Reads a CSV file. The first line is the header.
///
/// The cells are kept as text: they are written back unchanged in the output.
pub fn read_csv_table(path: &str) -> CliResult<ParsedTable> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();

    let header: Vec<String> = match records.next() {
        Some(line_r) => line_r
            .context(CsvLineParseSnafu { lineno: 1_usize })?
            .iter()
            .map(|s| s.to_string())
            .collect(),
        None => return EmptyTableSnafu { path }.fail(),
    };
    debug!("read_csv_table: header: {:?}", header);

    let mut rows: Vec<ParsedRow> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        // The reader skips blank lines: the line numbers come from the positions.
        let line = match line_r {
            Ok(line) => line,
            Err(e) => {
                let lineno = e.position().map(|p| p.line() as usize).unwrap_or(idx + 2);
                return Err(e).context(CsvLineParseSnafu { lineno });
            }
        };
        let lineno = line
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);
        debug!("read_csv_table: lineno: {:?} row: {:?}", lineno, line);
        // Lines with only separators.
        if line.iter().all(|s| s.trim().is_empty()) {
            continue;
        }
        let cells = line
            .iter()
            .map(|s| CellValue::Text(s.to_string()))
            .collect();
        rows.push(ParsedRow { lineno, cells });
    }
    Ok(ParsedTable { header, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_phones() {
        let path = format!("{}/phones_csv/data.csv", test_dir());
        let table = read_csv_table(&path).unwrap();
        assert_eq!(
            table.header,
            vec!["Model", "Price", "Storage", "Camera", "Looks"]
        );
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[0].lineno, 2);
        assert_eq!(table.rows[3].cells[0], CellValue::Text("M4".to_string()));
        assert_eq!(table.rows[3].cells[1].as_number(), Some(275.0));
    }

    #[test]
    fn line_numbers_after_blank_lines() {
        let path = format!("{}/errors/blank_line.csv", test_dir());
        let table = read_csv_table(&path).unwrap();
        let linenos: Vec<usize> = table.rows.iter().map(|r| r.lineno).collect();
        assert_eq!(linenos, vec![2, 4]);
    }

    #[test]
    fn header_only() {
        let path = format!("{}/errors/header_only.csv", test_dir());
        let table = read_csv_table(&path).unwrap();
        assert_eq!(table.header.len(), 3);
        assert!(table.rows.is_empty());
    }
}
