// Primitives for reading Excel (.xlsx) files.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::topsis_cli::{
    io_common::{CellValue, ParsedRow, ParsedTable},
    *,
};

/// Reads the worksheet of an Excel file. The first row is the header.
pub fn read_excel_table(path: &str, source: &InputSource) -> CliResult<ParsedTable> {
    let wrange = get_range(path, source)?;
    // The range starts at the first non-empty row of the worksheet.
    let first_row = wrange.start().map(|(row, _)| row as usize).unwrap_or(0);

    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(EmptyTableSnafu { path })?
        .iter()
        .map(read_header_cell)
        .collect();
    debug!("read_excel_table: header: {:?}", header);

    let mut rows: Vec<ParsedRow> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = first_row + idx + 2;
        debug!("read_excel_table: lineno: {:?} row: {:?}", lineno, row);
        let cells: Vec<CellValue> = row.iter().map(read_cell).collect();
        if cells.iter().all(|c| *c == CellValue::Empty) {
            continue;
        }
        rows.push(ParsedRow { lineno, cells });
    }
    Ok(ParsedTable { header, rows })
}

fn read_header_cell(cell: &DataType) -> String {
    read_cell(cell).to_output()
}

fn read_cell(cell: &DataType) -> CellValue {
    match cell {
        DataType::Float(f) => CellValue::Number(*f),
        DataType::Int(i) => CellValue::Number(*i as f64),
        DataType::String(s) => CellValue::Text(s.clone()),
        DataType::Empty => CellValue::Empty,
        DataType::Bool(b) => CellValue::Text(b.to_string()),
        // Dates and formula errors are not criteria values, they are kept as text and
        // rejected if used as a criterion.
        x => CellValue::Text(format!("{:?}", x)),
    }
}

fn get_range(path: &str, source: &InputSource) -> CliResult<calamine::Range<DataType>> {
    let worksheet_name_o = source.excel_worksheet_name.clone();
    debug!(
        "read_excel_table: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                name: worksheet_name.clone(),
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyTableSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!(
                    "read_excel_table: path: {:?} worksheet: {:?}",
                    &path, &worksheet_name
                );
                Ok(wrange.clone())
            }
            _ => AmbiguousWorksheetSnafu { path }.fail(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_phones() {
        let path = format!("{}/phones_xlsx/data.xlsx", test_dir());
        let source = InputSource::new(path.clone());
        let table = read_excel_table(&path, &source).unwrap();
        assert_eq!(
            table.header,
            vec!["Model", "Price", "Storage", "Camera", "Looks"]
        );
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[0].cells[0], CellValue::Text("M1".to_string()));
        assert_eq!(table.rows[0].cells[1], CellValue::Number(250.0));
    }

    #[test]
    fn rows_after_blank_rows() {
        let path = format!("{}/errors/offset.xlsx", test_dir());
        let source = InputSource::new(path.clone());
        let table = read_excel_table(&path, &source).unwrap();
        assert_eq!(table.header, vec!["Model", "Price", "Battery"]);
        let linenos: Vec<usize> = table.rows.iter().map(|r| r.lineno).collect();
        assert_eq!(linenos, vec![4, 5]);
    }

    #[test]
    fn missing_worksheet() {
        let path = format!("{}/phones_xlsx/data.xlsx", test_dir());
        let mut source = InputSource::new(path.clone());
        source.excel_worksheet_name = Some("Results".to_string());
        let e = read_excel_table(&path, &source).unwrap_err();
        assert!(matches!(e, TopsisCliError::MissingWorksheet { .. }));
    }

    #[test]
    fn named_worksheet() {
        let path = format!("{}/phones_xlsx/data.xlsx", test_dir());
        let mut source = InputSource::new(path.clone());
        source.excel_worksheet_name = Some("Sheet1".to_string());
        let table = read_excel_table(&path, &source).unwrap();
        assert_eq!(table.rows.len(), 4);
    }
}
