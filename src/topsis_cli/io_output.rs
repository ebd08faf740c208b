// Writers for the results: the input table augmented with the scores (CSV or Excel), or a
// JSON summary.

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use serde_json::json;

use crate::topsis_cli::*;

/// The original table with two more columns: the score and the rank.
pub fn render_csv(
    table: &ParsedTable,
    result: &TopsisResult,
    settings: &OutputSettings,
) -> CliResult<String> {
    let decimals = settings.score_decimals()?;
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        let mut header = table.header.clone();
        header.push(settings.score_column_name());
        header.push(settings.rank_column_name());
        wtr.write_record(&header).context(WritingCsvSnafu {})?;
        for (row, score) in table.rows.iter().zip(result.scores.iter()) {
            let mut record: Vec<String> = row.cells.iter().map(|c| c.to_output()).collect();
            record.push(format!("{:.*}", decimals, score.closeness));
            record.push(score.rank.to_string());
            wtr.write_record(&record).context(WritingCsvSnafu {})?;
        }
        wtr.flush().context(WritingOutputSnafu { path: "buffer" })?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes the original table with the score and the rank columns to an Excel workbook.
///
/// The cells that hold numbers are written as numbers. The scores are rounded to the
/// configured number of decimals.
pub fn write_xlsx(
    path: &str,
    table: &ParsedTable,
    result: &TopsisResult,
    settings: &OutputSettings,
) -> CliResult<()> {
    let decimals = settings.score_decimals()?;
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    fill_worksheet(worksheet, table, result, settings, decimals)
        .context(WritingExcelSnafu { path })?;
    workbook.save(path).context(WritingExcelSnafu { path })?;
    Ok(())
}

fn fill_worksheet(
    worksheet: &mut Worksheet,
    table: &ParsedTable,
    result: &TopsisResult,
    settings: &OutputSettings,
    decimals: usize,
) -> Result<(), XlsxError> {
    worksheet.set_name("Results")?;
    let mut header = table.header.clone();
    header.push(settings.score_column_name());
    header.push(settings.rank_column_name());
    for (col, name) in header.iter().enumerate() {
        worksheet.write_string(0, xlsx_col(col), name.as_str())?;
    }
    let score_col = table.header.len();
    for (idx, (row, score)) in table.rows.iter().zip(result.scores.iter()).enumerate() {
        // The header is on the first row.
        let xrow = u32::try_from(idx + 1).unwrap_or(u32::MAX);
        for (col, cell) in row.cells.iter().enumerate() {
            match (cell, cell.as_number()) {
                (CellValue::Empty, _) => {}
                (_, Some(x)) => {
                    worksheet.write_number(xrow, xlsx_col(col), x)?;
                }
                (_, None) => {
                    worksheet.write_string(xrow, xlsx_col(col), cell.to_output().as_str())?;
                }
            }
        }
        let closeness = round_to(score.closeness, decimals);
        worksheet.write_number(xrow, xlsx_col(score_col), closeness)?;
        worksheet.write_number(xrow, xlsx_col(score_col + 1), f64::from(score.rank))?;
    }
    Ok(())
}

// Out of range columns are rejected by the writer.
fn xlsx_col(col: usize) -> u16 {
    u16::try_from(col).unwrap_or(u16::MAX)
}

/// A JSON summary of the ranking.
pub fn render_json(
    source: &InputSource,
    rules: &TopsisRules,
    criteria: &[ResolvedCriterion],
    names: &[String],
    result: &TopsisResult,
    decimals: usize,
) -> CliResult<String> {
    let criteria_js: Vec<JSValue> = criteria
        .iter()
        .map(|c| {
            json!({
                "name": c.name,
                "weight": c.weight,
                "impact": c.impact.symbol(),
            })
        })
        .collect();
    let results_js: Vec<JSValue> = names
        .iter()
        .zip(result.scores.iter())
        .map(|(name, s)| {
            json!({
                "alternative": name,
                "score": round_to(s.closeness, decimals),
                "rank": s.rank,
            })
        })
        .collect();
    let round_all = |v: &[f64]| -> Vec<f64> { v.iter().map(|x| round_to(*x, decimals)).collect() };
    let js = json!({
        "config": {
            "input": simplify_file_name(&source.file_path),
            "criteria": criteria_js,
            "weightNormalization": match rules.weight_normalization {
                WeightNormalization::Raw => "raw",
                WeightNormalization::SumToOne => "sumToOne",
            },
            "tieMode": match rules.tie_mode {
                TieMode::Max => "max",
                TieMode::Min => "min",
            },
        },
        "idealBest": round_all(&result.ideal_best),
        "idealWorst": round_all(&result.ideal_worst),
        "results": results_js,
    });
    let mut s = serde_json::to_string_pretty(&js).context(WritingJsonSnafu {})?;
    s.push('\n');
    Ok(s)
}

fn round_to(x: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (x * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        assert_eq!(round_to(0.45866, 4), 0.4587);
        assert_eq!(round_to(0.67978390387488, 2), 0.68);
        assert_eq!(round_to(1.0, 4), 1.0);
    }

    #[test]
    fn csv_with_quotes() {
        let table = ParsedTable {
            header: vec!["Name".to_string(), "Value".to_string()],
            rows: vec![
                ParsedRow {
                    lineno: 2,
                    cells: vec![CellValue::Text("a, b".to_string()), CellValue::Number(1.0)],
                },
                ParsedRow {
                    lineno: 3,
                    cells: vec![CellValue::Text("c".to_string()), CellValue::Number(2.0)],
                },
            ],
        };
        let result = TopsisResult {
            scores: vec![
                ScoreResult {
                    closeness: 0.0,
                    rank: 2,
                },
                ScoreResult {
                    closeness: 1.0,
                    rank: 1,
                },
            ],
            ideal_best: vec![1.0],
            ideal_worst: vec![0.5],
        };
        let mut settings = OutputSettings::default();
        settings.score_decimals = Some(2);
        let s = render_csv(&table, &result, &settings).unwrap();
        assert_eq!(
            s,
            "Name,Value,Topsis Score,Rank\n\"a, b\",1,0.00,2\nc,2,1.00,1\n"
        );
    }

    #[test]
    fn xlsx_round_trip() {
        let table = ParsedTable {
            header: vec!["Name".to_string(), "Value".to_string(), "Note".to_string()],
            rows: vec![
                ParsedRow {
                    lineno: 2,
                    cells: vec![
                        CellValue::Text("a".to_string()),
                        CellValue::Text("1.5".to_string()),
                        CellValue::Empty,
                    ],
                },
                ParsedRow {
                    lineno: 3,
                    cells: vec![
                        CellValue::Text("b".to_string()),
                        CellValue::Number(2.0),
                        CellValue::Text("cheap".to_string()),
                    ],
                },
            ],
        };
        let result = TopsisResult {
            scores: vec![
                ScoreResult {
                    closeness: 0.123456,
                    rank: 2,
                },
                ScoreResult {
                    closeness: 0.87654,
                    rank: 1,
                },
            ],
            ideal_best: vec![1.0],
            ideal_worst: vec![0.5],
        };
        let mut settings = OutputSettings::default();
        settings.rank_column_name = Some("Position".to_string());
        let path = std::env::temp_dir()
            .join("topsis_xlsx_round_trip.xlsx")
            .display()
            .to_string();
        write_xlsx(&path, &table, &result, &settings).unwrap();

        let source = InputSource::new(path.clone());
        let back = io_excel::read_excel_table(&path, &source).unwrap();
        assert_eq!(
            back.header,
            vec!["Name", "Value", "Note", "Topsis Score", "Position"]
        );
        assert_eq!(
            back.rows[0].cells,
            vec![
                CellValue::Text("a".to_string()),
                CellValue::Number(1.5),
                CellValue::Empty,
                CellValue::Number(0.1235),
                CellValue::Number(2.0),
            ]
        );
        assert_eq!(back.rows[1].cells[2], CellValue::Text("cheap".to_string()));
        assert_eq!(back.rows[1].cells[3], CellValue::Number(0.8765));
        assert_eq!(back.rows[1].cells[4], CellValue::Number(1.0));
    }
}
