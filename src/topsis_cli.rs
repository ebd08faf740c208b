pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;
pub mod io_output;

use log::{debug, info, warn};
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde_json::Value as JSValue;
use text_diff::print_diff;
use topsis::*;

use crate::args::Args;
use crate::topsis_cli::config_reader::*;
use crate::topsis_cli::io_common::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TopsisCliError {
    // Input files
    #[snafu(display("Input file not found: {path}"))]
    MissingInputFile { path: String },
    #[snafu(display("Unsupported file format {format:?} for {path}: use csv or xlsx"))]
    UnsupportedFormat { path: String, format: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Cannot find worksheet {name:?} in {path}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display(
        "{path} contains several worksheets, the worksheet name must be provided"
    ))]
    AmbiguousWorksheet { path: String },
    #[snafu(display("Error opening {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },

    // Content of the decision matrix
    #[snafu(display("Input file {path} does not contain any alternative"))]
    EmptyTable { path: String },
    #[snafu(display(
        "Input file must contain at least 2 columns (alternatives and a criterion), found {found}"
    ))]
    TooFewColumns { found: usize },
    #[snafu(display(
        "The column of the alternatives ({index}) is outside of the table ({num_cols} columns)"
    ))]
    IdColumnOutOfRange { index: usize, num_cols: usize },
    #[snafu(display("Line {lineno} has {found} columns, expected {expected} columns"))]
    RowLengthMismatch {
        lineno: usize,
        expected: usize,
        found: usize,
    },
    #[snafu(display(
        "Column {column:?} must contain numeric values only: found {content:?} on line {lineno}"
    ))]
    NonNumericCell {
        column: String,
        lineno: usize,
        content: String,
    },
    #[snafu(display("Cannot find the column of criterion {name:?} in the header"))]
    MissingCriterionColumn { name: String },

    // Parameters
    #[snafu(display(
        "Number of weights ({found}) must equal the number of criteria columns ({expected})"
    ))]
    WeightCount { expected: usize, found: usize },
    #[snafu(display(
        "Number of impacts ({found}) must equal the number of criteria columns ({expected})"
    ))]
    ImpactCount { expected: usize, found: usize },
    #[snafu(display("Missing parameter: {name}"))]
    MissingParameter { name: String },
    #[snafu(display("Weight #{position} is not a number: {content:?}"))]
    InvalidWeight { position: usize, content: String },
    #[snafu(display("Weight #{position} must be strictly positive, got {value}"))]
    NonPositiveWeight { position: usize, value: f64 },
    #[snafu(display("Impact #{position} must be '+' or '-', got {content:?}"))]
    InvalidImpact { position: usize, content: String },
    #[snafu(display("Unknown value {value:?} for option {name}"))]
    UnknownRule { name: String, value: String },
    #[snafu(display("Cannot understand the column index {content}"))]
    InvalidColumnIndex { content: String },
    #[snafu(display("The scores can have at most {max} decimals, got {value}"))]
    TooManyDecimals { value: usize, max: usize },
    #[snafu(display("An output path is required to write {format} files"))]
    MissingOutputPath { format: String },

    // Computation
    #[snafu(display("TOPSIS computation failed: {source}"))]
    Computation { source: TopsisError },

    // Output
    #[snafu(display("Error writing the result to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing a CSV record"))]
    WritingCsv { source: csv::Error },
    #[snafu(display("Error writing the JSON summary"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Error writing the Excel file {path}"))]
    WritingExcel {
        source: rust_xlsxwriter::XlsxError,
        path: String,
    },
    #[snafu(display("Difference detected between the result and the reference {path}"))]
    ReferenceMismatch { path: String },
}

/// The broad families of errors, for the callers that need to react to the cause of a failure.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ErrorKind {
    /// The input file cannot be found, opened or decoded.
    InputFormat,
    /// The input file does not have the expected columns or contains non-numeric criteria.
    Schema,
    /// The weights or the impacts do not match the number of criteria.
    ParameterCount,
    /// A weight, an impact or an option has an invalid value.
    ParameterValue,
    /// The data does not allow a ranking (all-zero criterion, identical alternatives).
    DegenerateData,
    /// The result could not be written or does not match the reference.
    Output,
}

impl TopsisCliError {
    pub fn kind(&self) -> ErrorKind {
        use TopsisCliError::*;
        match self {
            MissingInputFile { .. }
            | UnsupportedFormat { .. }
            | CsvOpen { .. }
            | CsvLineParse { .. }
            | OpeningExcel { .. }
            | MissingWorksheet { .. }
            | AmbiguousWorksheet { .. }
            | OpeningFile { .. }
            | ParsingJson { .. } => ErrorKind::InputFormat,
            EmptyTable { .. }
            | TooFewColumns { .. }
            | IdColumnOutOfRange { .. }
            | RowLengthMismatch { .. }
            | NonNumericCell { .. }
            | MissingCriterionColumn { .. } => ErrorKind::Schema,
            WeightCount { .. } | ImpactCount { .. } => ErrorKind::ParameterCount,
            MissingParameter { .. }
            | InvalidWeight { .. }
            | NonPositiveWeight { .. }
            | InvalidImpact { .. }
            | UnknownRule { .. }
            | InvalidColumnIndex { .. }
            | TooManyDecimals { .. }
            | MissingOutputPath { .. } => ErrorKind::ParameterValue,
            Computation { source } if source.is_degenerate() => ErrorKind::DegenerateData,
            Computation { .. } => ErrorKind::Schema,
            WritingOutput { .. }
            | WritingCsv { .. }
            | WritingJson { .. }
            | WritingExcel { .. }
            | ReferenceMismatch { .. } => ErrorKind::Output,
        }
    }
}

pub type CliResult<T> = Result<T, TopsisCliError>;

/// A criterion after matching it with the columns of the input.
#[derive(PartialEq, Debug, Clone)]
pub struct ResolvedCriterion {
    pub column: usize,
    pub name: String,
    pub weight: f64,
    pub impact: Impact,
}

// The criteria, before looking at the content of the input file.
#[derive(PartialEq, Debug, Clone)]
enum CriteriaSelection {
    // Explicit list of column names.
    Named(Vec<(String, f64, Impact)>),
    // All the columns except the alternatives, in order.
    Positional {
        weights: Vec<f64>,
        impacts: Vec<Impact>,
    },
}

/// Parses a list of comma-separated weights, such as `1, 1,2`.
pub fn parse_weights(s: &str) -> CliResult<Vec<f64>> {
    ensure!(
        !s.trim().is_empty(),
        MissingParameterSnafu { name: "weights" }
    );
    s.split(',')
        .enumerate()
        .map(|(idx, w)| parse_weight(idx + 1, w))
        .collect()
}

fn parse_weight(position: usize, content: &str) -> CliResult<f64> {
    let value = content
        .trim()
        .parse::<f64>()
        .ok()
        .context(InvalidWeightSnafu { position, content })?;
    ensure!(
        value > 0.0 && value.is_finite(),
        NonPositiveWeightSnafu { position, value }
    );
    Ok(value)
}

/// Parses a list of comma-separated impacts, such as `+,+,-`.
pub fn parse_impacts(s: &str) -> CliResult<Vec<Impact>> {
    ensure!(
        !s.trim().is_empty(),
        MissingParameterSnafu { name: "impacts" }
    );
    s.split(',')
        .enumerate()
        .map(|(idx, i)| parse_impact(idx + 1, i))
        .collect()
}

fn parse_impact(position: usize, content: &str) -> CliResult<Impact> {
    Impact::from_symbol(content.trim()).context(InvalidImpactSnafu { position, content })
}

fn validate_rules(rules: &TopsisRulesConfig) -> CliResult<TopsisRules> {
    let weight_normalization = match rules.weight_normalization.as_deref() {
        None | Some("raw") => WeightNormalization::Raw,
        Some("sumToOne") => WeightNormalization::SumToOne,
        Some(x) => {
            return UnknownRuleSnafu {
                name: "weightNormalization",
                value: x,
            }
            .fail()
        }
    };
    let tie_mode = match rules.tie_mode.as_deref() {
        None | Some("max") => TieMode::Max,
        Some("min") => TieMode::Min,
        Some(x) => {
            return UnknownRuleSnafu {
                name: "tieMode",
                value: x,
            }
            .fail()
        }
    };
    Ok(TopsisRules {
        weight_normalization,
        tie_mode,
    })
}

fn read_criteria_selection(config: &TopsisConfig) -> CliResult<CriteriaSelection> {
    if let Some(criteria) = &config.criteria {
        let mut res: Vec<(String, f64, Impact)> = Vec::new();
        for (idx, c) in criteria.iter().enumerate() {
            let weight = match &c.weight {
                JSValue::Number(n) => {
                    let value = n.as_f64().context(InvalidWeightSnafu {
                        position: idx + 1,
                        content: n.to_string(),
                    })?;
                    ensure!(
                        value > 0.0,
                        NonPositiveWeightSnafu {
                            position: idx + 1,
                            value
                        }
                    );
                    value
                }
                JSValue::String(s) => parse_weight(idx + 1, s)?,
                x => {
                    return InvalidWeightSnafu {
                        position: idx + 1,
                        content: x.to_string(),
                    }
                    .fail()
                }
            };
            let impact = parse_impact(idx + 1, &c.impact)?;
            res.push((c.name.clone(), weight, impact));
        }
        return Ok(CriteriaSelection::Named(res));
    }
    let weights = parse_weights(
        config
            .weights
            .as_deref()
            .context(MissingParameterSnafu { name: "weights" })?,
    )?;
    let impacts = parse_impacts(
        config
            .impacts
            .as_deref()
            .context(MissingParameterSnafu { name: "impacts" })?,
    )?;
    Ok(CriteriaSelection::Positional { weights, impacts })
}

/// Matches the criteria with the columns of the header.
fn resolve_criteria(
    selection: &CriteriaSelection,
    header: &[String],
    id_col: usize,
) -> CliResult<Vec<ResolvedCriterion>> {
    ensure!(
        header.len() >= 2,
        TooFewColumnsSnafu {
            found: header.len()
        }
    );
    ensure!(
        id_col < header.len(),
        IdColumnOutOfRangeSnafu {
            index: id_col + 1,
            num_cols: header.len()
        }
    );
    match selection {
        CriteriaSelection::Named(criteria) => {
            let mut res: Vec<ResolvedCriterion> = Vec::new();
            for (name, weight, impact) in criteria.iter() {
                let column = header
                    .iter()
                    .position(|h| h.trim() == name.trim())
                    .context(MissingCriterionColumnSnafu { name })?;
                res.push(ResolvedCriterion {
                    column,
                    name: name.clone(),
                    weight: *weight,
                    impact: *impact,
                });
            }
            Ok(res)
        }
        CriteriaSelection::Positional { weights, impacts } => {
            let columns: Vec<usize> = (0..header.len()).filter(|c| *c != id_col).collect();
            ensure!(
                weights.len() == columns.len(),
                WeightCountSnafu {
                    expected: columns.len(),
                    found: weights.len()
                }
            );
            ensure!(
                impacts.len() == columns.len(),
                ImpactCountSnafu {
                    expected: columns.len(),
                    found: impacts.len()
                }
            );
            Ok(columns
                .iter()
                .zip(weights.iter().zip(impacts.iter()))
                .map(|(&column, (&weight, &impact))| ResolvedCriterion {
                    column,
                    name: header[column].clone(),
                    weight,
                    impact,
                })
                .collect())
        }
    }
}

/// Extracts the names of the alternatives and the decision matrix from the table.
fn build_matrix(
    table: &ParsedTable,
    id_col: usize,
    criteria: &[ResolvedCriterion],
) -> CliResult<(Vec<String>, DecisionMatrix)> {
    let num_cols = table.header.len();
    let mut names: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for row in table.rows.iter() {
        ensure!(
            row.cells.len() == num_cols,
            RowLengthMismatchSnafu {
                lineno: row.lineno,
                expected: num_cols,
                found: row.cells.len()
            }
        );
        let mut values: Vec<f64> = Vec::with_capacity(criteria.len());
        for c in criteria.iter() {
            let cell = &row.cells[c.column];
            let x = cell.as_number().context(NonNumericCellSnafu {
                column: c.name.clone(),
                lineno: row.lineno,
                content: cell.to_output(),
            })?;
            values.push(x);
        }
        names.push(row.cells[id_col].to_output());
        rows.push(values);
    }
    let matrix = DecisionMatrix::new(&rows).context(ComputationSnafu {})?;
    Ok((names, matrix))
}

fn read_table(source: &InputSource) -> CliResult<ParsedTable> {
    let path = source.file_path.clone();
    ensure!(
        Path::new(&path).is_file(),
        MissingInputFileSnafu { path: path.clone() }
    );
    let provider = match source.provider.clone() {
        Some(p) => p,
        None => file_extension(&path),
    };
    info!("Attempting to read {:?} file {:?}", provider, path);
    let table = match provider.as_str() {
        "csv" => io_csv::read_csv_table(&path)?,
        "xlsx" | "excel" => io_excel::read_excel_table(&path, source)?,
        x => {
            return UnsupportedFormatSnafu {
                path: path.clone(),
                format: x,
            }
            .fail()
        }
    };
    ensure!(!table.rows.is_empty(), EmptyTableSnafu { path });
    Ok(table)
}

/// Runs a ranking job and returns the rendered result.
///
/// The result is written to the output path of the configuration, or to the standard output.
/// If a reference path is given, the result is compared with the content of that file.
/// Excel workbooks are compared through their CSV rendering, which holds the same cells.
pub fn run_job(config: &TopsisConfig, check_reference_path: Option<String>) -> CliResult<String> {
    debug!("run_job: config: {:?}", config);
    let rules = validate_rules(&config.rules)?;
    let selection = read_criteria_selection(config)?;
    let settings = &config.output_settings;
    let format = settings.format()?;
    let decimals = settings.score_decimals()?;
    ensure!(
        format != OutputFormat::Xlsx || settings.output_file().is_some(),
        MissingOutputPathSnafu { format: "xlsx" }
    );

    let table = read_table(&config.input_source)?;
    let id_col = config.input_source.id_column_index_int()?;
    let criteria = resolve_criteria(&selection, &table.header, id_col)?;
    debug!("run_job: criteria: {:?}", criteria);
    let (names, matrix) = build_matrix(&table, id_col, &criteria)?;
    info!(
        "Read {} alternatives and {} criteria",
        matrix.num_rows(),
        matrix.num_cols()
    );

    let weights: Vec<f64> = criteria.iter().map(|c| c.weight).collect();
    let impacts: Vec<Impact> = criteria.iter().map(|c| c.impact).collect();
    let result = run_topsis(&matrix, &weights, &impacts, &rules).context(ComputationSnafu {})?;
    log_ranking(&names, &result);

    let rendered = match format {
        OutputFormat::Csv | OutputFormat::Xlsx => io_output::render_csv(&table, &result, settings)?,
        OutputFormat::Json => io_output::render_json(
            &config.input_source,
            &rules,
            &criteria,
            &names,
            &result,
            decimals,
        )?,
    };

    match (settings.output_file(), format) {
        (None, _) => {
            println!("{}", rendered.trim_end());
        }
        (Some(path), OutputFormat::Xlsx) => {
            info!("Writing the result to the workbook {:?}", path);
            io_output::write_xlsx(path, &table, &result, settings)?;
        }
        (Some(path), _) => {
            info!("Writing the result to {:?}", path);
            fs::write(path, &rendered).context(WritingOutputSnafu { path })?;
        }
    }

    // The reference result, if provided for comparison
    if let Some(reference_path) = check_reference_path {
        check_reference(&rendered, &reference_path)?;
    }
    Ok(rendered)
}

fn log_ranking(names: &[String], result: &TopsisResult) {
    let mut order: Vec<usize> = (0..names.len()).collect();
    order.sort_by_key(|&idx| result.scores[idx].rank);
    for idx in order {
        let s = result.scores[idx];
        info!("Rank {}: {} (score {:.4})", s.rank, names[idx], s.closeness);
    }
}

fn check_reference(rendered: &str, reference_path: &str) -> CliResult<()> {
    let reference = fs::read_to_string(reference_path).context(OpeningFileSnafu {
        path: reference_path,
    })?;
    let expected = normalize_line_endings(&reference);
    let actual = normalize_line_endings(rendered);
    if expected != actual {
        warn!("Found differences with the reference {:?}", reference_path);
        print_diff(expected.as_str(), actual.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("The result matches the reference {:?}", reference_path);
    Ok(())
}

fn normalize_line_endings(s: &str) -> String {
    s.replace("\r\n", "\n").trim_end().to_string()
}

/// Assembles the job from the command line, with or without a configuration file.
pub fn job_from_args(args: &Args) -> CliResult<TopsisConfig> {
    let mut config = match &args.config {
        Some(config_path) => read_config(config_path)?,
        None => {
            let input = args
                .input
                .clone()
                .context(MissingParameterSnafu { name: "input" })?;
            TopsisConfig::from_input(input)
        }
    };
    if let Some(input) = &args.input {
        config.input_source.file_path = input.clone();
    }
    if let Some(input_type) = &args.input_type {
        config.input_source.provider = Some(input_type.clone());
    }
    if let Some(name) = &args.excel_worksheet_name {
        config.input_source.excel_worksheet_name = Some(name.clone());
    }
    // Weights or impacts on the command line refer to the columns by position.
    if args.weights.is_some() || args.impacts.is_some() {
        config.criteria = None;
    }
    if let Some(weights) = &args.weights {
        config.weights = Some(weights.clone());
    }
    if let Some(impacts) = &args.impacts {
        config.impacts = Some(impacts.clone());
    }
    if let Some(out) = &args.out {
        config.output_settings.output_path = Some(out.clone());
    }
    if let Some(x) = &args.weight_normalization {
        config.rules.weight_normalization = Some(x.clone());
    }
    if let Some(x) = &args.tie_mode {
        config.rules.tie_mode = Some(x.clone());
    }
    if let Some(x) = args.score_decimals {
        config.output_settings.score_decimals = Some(x);
    }
    Ok(config)
}

pub fn run_from_args(args: &Args) -> CliResult<()> {
    let config = job_from_args(args)?;
    info!("config: {:?}", config);
    run_job(&config, args.reference.clone())?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_dir() -> String {
    option_env!("TOPSIS_TEST_DIR")
        .map(|s| s.to_string())
        .unwrap_or(format!("{}/tests/data", env!("CARGO_MANIFEST_DIR")))
}

#[cfg(test)]
fn run_job_test(test_name: &str, config_lpath: &str, reference_lpath: &str) -> CliResult<String> {
    let test_dir = test_dir();
    info!("Running test {}", test_name);
    let config = read_config(&format!("{}/{}/{}", test_dir, test_name, config_lpath))?;
    run_job(
        &config,
        Some(format!("{}/{}/{}", test_dir, test_name, reference_lpath)),
    )
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str, expected_ext: &str) {
    let _ = env_logger::try_init();
    let res = run_job_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected.{}", test_name, expected_ext).as_str(),
    );
    if let Err(e) = res {
        panic!("test {} failed: {}", test_name, e);
    }
}
