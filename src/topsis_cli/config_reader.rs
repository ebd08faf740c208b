use crate::topsis_cli::*;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum OutputFormat {
    Csv,
    Json,
    Xlsx,
}

/// Beyond this, the scores cannot be rounded in `f64`.
pub const MAX_SCORE_DECIMALS: usize = 15;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
    /// csv, json or xlsx. By default, inferred from the output path.
    #[serde(rename = "outputFormat")]
    pub output_format: Option<String>,
    #[serde(rename = "scoreDecimals")]
    pub score_decimals: Option<usize>,
    #[serde(rename = "scoreColumnName")]
    pub score_column_name: Option<String>,
    #[serde(rename = "rankColumnName")]
    pub rank_column_name: Option<String>,
}

impl OutputSettings {
    pub fn format(&self) -> CliResult<OutputFormat> {
        let format = match (&self.output_format, &self.output_path) {
            (Some(f), _) => f.to_lowercase(),
            (None, Some(p)) => file_extension(p),
            (None, None) => "csv".to_string(),
        };
        match format.as_str() {
            // No extension: plain CSV.
            "csv" | "" | "txt" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "xlsx" | "excel" => Ok(OutputFormat::Xlsx),
            x => UnsupportedFormatSnafu {
                path: self.output_path.clone().unwrap_or_default(),
                format: x,
            }
            .fail(),
        }
    }

    pub fn score_decimals(&self) -> CliResult<usize> {
        let value = self.score_decimals.unwrap_or(4);
        ensure!(
            value <= MAX_SCORE_DECIMALS,
            TooManyDecimalsSnafu {
                value,
                max: MAX_SCORE_DECIMALS
            }
        );
        Ok(value)
    }

    /// The file to write to, or None for the standard output.
    pub fn output_file(&self) -> Option<&str> {
        match self.output_path.as_deref() {
            None | Some("stdout") | Some("") => None,
            Some(path) => Some(path),
        }
    }

    pub fn score_column_name(&self) -> String {
        self.score_column_name
            .clone()
            .unwrap_or_else(|| "Topsis Score".to_string())
    }

    pub fn rank_column_name(&self) -> String {
        self.rank_column_name
            .clone()
            .unwrap_or_else(|| "Rank".to_string())
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InputSource {
    /// csv or xlsx. By default, inferred from the extension of the file.
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    /// The column with the names of the alternatives, starting at 1 (default 1).
    #[serde(rename = "idColumnIndex")]
    pub id_column_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl InputSource {
    pub fn new(file_path: String) -> InputSource {
        InputSource {
            provider: None,
            file_path,
            id_column_index: None,
            excel_worksheet_name: None,
        }
    }

    /// The 0-based index of the column of the alternatives.
    pub fn id_column_index_int(&self) -> CliResult<usize> {
        match &self.id_column_index {
            None => Ok(0),
            Some(_) => read_js_int(&self.id_column_index).map(|x| x - 1),
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CriterionConfig {
    /// The name of the column in the header of the input.
    pub name: String,
    /// A number, or a string containing a number.
    pub weight: JSValue,
    /// + or -
    pub impact: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopsisRulesConfig {
    #[serde(rename = "weightNormalization")]
    pub weight_normalization: Option<String>,
    #[serde(rename = "tieMode")]
    pub tie_mode: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TopsisConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "inputSource")]
    pub input_source: InputSource,
    pub criteria: Option<Vec<CriterionConfig>>,
    pub weights: Option<String>,
    pub impacts: Option<String>,
    #[serde(default)]
    pub rules: TopsisRulesConfig,
}

impl TopsisConfig {
    /// A job that only knows its input file.
    pub fn from_input(file_path: String) -> TopsisConfig {
        TopsisConfig {
            output_settings: OutputSettings::default(),
            input_source: InputSource::new(file_path),
            criteria: None,
            weights: None,
            impacts: None,
            rules: TopsisRulesConfig::default(),
        }
    }
}

/// Reads a job file. The paths it contains are resolved against its directory.
pub fn read_config(path: &str) -> CliResult<TopsisConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let mut config: TopsisConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    let root: PathBuf = Path::new(path)
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();
    config.input_source.file_path = resolve_path(&root, &config.input_source.file_path);
    if let Some(p) = config.output_settings.output_path.clone() {
        if p != "stdout" && !p.is_empty() {
            config.output_settings.output_path = Some(resolve_path(&root, &p));
        }
    }
    Ok(config)
}

fn resolve_path(root: &Path, p: &str) -> String {
    // An absolute path replaces the root.
    root.join(p).as_path().display().to_string()
}

fn read_js_int(x: &Option<JSValue>) -> CliResult<usize> {
    let content = format!("{:?}", x);
    let res = match x {
        Some(JSValue::Number(n)) => n.as_u64().map(|x| x as usize),
        // Parsing the Excel-style columns: A, B, ..., Z, AA, AB, ...
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            s.to_ascii_lowercase().chars().try_fold(0_usize, |acc, c| {
                acc.checked_mul(26)?
                    .checked_add(c as usize - 'a' as usize + 1)
            })
        }
        Some(JSValue::String(s)) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    match res {
        // Column indexes start at 1.
        Some(x) if x >= 1 => Ok(x),
        _ => InvalidColumnIndexSnafu { content }.fail(),
    }
}
