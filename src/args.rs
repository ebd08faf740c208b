use clap::Parser;

/// This is a program to rank alternatives against several criteria with the TOPSIS method.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the ranking job. The paths it contains are
    /// relative to the location of this file. The other options override its content.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The file containing the decision matrix: one row per alternative, the first
    /// column with the names of the alternatives and the other columns with the criteria.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx, default inferred from the file extension) The type of the input.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file with several worksheets, indicates the name of the worksheet
    /// to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (list of comma-separated numbers) The weight of each criterion, for example 1,1,2,1
    #[clap(short, long, value_parser)]
    pub weights: Option<String>,

    /// (list of comma-separated + or -) The impact of each criterion: + if higher values are
    /// better, - if lower values are better. For example +,+,-,+
    #[clap(short = 'm', long, value_parser, allow_hyphen_values = true)]
    pub impacts: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the result. A path ending with .json
    /// produces a JSON summary, .xlsx an Excel workbook, .csv or no extension a CSV file.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file with the expected result. If provided, the program will
    /// check that its output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (raw or sumToOne, default raw) Whether the weights are divided by their sum before use.
    /// This does not change the scores or the ranks.
    #[clap(long, value_parser)]
    pub weight_normalization: Option<String>,

    /// (max or min, default max) The rank given to alternatives with the same score: the worst
    /// (max) or the best (min) rank of their group.
    #[clap(long, value_parser)]
    pub tie_mode: Option<String>,

    /// (default 4, at most 15) The number of decimals of the scores in the output.
    #[clap(long, value_parser)]
    pub score_decimals: Option<usize>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
