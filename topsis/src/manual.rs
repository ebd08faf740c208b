/*!

This is the long-form manual for `topsis` and the `topsis` command line program.

## Quick start

```text
topsis --input data.csv --weights 1,1,1,2 --impacts -,+,+,+ --out result.csv
```

The input has one row per alternative. The first column holds the names of the alternatives
and every other column is a criterion. One weight and one impact must be given for each
criterion, in the order of the columns.

```text
Model,Price,Storage,Camera,Looks
M1,250,16,12,5
M2,200,16,8,3
M3,300,32,16,4
M4,275,32,8,4
```

The result is the same table with two more columns:

```text
Model,Price,Storage,Camera,Looks,Topsis Score,Rank
M1,250,16,12,5,0.4587,3
M2,200,16,8,3,0.2667,4
M3,300,32,16,4,0.6798,1
M4,275,32,8,4,0.4635,2
```

## Input formats

The following formats are supported:
* `csv` Comma Separated Values
* `xlsx` Excel workbooks (`excel` is accepted as an alias)

The format is inferred from the extension of the file, unless it is given with `--input-type`
(or `provider` in a job file). Any other extension is rejected.

### `csv`

The first line is the header. Lines that only contain separators are ignored. All the rows
must have as many cells as the header. The cells of the criteria must be numbers: the error
reports the name of the column and the line of the first offending cell.

### `xlsx`

The first row of the worksheet is the header. If the workbook has several worksheets, the
name of the worksheet must be provided with `--excel-worksheet-name`.

## Parameters

* weights: comma-separated numbers, strictly positive. Spaces around the numbers are ignored.
* impacts: comma-separated `+` (higher is better, a benefit) or `-` (lower is better, a cost).

The number of weights and of impacts must both equal the number of criteria columns.

## Job files

A job can be described in a JSON file and passed with `--config`. The paths in the file are
relative to the location of the file. The options of the command line override the content
of the file.

```json
{
  "inputSource": {
    "filePath": "data.csv",
    "provider": "csv",
    "idColumnIndex": 1,
    "excelWorksheetName": "Sheet1"
  },
  "criteria": [
    { "name": "Camera", "weight": 2, "impact": "+" },
    { "name": "Price", "weight": "1", "impact": "-" }
  ],
  "rules": {
    "weightNormalization": "raw",
    "tieMode": "max"
  },
  "outputSettings": {
    "outputPath": "result.json",
    "outputFormat": "json",
    "scoreDecimals": 4,
    "scoreColumnName": "Topsis Score",
    "rankColumnName": "Rank"
  }
}
```

Keys of `inputSource`:
 - `filePath` (string, required): the input file.
 - `provider` (string, optional): `csv` or `xlsx`.
 - `idColumnIndex` (string or number, optional): the column with the names of the
   alternatives, starting at 1 (default). Excel letters such as `B` are accepted. All the
   other columns are criteria, unless `criteria` is provided.
 - `excelWorksheetName` (string, optional): for Excel inputs, the name of the worksheet.

Instead of `criteria`, the keys `weights` and `impacts` accept the same comma-separated
strings as the command line. With `criteria`, only the columns named in the list are used, in
the order of the list, and the other columns are copied to the output unchanged.

## Rules

`weightNormalization`:
 - `raw` (default): the weights are used as given.
 - `sumToOne`: the weights are divided by their sum first. This changes the ideal points
   reported in the JSON summary, but not the scores or the ranks.

`tieMode`, for alternatives with exactly the same score:
 - `max` (default): all of them get the worst rank of their group. With scores
   `0.9, 0.5, 0.5, 0.1`, the ranks are `1, 3, 3, 4`.
 - `min`: all of them get the best rank of their group: `1, 2, 2, 4`.

## Output

The output is selected by `outputFormat`, or else by the extension of `outputPath`:
 - `csv` (default): the input table with the score and the rank appended. The score is
   printed with `scoreDecimals` decimals (4 by default, at most 15).
 - `xlsx`: the same table in an Excel workbook, in a worksheet named `Results`. Numeric
   cells are written as numbers and the scores are rounded to `scoreDecimals` decimals.
   An output path is required.
 - `json`: a summary with the criteria, the rules, the ideal best and worst points and, for
   each alternative, its score and rank.

Without an output path, the result is printed on the standard output. With `--reference`,
the result is compared with the content of a file and the differences are printed. For an
Excel output, the reference is the CSV rendering of the same table.

## Errors

The program exits with a non-zero status and one of these kinds of errors:
 - `InputFormat`: the input is missing, cannot be opened or is not csv or xlsx.
 - `Schema`: fewer than 2 columns, no data rows, rows of the wrong length, non-numeric
   criteria, or a criterion name absent from the header. The errors report the line of
   the file, blank lines included.
 - `ParameterCount`: the number of weights or impacts does not match the criteria.
 - `ParameterValue`: a weight is not a positive number, an impact is not `+` or `-`, or a
   rule has an unknown value, more than 15 decimals are requested, or an Excel output has
   no output path.
 - `DegenerateData`: a criterion is zero for every alternative, or an alternative is equal to
   both ideal points (for example, when all the alternatives are identical), or the
   distances to the ideal points overflow because of extreme weights.
 - `Output`: the result cannot be written, or differs from the reference.

 */
