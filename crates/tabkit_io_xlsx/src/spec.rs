//! Report models and write-time error types.

use std::fmt;

////////////////////////////////////////////////////////////////////////////////
// #region ChartSpecification

/// Line chart request referencing ranges of a source sheet.
///
/// The category range is always column A rows 2..=`n_row_data_last` of the
/// source sheet (row 1 holds the header); the value range covers the same
/// rows of `col_letter_data`. The ranges are references into the finished
/// document, not embedded copies, so the source sheet must contain the
/// referenced rows by the time the writer is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecChartRequest {
    /// Sheet holding the referenced data.
    pub sheet_name_source: String,
    /// Column letter of the value range (for example `"B"`).
    pub col_letter_data: String,
    /// Last referenced data row, 1-based.
    pub n_row_data_last: usize,
    /// Chart title.
    pub title: String,
    /// Optional y-axis label.
    pub label_y_axis: Option<String>,
    /// A1 anchor cell on the active sheet (for example `"E2"`).
    pub cell_target: String,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Errors raised by report write operations.
#[derive(Debug)]
pub enum ReportWriteError {
    /// A write was issued before any sheet was selected.
    NoSheetSelected,
    /// A write was issued after `close()`.
    WriterClosed,
    /// Leading cell of a data row is not a parseable date.
    InvalidDate {
        /// Output row index of the rejected row.
        n_idx_row: usize,
        /// Offending cell text.
        value: String,
    },
    /// Non-empty, non-numeric value in a numeric data column.
    InvalidNumeric {
        /// Output row index of the rejected cell.
        n_idx_row: usize,
        /// Output column index of the rejected cell.
        n_idx_col: usize,
        /// Offending cell text.
        value: String,
    },
    /// Column reference outside `A`-style letter addressing.
    InvalidColumnLetter(String),
    /// Malformed A1 cell anchor.
    InvalidCellAnchor(String),
    /// Error text surfaced by the workbook codec.
    Backend(String),
}

impl fmt::Display for ReportWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSheetSelected => {
                write!(f, "No sheet selected; call select_or_create_sheet first.")
            }
            Self::WriterClosed => write!(f, "Cannot write after close()."),
            Self::InvalidDate { n_idx_row, value } => {
                write!(f, "Row {n_idx_row}: invalid date value {value:?}")
            }
            Self::InvalidNumeric {
                n_idx_row,
                n_idx_col,
                value,
            } => {
                write!(
                    f,
                    "Row {n_idx_row}, column {n_idx_col}: invalid numeric value {value:?}"
                )
            }
            Self::InvalidColumnLetter(letters) => {
                write!(f, "Invalid column letters: {letters:?}")
            }
            Self::InvalidCellAnchor(cell) => write!(f, "Invalid cell anchor: {cell:?}"),
            Self::Backend(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ReportWriteError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
