//! Source format models and open-time error types.

use std::fmt;
use std::path::PathBuf;

////////////////////////////////////////////////////////////////////////////////
// #region SourceModels

/// Backing format of a tabular source, fixed at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumSourceFormat {
    /// Flat CSV file, parsed eagerly into rows of text cells.
    Csv,
    /// Multi-sheet workbook (`.xlsx`/`.xls`) with typed cells.
    Workbook,
}

/// Decoded cell value as exposed by the reader.
///
/// CSV backends only ever produce `String` cells; workbook backends produce
/// the value as encoded in the file.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank cell.
    None,
    /// Text cell.
    String(String),
    /// Numeric cell.
    Number(f64),
    /// Date/time cell, carried as the workbook serial value.
    DateTime(f64),
}

/// Read-only handle to a named sheet of a workbook source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetHandle {
    /// Zero-based sheet position.
    pub index: usize,
    /// Sheet name as stored in the workbook.
    pub name: String,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// "Open failed" errors (construction stage, no partial reader is retained).
#[derive(Debug)]
pub enum TabularOpenError {
    /// File extension is not one of the recognized source formats.
    UnsupportedExtension {
        /// Offending source path.
        path: PathBuf,
        /// Extension as found on the path (may be empty).
        extension: String,
    },
    /// Source path does not exist.
    SourceNotFound(PathBuf),
    /// CSV codec failed while parsing the file.
    CsvParseFailed {
        /// Source path that failed to parse.
        path: PathBuf,
        /// Underlying codec error text.
        message: String,
    },
    /// Workbook codec failed while opening or reading the file.
    WorkbookOpenFailed {
        /// Source path that failed to open.
        path: PathBuf,
        /// Underlying codec error text.
        message: String,
    },
    /// Workbook contains no sheets to select.
    EmptyWorkbook(PathBuf),
}

impl fmt::Display for TabularOpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedExtension { path, extension } => {
                write!(
                    f,
                    "Unsupported source extension {:?}: {}",
                    extension,
                    path.display()
                )
            }
            Self::SourceNotFound(path) => {
                write!(f, "Source not found: {}", path.display())
            }
            Self::CsvParseFailed { path, message } => {
                write!(f, "Failed to parse CSV {}: {message}", path.display())
            }
            Self::WorkbookOpenFailed { path, message } => {
                write!(f, "Failed to open workbook {}: {message}", path.display())
            }
            Self::EmptyWorkbook(path) => {
                write!(f, "Workbook has no sheets: {}", path.display())
            }
        }
    }
}

impl std::error::Error for TabularOpenError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
