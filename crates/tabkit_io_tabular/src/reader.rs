//! Format-dispatching reader kernel.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};

use crate::spec::{EnumCellValue, EnumSourceFormat, SpecSheetHandle, TabularOpenError};
use crate::util::{convert_cell_value, detect_source_format};

////////////////////////////////////////////////////////////////////////////////
// #region Backend

/// Per-format backing state.
enum EnumSourceBackend {
    /// Whole file parsed eagerly into rows of text cells.
    Csv {
        l_rows: Vec<Vec<String>>,
    },
    /// Workbook handle plus the materialized current sheet.
    Workbook {
        workbook: Sheets<BufReader<File>>,
        l_sheet_names: Vec<String>,
        n_idx_sheet_current: usize,
        range_current: Range<Data>,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Reader

/// Uniform row/sheet reader over CSV and workbook sources.
///
/// The backing format is detected from the file extension at open time and is
/// fixed for the reader's lifetime. Sheet-related operations degrade to
/// logged no-ops on formats without sheet support; callers can check
/// [`Self::format`] or [`Self::is_csv`] first.
pub struct TabularReader {
    path_src: PathBuf,
    backend: EnumSourceBackend,
}

impl std::fmt::Debug for TabularReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabularReader")
            .field("path_src", &self.path_src)
            .field("format", &self.format())
            .finish()
    }
}

impl TabularReader {
    /// Open a tabular source, detecting the format from the path extension.
    ///
    /// `.csv` sources are parsed eagerly into memory. `.xlsx`/`.xls` sources
    /// are opened through the workbook codec with sheet index 0 selected as
    /// current. Any other extension fails with
    /// [`TabularOpenError::UnsupportedExtension`] and retains no state.
    pub fn open(path: impl AsRef<Path>) -> Result<TabularReader, TabularOpenError> {
        let path_src = path.as_ref().to_path_buf();

        if !path_src.exists() {
            return Err(TabularOpenError::SourceNotFound(path_src));
        }

        let Some(enum_format) = detect_source_format(&path_src) else {
            let c_ext = path_src
                .extension()
                .map(|val| val.to_string_lossy().to_string())
                .unwrap_or_default();
            return Err(TabularOpenError::UnsupportedExtension {
                path: path_src,
                extension: c_ext,
            });
        };

        let backend = match enum_format {
            EnumSourceFormat::Csv => open_csv_backend(&path_src)?,
            EnumSourceFormat::Workbook => open_workbook_backend(&path_src)?,
        };

        Ok(TabularReader { path_src, backend })
    }

    /// Source path this reader was opened from.
    pub fn path(&self) -> &Path {
        &self.path_src
    }

    /// Backing format detected at open time.
    pub fn format(&self) -> EnumSourceFormat {
        match self.backend {
            EnumSourceBackend::Csv { .. } => EnumSourceFormat::Csv,
            EnumSourceBackend::Workbook { .. } => EnumSourceFormat::Workbook,
        }
    }

    /// `true` when the backing format is CSV.
    pub fn is_csv(&self) -> bool {
        self.format() == EnumSourceFormat::Csv
    }

    /// Return row `n_idx_row` of the current sheet.
    ///
    /// CSV cells are always [`EnumCellValue::String`]; workbook cells carry
    /// the value as encoded in the file. Out-of-range rows yield an empty
    /// row; bounds behavior is a caveat of the backing codec, not a contract.
    pub fn row(&self, n_idx_row: usize) -> Vec<EnumCellValue> {
        match &self.backend {
            EnumSourceBackend::Csv { l_rows } => l_rows
                .get(n_idx_row)
                .map(|l_cells| {
                    l_cells
                        .iter()
                        .cloned()
                        .map(EnumCellValue::String)
                        .collect()
                })
                .unwrap_or_default(),
            EnumSourceBackend::Workbook { range_current, .. } => {
                if n_idx_row >= range_current.height() {
                    return Vec::new();
                }
                (0..range_current.width())
                    .map(|n_idx_col| {
                        range_current
                            .get((n_idx_row, n_idx_col))
                            .map(convert_cell_value)
                            .unwrap_or(EnumCellValue::None)
                    })
                    .collect()
            }
        }
    }

    /// Ordered sheet names of a workbook source.
    ///
    /// CSV sources have no sheets: a diagnostic is logged and an empty list
    /// is returned.
    pub fn sheet_names(&self) -> Vec<String> {
        match &self.backend {
            EnumSourceBackend::Csv { .. } => {
                log::error!("CSV source does not support sheets");
                Vec::new()
            }
            EnumSourceBackend::Workbook { l_sheet_names, .. } => l_sheet_names.clone(),
        }
    }

    /// Repoint the current sheet to `n_idx`.
    ///
    /// Out-of-bounds indices and CSV sources leave the current sheet
    /// unchanged and log a diagnostic instead of failing.
    pub fn select_sheet(&mut self, n_idx: usize) {
        match &mut self.backend {
            EnumSourceBackend::Csv { .. } => {
                log::error!("CSV source does not support sheets");
            }
            EnumSourceBackend::Workbook {
                workbook,
                l_sheet_names,
                n_idx_sheet_current,
                range_current,
            } => {
                let n_count = l_sheet_names.len();
                if n_idx >= n_count {
                    log::error!("not enough sheets: {n_idx} >= {n_count}");
                    return;
                }

                let c_sheet_name = l_sheet_names[n_idx].clone();
                match workbook.worksheet_range(&c_sheet_name) {
                    Ok(range) => {
                        *range_current = range;
                        *n_idx_sheet_current = n_idx;
                    }
                    Err(err) => {
                        log::error!("failed to re-read sheet {c_sheet_name:?}: {err}");
                    }
                }
            }
        }
    }

    /// Read-only handle for sheet `n_idx`, without moving the current sheet.
    ///
    /// Same degradation contract as [`Self::select_sheet`]: out-of-bounds
    /// indices and CSV sources log a diagnostic and return `None`.
    pub fn sheet_by_index(&self, n_idx: usize) -> Option<SpecSheetHandle> {
        match &self.backend {
            EnumSourceBackend::Csv { .. } => {
                log::error!("CSV source does not support sheets");
                None
            }
            EnumSourceBackend::Workbook { l_sheet_names, .. } => {
                let n_count = l_sheet_names.len();
                if n_idx >= n_count {
                    log::error!("not enough sheets: {n_idx} >= {n_count}");
                    return None;
                }
                Some(SpecSheetHandle {
                    index: n_idx,
                    name: l_sheet_names[n_idx].clone(),
                })
            }
        }
    }

    /// Handle of the currently selected sheet, `None` for CSV sources.
    pub fn sheet_current(&self) -> Option<SpecSheetHandle> {
        match &self.backend {
            EnumSourceBackend::Csv { .. } => None,
            EnumSourceBackend::Workbook {
                l_sheet_names,
                n_idx_sheet_current,
                ..
            } => Some(SpecSheetHandle {
                index: *n_idx_sheet_current,
                name: l_sheet_names[*n_idx_sheet_current].clone(),
            }),
        }
    }

    /// Row count of the current sheet as reported by the backing codec.
    pub fn row_count(&self) -> usize {
        match &self.backend {
            EnumSourceBackend::Csv { l_rows } => l_rows.len(),
            EnumSourceBackend::Workbook { range_current, .. } => range_current.height(),
        }
    }

    /// Column count of the current sheet of a workbook source.
    ///
    /// CSV sources have no fixed column count: a diagnostic is logged and
    /// `None` is returned; use the length of a row instead.
    pub fn column_count(&self) -> Option<usize> {
        match &self.backend {
            EnumSourceBackend::Csv { .. } => {
                log::error!("CSV source does not support a column count; use the row length instead");
                None
            }
            EnumSourceBackend::Workbook { range_current, .. } => Some(range_current.width()),
        }
    }
}

fn open_csv_backend(path_src: &Path) -> Result<EnumSourceBackend, TabularOpenError> {
    let file = File::open(path_src).map_err(|err| TabularOpenError::CsvParseFailed {
        path: path_src.to_path_buf(),
        message: err.to_string(),
    })?;

    let mut reader_csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut l_rows = Vec::new();
    for record in reader_csv.records() {
        let record = record.map_err(|err| TabularOpenError::CsvParseFailed {
            path: path_src.to_path_buf(),
            message: err.to_string(),
        })?;
        l_rows.push(record.iter().map(ToString::to_string).collect());
    }

    Ok(EnumSourceBackend::Csv { l_rows })
}

fn open_workbook_backend(path_src: &Path) -> Result<EnumSourceBackend, TabularOpenError> {
    let mut workbook =
        open_workbook_auto(path_src).map_err(|err| TabularOpenError::WorkbookOpenFailed {
            path: path_src.to_path_buf(),
            message: err.to_string(),
        })?;

    let l_sheet_names = workbook.sheet_names().to_vec();
    let Some(c_sheet_first) = l_sheet_names.first().cloned() else {
        return Err(TabularOpenError::EmptyWorkbook(path_src.to_path_buf()));
    };

    let range_current =
        workbook
            .worksheet_range(&c_sheet_first)
            .map_err(|err| TabularOpenError::WorkbookOpenFailed {
                path: path_src.to_path_buf(),
                message: err.to_string(),
            })?;

    Ok(EnumSourceBackend::Workbook {
        workbook,
        l_sheet_names,
        n_idx_sheet_current: 0,
        range_current,
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
