//! `tabkit_io_xlsx` v1:
//! Rust-side workbook report writer kernel.
//!
//! - `conf`    : report constants
//! - `spec`    : chart request model and error types
//! - `util`    : pure helper functions
//! - `writer`  : append-style writer kernel
//! - `summary` : chart-mirroring decorator

pub mod conf;
pub mod spec;
pub mod summary;
pub mod util;
pub mod writer;

pub use conf::{
    C_CHART_GRID_COL_LEFT, C_CHART_GRID_COL_RIGHT, C_NUM_FORMAT_DATE, C_SHEET_NAME_SUMMARY,
    N_CHART_GRID_ROW_FIRST, N_CHART_GRID_VERTICAL_SPACING, N_CHART_STYLE_DEFAULT,
    N_COL_WIDTH_UNITS_PER_CHAR, N_LEN_EXCEL_SHEET_NAME_MAX, N_ROW_DATA_FIRST, TUP_EXCEL_ILLEGAL,
};
pub use spec::{ReportWriteError, SpecChartRequest};
pub use summary::SummaryReportWriter;
pub use util::{
    convert_column_index_to_letter, convert_column_letter_to_index, derive_series_range,
    derive_summary_chart_cell, parse_cell_anchor, sanitize_sheet_name,
};
pub use writer::ReportWriter;
