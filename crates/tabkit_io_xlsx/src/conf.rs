//! Report writer constants.

/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Number format applied to the leading date column of data rows.
pub const C_NUM_FORMAT_DATE: &str = "mm/dd/yy";

/// Width units granted per character when sizing a written column.
pub const N_COL_WIDTH_UNITS_PER_CHAR: f64 = 1.1;

/// First data row referenced by chart ranges (1-based; row 1 holds the header).
pub const N_ROW_DATA_FIRST: usize = 2;
/// Built-in chart style applied to report charts.
pub const N_CHART_STYLE_DEFAULT: u8 = 35;

/// Name of the consolidated chart sheet.
pub const C_SHEET_NAME_SUMMARY: &str = "Summary";
/// Column anchor of the left grid slot for mirrored charts.
pub const C_CHART_GRID_COL_LEFT: &str = "B";
/// Column anchor of the right grid slot for mirrored charts.
pub const C_CHART_GRID_COL_RIGHT: &str = "J";
/// Anchor row spacing between grid rows of mirrored charts.
pub const N_CHART_GRID_VERTICAL_SPACING: usize = 15;
/// Anchor row of the first grid row (1-based).
pub const N_CHART_GRID_ROW_FIRST: usize = 2;
