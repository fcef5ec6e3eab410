//! Recognized source extension constants.

/// Extension handled by the CSV backend (case-sensitive, without the dot).
pub const C_EXT_CSV: &str = "csv";
/// Extensions handled by the workbook backend (case-sensitive, without the dot).
pub const TUP_EXT_WORKBOOK: [&str; 2] = ["xlsx", "xls"];
