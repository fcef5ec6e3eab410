//! Stateless helper utilities used by the reader kernel.

use std::path::Path;

use calamine::Data;

use crate::conf::{C_EXT_CSV, TUP_EXT_WORKBOOK};
use crate::spec::{EnumCellValue, EnumSourceFormat};

/// Detect the source format from the path extension.
///
/// Matching is exact and case-sensitive; `None` means the extension is not a
/// recognized tabular source.
pub fn detect_source_format(path: &Path) -> Option<EnumSourceFormat> {
    let c_ext = path.extension()?.to_str()?;
    if c_ext == C_EXT_CSV {
        return Some(EnumSourceFormat::Csv);
    }
    if TUP_EXT_WORKBOOK.contains(&c_ext) {
        return Some(EnumSourceFormat::Workbook);
    }
    None
}

/// Normalize one decoded workbook cell into the reader value model.
pub fn convert_cell_value(cell: &Data) -> EnumCellValue {
    match cell {
        Data::Empty => EnumCellValue::None,
        Data::String(val) => EnumCellValue::String(val.clone()),
        Data::Int(val) => EnumCellValue::Number(*val as f64),
        Data::Float(val) => EnumCellValue::Number(*val),
        Data::Bool(val) => {
            EnumCellValue::String(if *val { "True" } else { "False" }.to_string())
        }
        Data::DateTime(val) => EnumCellValue::DateTime(val.as_f64()),
        Data::DateTimeIso(val) => EnumCellValue::String(val.clone()),
        Data::DurationIso(val) => EnumCellValue::String(val.clone()),
        Data::Error(val) => EnumCellValue::String(format!("{val:?}")),
    }
}
