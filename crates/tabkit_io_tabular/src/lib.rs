//! `tabkit_io_tabular` v1:
//! Rust-side tabular source reader kernel.
//!
//! One capability surface over two backing formats:
//! - `conf`   : recognized source extension constants
//! - `spec`   : formats/values/handles and open-time errors
//! - `util`   : pure helper functions
//! - `reader` : format-dispatching reader kernel

pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;

pub use conf::{C_EXT_CSV, TUP_EXT_WORKBOOK};
pub use reader::TabularReader;
pub use spec::{EnumCellValue, EnumSourceFormat, SpecSheetHandle, TabularOpenError};
pub use util::{convert_cell_value, detect_source_format};
