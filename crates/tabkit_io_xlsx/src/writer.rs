//! Append-style workbook report writer kernel.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rust_xlsxwriter::{
    Chart, ChartType, ExcelDateTime, Format, Workbook, Worksheet, XlsxError,
};

use crate::conf::{
    C_NUM_FORMAT_DATE, N_CHART_STYLE_DEFAULT, N_COL_WIDTH_UNITS_PER_CHAR, N_ROW_DATA_FIRST,
};
use crate::spec::{ReportWriteError, SpecChartRequest};
use crate::util::{
    convert_column_letter_to_index, derive_series_range, parse_cell_anchor, sanitize_sheet_name,
};

/// Stateful append-style report writer.
///
/// Owns the output workbook from construction until [`Self::close`] flushes
/// it to disk; the workbook is buffered in memory until then. Sheets are
/// addressed by name and the most recently selected sheet is the target of
/// row/column/chart writes. Instances are for exclusive sequential use and
/// require external serialization if ever shared.
pub struct ReportWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    fmt_header: Format,
    fmt_date: Format,
    dict_col_next_free_by_sheet: BTreeMap<String, u16>,
    sheet_name_active: Option<String>,
    if_closed: bool,
}

impl ReportWriter {
    /// Create a writer bound to `path_file_out` with the two report styles
    /// prepared: bold headers and the two-digit date format.
    pub fn new(path_file_out: impl Into<PathBuf>) -> Self {
        Self {
            path_file_out: path_file_out.into(),
            workbook: Workbook::new(),
            fmt_header: Format::new().set_bold(),
            fmt_date: Format::new().set_num_format(C_NUM_FORMAT_DATE),
            dict_col_next_free_by_sheet: BTreeMap::new(),
            sheet_name_active: None,
            if_closed: false,
        }
    }

    /// Return output file path as string.
    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Name of the active target sheet, if one has been selected.
    pub fn sheet_active(&self) -> Option<&str> {
        self.sheet_name_active.as_deref()
    }

    /// Next unwritten column of `sheet_name`, if the sheet exists.
    pub fn next_free_column(&self, sheet_name: &str) -> Option<u16> {
        self.dict_col_next_free_by_sheet
            .get(&sanitize_sheet_name(sheet_name))
            .copied()
    }

    /// Select `sheet_name` as the write target, creating it when absent.
    ///
    /// The name is normalized to Excel's sheet name constraints first.
    /// Idempotent: re-selecting an existing sheet keeps its contents and its
    /// column counter.
    pub fn select_or_create_sheet(&mut self, sheet_name: &str) -> Result<(), ReportWriteError> {
        self.validate_open()?;

        let c_name = sanitize_sheet_name(sheet_name);
        if self.workbook.worksheet_from_name(&c_name).is_err() {
            let worksheet = self.workbook.add_worksheet();
            worksheet.set_name(&c_name).map_err(derive_backend_error)?;
        }

        self.dict_col_next_free_by_sheet
            .entry(c_name.clone())
            .or_insert(0);
        self.sheet_name_active = Some(c_name);
        Ok(())
    }

    /// Write one row at `n_idx_row` on the active sheet.
    ///
    /// Header rows are written in full with the bold style from column 0.
    /// Data rows carry a date in the leading cell (written with the date
    /// style) and numbers in the remaining cells; empty cells stay blank,
    /// while any other non-numeric value is malformed input and fails with
    /// [`ReportWriteError::InvalidNumeric`]. A malformed leading date fails
    /// with [`ReportWriteError::InvalidDate`].
    pub fn write_row(
        &mut self,
        n_idx_row: usize,
        data: &[String],
        if_header: bool,
    ) -> Result<(), ReportWriteError> {
        self.validate_open()?;
        let n_row = cast_row_num(n_idx_row)?;

        if if_header {
            let fmt_header = self.fmt_header.clone();
            let worksheet = self.worksheet_active()?;
            for (n_idx_col, value) in data.iter().enumerate() {
                worksheet
                    .write_string_with_format(n_row, cast_col_num(n_idx_col)?, value, &fmt_header)
                    .map_err(derive_backend_error)?;
            }
            return Ok(());
        }

        let Some((value_date, l_values)) = data.split_first() else {
            return Ok(());
        };

        let date = ExcelDateTime::parse_from_str(value_date).map_err(|_| {
            ReportWriteError::InvalidDate {
                n_idx_row,
                value: value_date.clone(),
            }
        })?;

        let fmt_date = self.fmt_date.clone();
        let worksheet = self.worksheet_active()?;
        worksheet
            .write_datetime_with_format(n_row, 0, &date, &fmt_date)
            .map_err(derive_backend_error)?;

        for (n_idx, value) in l_values.iter().enumerate() {
            let n_idx_col = n_idx + 1;
            if value.is_empty() {
                continue;
            }

            let n_value: f64 = value.parse().map_err(|_| ReportWriteError::InvalidNumeric {
                n_idx_row,
                n_idx_col,
                value: value.clone(),
            })?;
            worksheet
                .write_number(n_row, cast_col_num(n_idx_col)?, n_value)
                .map_err(derive_backend_error)?;
        }

        Ok(())
    }

    /// Write a whole table: `rows[0]` as the header, the rest as data rows,
    /// output row index equal to input position.
    pub fn write_table(&mut self, rows: &[Vec<String>]) -> Result<(), ReportWriteError> {
        for (n_idx_row, row) in rows.iter().enumerate() {
            self.write_row(n_idx_row, row, n_idx_row == 0)?;
        }
        Ok(())
    }

    /// Write `data` vertically into column `n_idx_col` of the active sheet.
    ///
    /// With `if_header_style` the first cell is bold and the rest follow
    /// unstyled; otherwise all cells are unstyled from row 0. The column
    /// width is then set from the longest value's character count times a
    /// fixed scale factor, an approximation rather than text metrics. The
    /// sheet's next-free-column counter advances past this column.
    pub fn write_column(
        &mut self,
        n_idx_col: usize,
        data: &[String],
        if_header_style: bool,
    ) -> Result<(), ReportWriteError> {
        self.validate_open()?;
        let n_col = cast_col_num(n_idx_col)?;

        let Some(c_name) = self.sheet_name_active.clone() else {
            return Err(ReportWriteError::NoSheetSelected);
        };

        let fmt_header = self.fmt_header.clone();
        let worksheet = self
            .workbook
            .worksheet_from_name(&c_name)
            .map_err(derive_backend_error)?;

        for (n_idx_row, value) in data.iter().enumerate() {
            let n_row = cast_row_num(n_idx_row)?;
            if if_header_style && n_idx_row == 0 {
                worksheet
                    .write_string_with_format(n_row, n_col, value, &fmt_header)
                    .map_err(derive_backend_error)?;
            } else {
                worksheet
                    .write_string(n_row, n_col, value)
                    .map_err(derive_backend_error)?;
            }
        }

        let n_len_max = data
            .iter()
            .map(|value| value.chars().count())
            .max()
            .unwrap_or(0);
        worksheet
            .set_column_width(n_col, n_len_max as f64 * N_COL_WIDTH_UNITS_PER_CHAR)
            .map_err(derive_backend_error)?;

        let n_col_next_free = self.dict_col_next_free_by_sheet.entry(c_name).or_insert(0);
        *n_col_next_free = u16::max(*n_col_next_free, n_col.saturating_add(1));
        Ok(())
    }

    /// Write `data` into the active sheet's next free column and return the
    /// column index used.
    pub fn append_column(
        &mut self,
        data: &[String],
        if_header_style: bool,
    ) -> Result<u16, ReportWriteError> {
        self.validate_open()?;
        let Some(c_name) = self.sheet_name_active.clone() else {
            return Err(ReportWriteError::NoSheetSelected);
        };

        let n_col = self
            .dict_col_next_free_by_sheet
            .get(&c_name)
            .copied()
            .unwrap_or(0);
        self.write_column(n_col as usize, data, if_header_style)?;
        Ok(n_col)
    }

    /// Insert a line chart on the active sheet.
    ///
    /// Categories are column A rows 2..=last of the source sheet, values the
    /// requested column over the same rows, both as A1 range references. The
    /// chart carries the title, the optional y-axis label, a date x-axis, no
    /// legend, and the fixed report style.
    pub fn add_chart(&mut self, request: &SpecChartRequest) -> Result<(), ReportWriteError> {
        self.validate_open()?;

        let (n_row_anchor, n_col_anchor) = parse_cell_anchor(&request.cell_target)?;
        convert_column_letter_to_index(&request.col_letter_data)?;

        let mut chart = Chart::new(ChartType::Line);
        chart
            .add_series()
            .set_categories(
                derive_series_range(
                    &request.sheet_name_source,
                    "A",
                    N_ROW_DATA_FIRST,
                    request.n_row_data_last,
                )
                .as_str(),
            )
            .set_values(
                derive_series_range(
                    &request.sheet_name_source,
                    &request.col_letter_data,
                    N_ROW_DATA_FIRST,
                    request.n_row_data_last,
                )
                .as_str(),
            );

        chart.title().set_name(request.title.as_str());
        if let Some(label) = &request.label_y_axis {
            chart.y_axis().set_name(label.as_str());
        }
        chart.x_axis().set_date_axis(true);
        chart.legend().set_hidden();
        chart.set_style(N_CHART_STYLE_DEFAULT);

        let worksheet = self.worksheet_active()?;
        worksheet
            .insert_chart(n_row_anchor, n_col_anchor, &chart)
            .map_err(derive_backend_error)?;
        Ok(())
    }

    /// Flush the workbook to disk. Idempotent; later writes fail with
    /// [`ReportWriteError::WriterClosed`].
    pub fn close(&mut self) -> Result<(), ReportWriteError> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook
            .save(&self.path_file_out)
            .map_err(derive_backend_error)?;
        self.if_closed = true;
        Ok(())
    }

    fn validate_open(&self) -> Result<(), ReportWriteError> {
        if self.if_closed {
            return Err(ReportWriteError::WriterClosed);
        }
        Ok(())
    }

    fn worksheet_active(&mut self) -> Result<&mut Worksheet, ReportWriteError> {
        let Some(c_name) = self.sheet_name_active.clone() else {
            return Err(ReportWriteError::NoSheetSelected);
        };
        self.workbook
            .worksheet_from_name(&c_name)
            .map_err(derive_backend_error)
    }
}

fn derive_backend_error(err: XlsxError) -> ReportWriteError {
    ReportWriteError::Backend(format!("xlsx write error: {err}"))
}

fn cast_row_num(value: usize) -> Result<u32, ReportWriteError> {
    u32::try_from(value)
        .map_err(|_| ReportWriteError::Backend(format!("row index overflow: {value}")))
}

fn cast_col_num(value: usize) -> Result<u16, ReportWriteError> {
    u16::try_from(value)
        .map_err(|_| ReportWriteError::Backend(format!("column index overflow: {value}")))
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use tabkit_io_tabular::{EnumCellValue, TabularReader};

    use super::ReportWriter;
    use crate::spec::{ReportWriteError, SpecChartRequest};

    struct TestDir {
        path: PathBuf,
    }

    impl TestDir {
        fn new() -> Self {
            let n = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos();
            let path = std::env::temp_dir().join(format!("tabkit_xlsx_test_{n}"));
            std::fs::create_dir_all(&path).expect("create test dir");
            Self { path }
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for TestDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    fn table_rows(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    }

    #[test]
    fn write_table_round_trips_through_reader() {
        let tmp = TestDir::new();
        let path_out = tmp.path().join("report.xlsx");

        let mut writer = ReportWriter::new(&path_out);
        writer
            .select_or_create_sheet("Housing Starts")
            .expect("select sheet");
        writer
            .write_table(&table_rows(&[
                &["date", "starts", "permits"],
                &["2020-05-01", "891", ""],
                &["2020-06-01", "974", "1241.5"],
            ]))
            .expect("write table");
        writer.close().expect("close");

        let reader = TabularReader::open(&path_out).expect("read back");
        assert_eq!(reader.sheet_names(), vec!["Housing Starts"]);
        assert_eq!(
            reader.row(0),
            vec![
                EnumCellValue::String("date".to_string()),
                EnumCellValue::String("starts".to_string()),
                EnumCellValue::String("permits".to_string())
            ]
        );

        let l_row_may = reader.row(1);
        assert!(matches!(l_row_may[0], EnumCellValue::DateTime(_)));
        let EnumCellValue::Number(n_starts) = &l_row_may[1] else {
            panic!("expected numeric cell, got {:?}", l_row_may[1]);
        };
        assert!((*n_starts - 891.0).abs() < 1e-9);
        assert_eq!(l_row_may[2], EnumCellValue::None);

        let l_row_june = reader.row(2);
        let EnumCellValue::Number(n_permits) = &l_row_june[2] else {
            panic!("expected numeric cell, got {:?}", l_row_june[2]);
        };
        assert!((*n_permits - 1241.5).abs() < 1e-9);
    }

    #[test]
    fn numeric_coercion_failure_propagates() {
        let tmp = TestDir::new();
        let mut writer = ReportWriter::new(tmp.path().join("bad.xlsx"));
        writer.select_or_create_sheet("Data").expect("select sheet");

        let err = writer
            .write_row(1, &table_rows(&[&["2020-05-01", "n/a"]])[0], false)
            .expect_err("must fail");
        assert!(matches!(
            err,
            ReportWriteError::InvalidNumeric { n_idx_col: 1, .. }
        ));
    }

    #[test]
    fn malformed_date_fails_loudly() {
        let tmp = TestDir::new();
        let mut writer = ReportWriter::new(tmp.path().join("bad.xlsx"));
        writer.select_or_create_sheet("Data").expect("select sheet");

        let err = writer
            .write_row(1, &table_rows(&[&["May 2020", "1"]])[0], false)
            .expect_err("must fail");
        assert!(matches!(err, ReportWriteError::InvalidDate { .. }));
    }

    #[test]
    fn write_before_sheet_selection_fails() {
        let tmp = TestDir::new();
        let mut writer = ReportWriter::new(tmp.path().join("none.xlsx"));

        let err = writer
            .write_row(0, &table_rows(&[&["date"]])[0], true)
            .expect_err("must fail");
        assert!(matches!(err, ReportWriteError::NoSheetSelected));
    }

    #[test]
    fn write_after_close_fails() {
        let tmp = TestDir::new();
        let mut writer = ReportWriter::new(tmp.path().join("closed.xlsx"));
        writer.select_or_create_sheet("Data").expect("select sheet");
        writer
            .write_table(&table_rows(&[&["date", "v"], &["2020-05-01", "1"]]))
            .expect("write table");
        writer.close().expect("close");
        writer.close().expect("close is idempotent");

        let err = writer
            .select_or_create_sheet("More")
            .expect_err("must fail");
        assert!(matches!(err, ReportWriteError::WriterClosed));
    }

    #[test]
    fn reselecting_sheet_keeps_existing_rows() {
        let tmp = TestDir::new();
        let path_out = tmp.path().join("idempotent.xlsx");

        let mut writer = ReportWriter::new(&path_out);
        writer.select_or_create_sheet("Data").expect("select sheet");
        writer
            .write_table(&table_rows(&[&["date", "v"], &["2020-05-01", "1"]]))
            .expect("write table");

        writer.select_or_create_sheet("Other").expect("select sheet");
        writer.select_or_create_sheet("Data").expect("reselect");
        writer
            .write_row(2, &table_rows(&[&["2020-06-01", "2"]])[0], false)
            .expect("append row");
        writer.close().expect("close");

        let reader = TabularReader::open(&path_out).expect("read back");
        assert_eq!(reader.row_count(), 3);
        assert_eq!(
            reader.row(0)[0],
            EnumCellValue::String("date".to_string())
        );
    }

    #[test]
    fn write_column_advances_next_free_column() {
        let tmp = TestDir::new();
        let path_out = tmp.path().join("columns.xlsx");

        let mut writer = ReportWriter::new(&path_out);
        writer.select_or_create_sheet("Wide").expect("select sheet");
        assert_eq!(writer.next_free_column("Wide"), Some(0));

        writer
            .write_column(0, &table_rows(&[&["label", "alpha", "beta"]])[0], true)
            .expect("write column");
        assert_eq!(writer.next_free_column("Wide"), Some(1));

        let n_col = writer
            .append_column(&table_rows(&[&["extra", "1", "2"]])[0], false)
            .expect("append column");
        assert_eq!(n_col, 1);
        assert_eq!(writer.next_free_column("Wide"), Some(2));
        writer.close().expect("close");

        let reader = TabularReader::open(&path_out).expect("read back");
        assert_eq!(
            reader.row(1),
            vec![
                EnumCellValue::String("alpha".to_string()),
                EnumCellValue::String("1".to_string())
            ]
        );
    }

    #[test]
    fn sheet_names_are_sanitized_on_selection() {
        let tmp = TestDir::new();
        let path_out = tmp.path().join("sanitized.xlsx");

        let mut writer = ReportWriter::new(&path_out);
        writer
            .select_or_create_sheet("Q3: Starts/Stops")
            .expect("select sheet");
        assert_eq!(writer.sheet_active(), Some("Q3_ Starts_Stops"));
        writer
            .write_row(0, &table_rows(&[&["date"]])[0], true)
            .expect("write header");
        writer.close().expect("close");

        let reader = TabularReader::open(&path_out).expect("read back");
        assert_eq!(reader.sheet_names(), vec!["Q3_ Starts_Stops"]);
    }

    #[test]
    fn add_chart_produces_a_readable_workbook() {
        let tmp = TestDir::new();
        let path_out = tmp.path().join("charted.xlsx");

        let mut writer = ReportWriter::new(&path_out);
        writer.select_or_create_sheet("Starts").expect("select sheet");
        writer
            .write_table(&table_rows(&[
                &["date", "starts"],
                &["2020-05-01", "891"],
                &["2020-06-01", "974"],
            ]))
            .expect("write table");
        writer
            .add_chart(&SpecChartRequest {
                sheet_name_source: "Starts".to_string(),
                col_letter_data: "B".to_string(),
                n_row_data_last: 3,
                title: "Housing starts".to_string(),
                label_y_axis: Some("thousands".to_string()),
                cell_target: "E2".to_string(),
            })
            .expect("add chart");
        writer.close().expect("close");

        let reader = TabularReader::open(&path_out).expect("read back");
        assert_eq!(reader.sheet_names(), vec!["Starts"]);
        assert_eq!(reader.row_count(), 3);
    }

    #[test]
    fn add_chart_rejects_malformed_anchor_and_column() {
        let tmp = TestDir::new();
        let mut writer = ReportWriter::new(tmp.path().join("bad_chart.xlsx"));
        writer.select_or_create_sheet("Starts").expect("select sheet");

        let request = SpecChartRequest {
            sheet_name_source: "Starts".to_string(),
            col_letter_data: "B".to_string(),
            n_row_data_last: 3,
            title: "t".to_string(),
            label_y_axis: None,
            cell_target: "nope!".to_string(),
        };
        let err = writer.add_chart(&request).expect_err("must fail");
        assert!(matches!(err, ReportWriteError::InvalidCellAnchor(_)));

        let request_bad_col = SpecChartRequest {
            col_letter_data: "7".to_string(),
            cell_target: "E2".to_string(),
            ..request
        };
        let err = writer.add_chart(&request_bad_col).expect_err("must fail");
        assert!(matches!(err, ReportWriteError::InvalidColumnLetter(_)));
    }
}
