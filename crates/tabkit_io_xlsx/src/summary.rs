//! Chart-mirroring decorator over the report writer.

use std::path::PathBuf;

use crate::conf::C_SHEET_NAME_SUMMARY;
use crate::spec::{ReportWriteError, SpecChartRequest};
use crate::util::derive_summary_chart_cell;
use crate::writer::ReportWriter;

/// Report writer that mirrors every chart onto a consolidated sheet.
///
/// Wraps a [`ReportWriter`] by composition: all operations forward to the
/// inner writer except [`Self::add_chart`], which also places a copy of the
/// chart on the "Summary" sheet in a fixed two-column grid. The grid counter
/// is owned by this writer and never resets.
pub struct SummaryReportWriter {
    writer: ReportWriter,
    n_chart_count: usize,
}

impl SummaryReportWriter {
    /// Create the inner writer and its "Summary" sheet, which becomes the
    /// initially active sheet.
    pub fn new(path_file_out: impl Into<PathBuf>) -> Result<Self, ReportWriteError> {
        let mut writer = ReportWriter::new(path_file_out);
        writer.select_or_create_sheet(C_SHEET_NAME_SUMMARY)?;
        Ok(Self {
            writer,
            n_chart_count: 0,
        })
    }

    /// Number of charts mirrored onto the Summary sheet so far.
    pub fn chart_count(&self) -> usize {
        self.n_chart_count
    }

    /// Add the chart to the active sheet, then mirror it onto Summary.
    ///
    /// The mirrored copy lands at the next free grid cell and the previously
    /// active sheet is restored afterwards. The grid counter advances once
    /// per call regardless of which grid cell was used.
    pub fn add_chart(&mut self, request: &SpecChartRequest) -> Result<(), ReportWriteError> {
        self.writer.add_chart(request)?;

        let sheet_name_restore = self.writer.sheet_active().map(ToString::to_string);
        self.writer.select_or_create_sheet(C_SHEET_NAME_SUMMARY)?;

        let request_mirror = SpecChartRequest {
            cell_target: derive_summary_chart_cell(self.n_chart_count),
            ..request.clone()
        };
        self.writer.add_chart(&request_mirror)?;

        if let Some(c_name) = sheet_name_restore {
            self.writer.select_or_create_sheet(&c_name)?;
        }

        self.n_chart_count += 1;
        Ok(())
    }

    /// See [`ReportWriter::select_or_create_sheet`].
    pub fn select_or_create_sheet(&mut self, sheet_name: &str) -> Result<(), ReportWriteError> {
        self.writer.select_or_create_sheet(sheet_name)
    }

    /// See [`ReportWriter::write_row`].
    pub fn write_row(
        &mut self,
        n_idx_row: usize,
        data: &[String],
        if_header: bool,
    ) -> Result<(), ReportWriteError> {
        self.writer.write_row(n_idx_row, data, if_header)
    }

    /// See [`ReportWriter::write_table`].
    pub fn write_table(&mut self, rows: &[Vec<String>]) -> Result<(), ReportWriteError> {
        self.writer.write_table(rows)
    }

    /// See [`ReportWriter::write_column`].
    pub fn write_column(
        &mut self,
        n_idx_col: usize,
        data: &[String],
        if_header_style: bool,
    ) -> Result<(), ReportWriteError> {
        self.writer.write_column(n_idx_col, data, if_header_style)
    }

    /// See [`ReportWriter::append_column`].
    pub fn append_column(
        &mut self,
        data: &[String],
        if_header_style: bool,
    ) -> Result<u16, ReportWriteError> {
        self.writer.append_column(data, if_header_style)
    }

    /// See [`ReportWriter::close`].
    pub fn close(&mut self) -> Result<(), ReportWriteError> {
        self.writer.close()
    }

    /// See [`ReportWriter::file_out`].
    pub fn file_out(&self) -> String {
        self.writer.file_out()
    }

    /// See [`ReportWriter::sheet_active`].
    pub fn sheet_active(&self) -> Option<&str> {
        self.writer.sheet_active()
    }

    /// See [`ReportWriter::next_free_column`].
    pub fn next_free_column(&self, sheet_name: &str) -> Option<u16> {
        self.writer.next_free_column(sheet_name)
    }
}
