//! Final tabular report: one header row, one row per configured route.
//!
//! Every row has the same columns whether or not the route had inventory:
//!
//! | To | From | Alt Origins | `<Mon YYYY> D` | `<Mon YYYY> R` | ... | Points (To HUB) | Points (From HUB) | Taxes (To HUB) | Taxes (From HUB) |
//!
//! The `D` column and the `To <HUB>` summaries describe the leg flown into
//! the hub ([`Direction::Return`]); the `R` column and the `From <HUB>`
//! summaries describe the leg flown out of it ([`Direction::Outbound`]).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{AirportCode, Direction, DirectionSummary, MonthWindow, RouteSummary, YearMonth};

/// Error type for report output.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error writing report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Row ordering of the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    /// Order of the configured airport list.
    #[default]
    Config,
    /// Alphabetical by remote airport code.
    RemoteCode,
}

/// Column layout of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    pub hub: AirportCode,
    /// Declared columns ahead of the window; always blank.
    pub reserved_before: Vec<YearMonth>,
    pub window: MonthWindow,
    /// Declared columns after the window; always blank.
    pub reserved_after: Vec<YearMonth>,
    pub row_order: RowOrder,
}

impl ReportLayout {
    /// Layout with one reserved trailing month (the month after the window).
    pub fn new(hub: AirportCode, window: MonthWindow) -> Self {
        let reserved_after = vec![window.last().succ()];
        Self {
            hub,
            reserved_before: Vec::new(),
            window,
            reserved_after,
            row_order: RowOrder::Config,
        }
    }

    pub fn with_reserved_before(mut self, months: Vec<YearMonth>) -> Self {
        self.reserved_before = months;
        self
    }

    pub fn with_reserved_after(mut self, months: Vec<YearMonth>) -> Self {
        self.reserved_after = months;
        self
    }

    pub fn with_row_order(mut self, row_order: RowOrder) -> Self {
        self.row_order = row_order;
        self
    }

    /// Every month that gets a D/R column pair, in column order.
    pub fn column_months(&self) -> impl Iterator<Item = YearMonth> + '_ {
        self.reserved_before
            .iter()
            .copied()
            .chain(self.window.iter())
            .chain(self.reserved_after.iter().copied())
    }

    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["To".to_string(), "From".to_string(), "Alt Origins".to_string()];
        for month in self.column_months() {
            let label = month.label();
            header.push(format!("{} D", label));
            header.push(format!("{} R", label));
        }
        header.push(format!("Points (To {})", self.hub));
        header.push(format!("Points (From {})", self.hub));
        header.push(format!("Taxes (To {})", self.hub));
        header.push(format!("Taxes (From {})", self.hub));
        header
    }

    pub fn column_count(&self) -> usize {
        3 + 2 * self.column_months().count() + 4
    }

    fn row(&self, summary: &RouteSummary) -> Vec<String> {
        let into_hub = summary.direction(Direction::Return);
        let out_of_hub = summary.direction(Direction::Outbound);

        let mut row = Vec::with_capacity(self.column_count());
        row.push(summary.route.hub.to_string());
        row.push(summary.route.remote.to_string());
        row.push(String::new());
        for month in self.column_months() {
            row.push(into_hub.dates_for(month).to_string());
            row.push(out_of_hub.dates_for(month).to_string());
        }
        row.push(points_cell(into_hub));
        row.push(points_cell(out_of_hub));
        row.push(tax_cell(into_hub));
        row.push(tax_cell(out_of_hub));
        row
    }
}

fn points_cell(summary: &DirectionSummary) -> String {
    summary
        .points
        .map(|points| points.to_short_string())
        .unwrap_or_default()
}

fn tax_cell(summary: &DirectionSummary) -> String {
    summary.tax.map(|tax| tax.to_string()).unwrap_or_default()
}

/// The assembled report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Report {
    /// Render as CSV text.
    pub fn to_csv_string(&self) -> Result<String, ReportError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        self.write_records(&mut wtr)?;
        let buff = wtr.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8(buff)?)
    }

    /// Write as a CSV file, replacing any existing file.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), ReportError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut wtr = csv::Writer::from_path(path)?;
        self.write_records(&mut wtr)?;
        wtr.flush()?;
        Ok(())
    }

    fn write_records<W: std::io::Write>(&self, wtr: &mut csv::Writer<W>) -> Result<(), ReportError> {
        wtr.write_record(&self.header)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        Ok(())
    }
}

/// Build the report from per-route summaries given in configuration order.
pub fn assemble_report(layout: &ReportLayout, mut summaries: Vec<RouteSummary>) -> Report {
    if layout.row_order == RowOrder::RemoteCode {
        summaries.sort_by_key(|summary| summary.route.remote);
    }
    Report {
        header: layout.header(),
        rows: summaries.iter().map(|summary| layout.row(summary)).collect(),
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod report_tests;
