//! Query result shapes.
//!
//! `StockRecord` is the per-company view of one dataset row, and `DateSpan`
//! summarises which calendar dates the dataset covers.

use crate::model::company::CompanyId;
use chrono::NaiveDate;
use serde::Serialize;

/// Prices of one company on one trading day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Company")]
    pub company: CompanyId,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: i64,
    /// Intraday move from open to close, in percent. Only set for single-date lookups.
    #[serde(rename = "Change_Percent", skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<f64>,
}

impl StockRecord {
    /// Fills in `change_percent` from the record's own open and close.
    ///
    /// Leaves the field empty when the change cannot be computed.
    pub fn with_change_percent(mut self) -> Self {
        self.change_percent = change_percent(self.open, self.close);
        self
    }
}

/// `(close - open) / open * 100`, rounded to 2 decimal places.
///
/// Rounding works on the exact binary value and breaks ties to even, so
/// `0.125` becomes `0.12`.
///
/// Returns `None` when `open` is zero or either price is not a finite number.
pub fn change_percent(open: f64, close: f64) -> Option<f64> {
    if open == 0.0 || !open.is_finite() || !close.is_finite() {
        return None;
    }
    let change = (close - open) / open * 100.0;
    Some(round_to(change, 2)).filter(|c| c.is_finite())
}

fn round_to(value: f64, decimals: usize) -> f64 {
    // Float formatting rounds the exact value half to even.
    format!("{:.*}", decimals, value)
        .parse()
        .unwrap_or(value)
}

/// The calendar span covered by the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateSpan {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    /// Number of rows in the dataset, including rows whose date could not be read.
    pub total_days: usize,
}
