//! Request validation and company-scoped lookups.
//!
//! `QueryService` holds a shared, read-only `Dataset` and turns raw request
//! parameters into either a result or a `QueryError`. It keeps no state between
//! calls, so one instance can serve any number of concurrent requests.

mod error;

pub use error::{Operation, QueryError, DATE_EXAMPLE};

use crate::model::company::{CompanyId, FieldKind};
use crate::model::record::{DateSpan, StockRecord};
use crate::store::{parse_request_date, Dataset, FieldError, PriceRow};
use chrono::NaiveDate;
use log::debug;
use std::sync::Arc;

/// Answers price queries against a shared dataset.
#[derive(Debug, Clone)]
pub struct QueryService {
    dataset: Arc<Dataset>,
}

impl QueryService {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The supported companies. Independent of what the dataset contains.
    pub fn companies(&self) -> &'static [CompanyId] {
        &CompanyId::ALL
    }

    /// Earliest and latest available dates and the number of rows.
    pub fn date_span(&self) -> Result<DateSpan, QueryError> {
        self.dataset
            .date_span()
            .ok_or(QueryError::DatasetUnavailable)
    }

    /// Prices of `company` on `date`, including the open-to-close change.
    ///
    /// # Arguments
    ///
    /// * `company` - Ticker, any case.
    /// * `date` - Trading day as `YYYY-MM-DD`.
    pub fn get_stock(
        &self,
        company: Option<&str>,
        date: Option<&str>,
    ) -> Result<StockRecord, QueryError> {
        debug!("get_stock company={:?} date={:?}", company, date);

        let (company, date) = match (normalize_company(company), non_empty(date)) {
            (Some(c), Some(d)) => (c, d),
            _ => return Err(QueryError::MissingParameter(Operation::Stock)),
        };
        let company = parse_company(&company)?;
        let date = parse_date(date)?;
        self.ensure_available()?;

        let row = self
            .dataset
            .find_by_date(date)
            .ok_or(QueryError::NoDataForDate(date))?;

        Ok(self.extract(row, date, company)?.with_change_percent())
    }

    /// Prices of `company` for every row dated within `start..=end`, in dataset order.
    ///
    /// Fails as a whole if any matched row cannot be read; partial results are never returned.
    pub fn get_stock_range(
        &self,
        company: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<StockRecord>, QueryError> {
        debug!(
            "get_stock_range company={:?} start={:?} end={:?}",
            company, start, end
        );

        let (company, start, end) =
            match (normalize_company(company), non_empty(start), non_empty(end)) {
                (Some(c), Some(s), Some(e)) => (c, s, e),
                _ => return Err(QueryError::MissingParameter(Operation::StockRange)),
            };
        let company = parse_company(&company)?;
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        self.ensure_available()?;

        let rows = self.dataset.find_by_date_range(start, end);
        if rows.is_empty() {
            return Err(QueryError::NoDataForRange { start, end });
        }

        rows.into_iter()
            .map(|(date, row)| self.extract(row, date, company))
            .collect()
    }

    fn ensure_available(&self) -> Result<(), QueryError> {
        if self.dataset.is_empty() {
            return Err(QueryError::DatasetUnavailable);
        }
        Ok(())
    }

    fn extract(
        &self,
        row: &PriceRow,
        date: NaiveDate,
        company: CompanyId,
    ) -> Result<StockRecord, QueryError> {
        let read = |field| {
            self.dataset
                .field(row, company, field)
                .map_err(|e| field_error(company, e))
        };

        Ok(StockRecord {
            date,
            company,
            open: read(FieldKind::Open)?,
            high: read(FieldKind::High)?,
            low: read(FieldKind::Low)?,
            close: read(FieldKind::Close)?,
            volume: read(FieldKind::Volume)?.trunc() as i64,
            change_percent: None,
        })
    }
}

fn field_error(company: CompanyId, err: FieldError) -> QueryError {
    match err {
        FieldError::MissingColumn(column) => QueryError::MissingDataColumn { company, column },
        other => QueryError::InternalError(other.to_string()),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn normalize_company(value: Option<&str>) -> Option<String> {
    non_empty(value).map(str::to_ascii_uppercase)
}

fn parse_company(upper: &str) -> Result<CompanyId, QueryError> {
    upper
        .parse()
        .map_err(|_| QueryError::InvalidCompany(upper.to_string()))
}

fn parse_date(raw: &str) -> Result<NaiveDate, QueryError> {
    parse_request_date(raw).ok_or_else(|| QueryError::InvalidDateFormat(raw.to_string()))
}
