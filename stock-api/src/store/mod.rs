//! The in-memory price table.
//!
//! A `Dataset` is loaded once from a CSV file with a `Date` column and one
//! `<COMPANY>_<Field>` column per company and field. It is never mutated after
//! construction, so it can be shared freely between request handlers.

mod columns;
mod dates;

pub use columns::ColumnMap;
pub use dates::{parse_calendar_date, parse_request_date};

use crate::model::company::{column_name, CompanyId, FieldKind};
use crate::model::record::DateSpan;
use chrono::NaiveDate;
use csv::StringRecord;
use log::{error, info, warn};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Header of the column holding the trading day.
pub const DATE_COLUMN: &str = "Date";

/// Errors raised while reading the source file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path:?}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("source has no 'Date' column")]
    MissingDateColumn,
}

/// Why a field could not be read from a row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The source file has no column for this company and field.
    #[error("missing column {0}")]
    MissingColumn(String),

    /// The column exists but this row holds no usable number in it.
    #[error("no numeric value in column {column} for row dated {date}")]
    NoValue { column: String, date: String },
}

/// One line of the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    date: Option<NaiveDate>,
    prices: [[Option<f64>; FieldKind::COUNT]; CompanyId::COUNT],
}

impl PriceRow {
    fn from_record(record: &StringRecord, date_position: usize, columns: &ColumnMap) -> Self {
        let mut prices = [[None; FieldKind::COUNT]; CompanyId::COUNT];
        for company in CompanyId::ALL {
            for field in FieldKind::ALL {
                prices[company.index()][field.index()] = columns
                    .position(company, field)
                    .and_then(|p| record.get(p))
                    .and_then(parse_number);
            }
        }

        Self {
            date: record.get(date_position).and_then(parse_calendar_date),
            prices,
        }
    }

    /// Calendar date of the row, or `None` if the source value could not be read as a date.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn value(&self, company: CompanyId, field: FieldKind) -> Option<f64> {
        self.prices[company.index()][field.index()]
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Immutable table of daily prices, in source order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: ColumnMap,
    rows: Vec<PriceRow>,
}

impl Dataset {
    /// A dataset with no rows. Every query against it reports unavailability.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the dataset from `path`, falling back to an empty dataset on any error.
    ///
    /// The failure is logged rather than returned: a service started without data
    /// keeps running and answers every data query with an unavailability error.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(dataset) => {
                info!(
                    "Dataset loaded successfully from {:?} ({} rows)",
                    path,
                    dataset.len()
                );
                dataset
            }
            Err(e) => {
                error!("Failed to load dataset from {:?}: {}", path, e);
                Self::empty()
            }
        }
    }

    /// Loads the dataset from `path`, reporting why it could not be read.
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Parses CSV content. The first line must be the header row.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let date_position = headers
            .iter()
            .position(|h| h == DATE_COLUMN)
            .ok_or(LoadError::MissingDateColumn)?;
        let columns = ColumnMap::resolve(&headers);

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(PriceRow::from_record(&record?, date_position, &columns));
        }

        let missing = columns.missing();
        if !missing.is_empty() {
            warn!("Dataset is missing columns: {}", missing.join(", "));
        }
        let undated = rows.iter().filter(|r| r.date.is_none()).count();
        if undated > 0 {
            warn!("{} rows have an unreadable date and will never match a lookup", undated);
        }

        Ok(Self { columns, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows, including rows with an unreadable date.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Earliest and latest readable dates, plus the total row count.
    ///
    /// `None` when the dataset is empty or no row carries a readable date.
    pub fn date_span(&self) -> Option<DateSpan> {
        let mut dates = self.rows.iter().filter_map(PriceRow::date);
        let first = dates.next()?;
        let (min_date, max_date) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));

        Some(DateSpan {
            min_date,
            max_date,
            total_days: self.len(),
        })
    }

    /// First row dated `date`.
    pub fn find_by_date(&self, date: NaiveDate) -> Option<&PriceRow> {
        self.rows.iter().find(|r| r.date == Some(date))
    }

    /// All rows dated within `start..=end` with their dates, in source order.
    ///
    /// An inverted range simply matches nothing.
    pub fn find_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<(NaiveDate, &PriceRow)> {
        self.rows
            .iter()
            .filter_map(|r| r.date.map(|d| (d, r)))
            .filter(|(d, _)| start <= *d && *d <= end)
            .collect()
    }

    /// Reads one company field from a row of this dataset.
    pub fn field(
        &self,
        row: &PriceRow,
        company: CompanyId,
        field: FieldKind,
    ) -> Result<f64, FieldError> {
        if !self.columns.contains(company, field) {
            return Err(FieldError::MissingColumn(column_name(company, field)));
        }
        row.value(company, field).ok_or_else(|| FieldError::NoValue {
            column: column_name(company, field),
            date: row
                .date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "<invalid>".to_string()),
        })
    }
}
