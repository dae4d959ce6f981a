use crate::model::company::CompanyId;
use chrono::NaiveDate;
use thiserror::Error;

/// The lookup a request was made for.
///
/// Only used to tailor the usage hint of a `MissingParameter` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Stock,
    StockRange,
}

impl Operation {
    /// A complete, valid request for this operation.
    pub fn example(&self) -> &'static str {
        match self {
            Operation::Stock => "/get_stock?company=AAPL&date=2023-07-10",
            Operation::StockRange => {
                "/get_stock_range?company=AAPL&start_date=2023-07-01&end_date=2023-07-10"
            }
        }
    }

    fn missing_parameter_message(&self) -> &'static str {
        match self {
            Operation::Stock => "Please provide both company and date",
            Operation::StockRange => "Please provide company, start_date, and end_date",
        }
    }
}

/// Example of a well-formed request date.
pub const DATE_EXAMPLE: &str = "2023-07-10";

/// Every way a query can fail. All of them are scoped to a single request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// A required parameter is absent or empty.
    #[error("{}", .0.missing_parameter_message())]
    MissingParameter(Operation),

    /// The company is not one of the supported tickers. Holds the upper-cased input.
    #[error("Invalid company. Choose from: {}", CompanyId::joined())]
    InvalidCompany(String),

    /// A date parameter is not written as `YYYY-MM-DD`. Holds the raw input.
    #[error("Invalid date format. Use YYYY-MM-DD")]
    InvalidDateFormat(String),

    /// No dataset was loaded.
    #[error("Dataset not available")]
    DatasetUnavailable,

    #[error("No data found for {0}")]
    NoDataForDate(NaiveDate),

    #[error("No data found for the specified date range")]
    NoDataForRange { start: NaiveDate, end: NaiveDate },

    /// The dataset has no column for one of the company's fields.
    #[error("Data columns not available for company {company}")]
    MissingDataColumn { company: CompanyId, column: String },

    /// Any other failure while reading a matched row.
    #[error("Internal server error")]
    InternalError(String),
}

impl QueryError {
    /// Short, stable name of the error variant.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::MissingParameter(_) => "MissingParameter",
            QueryError::InvalidCompany(_) => "InvalidCompany",
            QueryError::InvalidDateFormat(_) => "InvalidDateFormat",
            QueryError::DatasetUnavailable => "DatasetUnavailable",
            QueryError::NoDataForDate(_) => "NoDataForDate",
            QueryError::NoDataForRange { .. } => "NoDataForRange",
            QueryError::MissingDataColumn { .. } => "MissingDataColumn",
            QueryError::InternalError(_) => "InternalError",
        }
    }
}
