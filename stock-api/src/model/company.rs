//! Defines the fixed set of queryable companies and the per-company price fields.
//!
//! The company set is declared here independently of any dataset. A dataset is
//! expected to carry one `<COMPANY>_<Field>` column for every pair, but a gap is
//! only discovered (and reported) per query.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Ticker symbol of one of the supported companies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompanyId {
    Aapl,
    Amzn,
    Googl,
    Msft,
    Tsla,
}

impl CompanyId {
    pub const COUNT: usize = 5;

    /// Every supported company, in the order they are advertised to clients.
    pub const ALL: [CompanyId; Self::COUNT] = [
        CompanyId::Aapl,
        CompanyId::Amzn,
        CompanyId::Googl,
        CompanyId::Msft,
        CompanyId::Tsla,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyId::Aapl => "AAPL",
            CompanyId::Amzn => "AMZN",
            CompanyId::Googl => "GOOGL",
            CompanyId::Msft => "MSFT",
            CompanyId::Tsla => "TSLA",
        }
    }

    /// Comma separated list of all tickers, e.g. `AAPL, AMZN, ...`.
    pub fn joined() -> String {
        Self::ALL
            .iter()
            .map(CompanyId::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a ticker is not part of the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown company '{0}'")]
pub struct UnknownCompany(pub String);

impl FromStr for CompanyId {
    type Err = UnknownCompany;

    /// Parses a ticker case-insensitively (`aapl` and `AAPL` are the same company).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == upper)
            .ok_or(UnknownCompany(upper))
    }
}

/// One of the five numeric fields stored per company and date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl FieldKind {
    pub const COUNT: usize = 5;

    pub const ALL: [FieldKind; Self::COUNT] = [
        FieldKind::Open,
        FieldKind::High,
        FieldKind::Low,
        FieldKind::Close,
        FieldKind::Volume,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Open => "Open",
            FieldKind::High => "High",
            FieldKind::Low => "Low",
            FieldKind::Close => "Close",
            FieldKind::Volume => "Volume",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Name of the source column holding `field` for `company`, e.g. `AAPL_Open`.
pub fn column_name(company: CompanyId, field: FieldKind) -> String {
    format!("{}_{}", company.as_str(), field.as_str())
}
