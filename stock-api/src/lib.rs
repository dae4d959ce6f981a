//! # Stock Price Library
//!
//! Read-only access to a daily price table for a fixed set of companies.
//!
//! ## Modules
//! - `model`: Company identifiers, price fields and the query result shapes.
//! - `store`: The immutable in-memory dataset, loaded once from CSV.
//! - `query`: Request validation and company-scoped lookups over the dataset.

pub mod model;
pub mod query;
pub mod store;

pub use model::company::{CompanyId, FieldKind};
pub use model::record::{DateSpan, StockRecord};
pub use query::{Operation, QueryError, QueryService};
pub use store::{Dataset, FieldError, LoadError, PriceRow};
