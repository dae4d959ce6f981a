pub mod company;
pub mod record;

pub use company::{CompanyId, FieldKind};
pub use record::{DateSpan, StockRecord};
