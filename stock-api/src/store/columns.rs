use crate::model::company::{column_name, CompanyId, FieldKind};
use csv::StringRecord;

/// Typed mapping from `(CompanyId, FieldKind)` to a column position in the source file.
///
/// Built once from the header row so every later lookup is an array index
/// instead of a string-keyed search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    slots: [[Option<usize>; FieldKind::COUNT]; CompanyId::COUNT],
}

impl ColumnMap {
    /// Locates every `<COMPANY>_<Field>` column in `headers`.
    ///
    /// When a header appears more than once, the first occurrence wins.
    pub fn resolve(headers: &StringRecord) -> Self {
        let mut map = Self::default();
        for company in CompanyId::ALL {
            for field in FieldKind::ALL {
                let name = column_name(company, field);
                map.slots[company.index()][field.index()] =
                    headers.iter().position(|h| h == name);
            }
        }
        map
    }

    /// Source column position for the pair, or `None` if the file has no such column.
    pub fn position(&self, company: CompanyId, field: FieldKind) -> Option<usize> {
        self.slots[company.index()][field.index()]
    }

    pub fn contains(&self, company: CompanyId, field: FieldKind) -> bool {
        self.position(company, field).is_some()
    }

    /// Names of the expected columns that the source file did not provide.
    pub fn missing(&self) -> Vec<String> {
        CompanyId::ALL
            .into_iter()
            .flat_map(|c| FieldKind::ALL.into_iter().map(move |f| (c, f)))
            .filter(|(c, f)| !self.contains(*c, *f))
            .map(|(c, f)| column_name(c, f))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_finds_columns_in_any_order() {
        let headers = StringRecord::from(vec!["AAPL_Close", "Date", "AAPL_Open"]);
        let map = ColumnMap::resolve(&headers);

        assert_eq!(map.position(CompanyId::Aapl, FieldKind::Close), Some(0));
        assert_eq!(map.position(CompanyId::Aapl, FieldKind::Open), Some(2));
        assert_eq!(map.position(CompanyId::Aapl, FieldKind::High), None);
        assert!(!map.contains(CompanyId::Tsla, FieldKind::Volume));
    }

    #[test]
    fn test_missing_lists_absent_pairs() {
        let headers = StringRecord::from(vec!["Date", "AAPL_Open"]);
        let missing = ColumnMap::resolve(&headers).missing();

        assert_eq!(missing.len(), CompanyId::COUNT * FieldKind::COUNT - 1);
        assert!(!missing.contains(&"AAPL_Open".to_string()));
        assert!(missing.contains(&"AAPL_High".to_string()));
    }
}
