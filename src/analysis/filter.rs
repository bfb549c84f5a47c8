use crate::models::Record;

/// Status half of a list query: everything, or one exact status label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(String),
}

impl StatusFilter {
    /// `"all"` (any case) or an empty string selects every status; anything
    /// else must equal a status label exactly.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            StatusFilter::All
        } else {
            StatusFilter::Only(trimmed.to_string())
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == label,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub search: String,
    pub status: StatusFilter,
}

impl RecordQuery {
    pub fn new(search: &str, status: &str) -> Self {
        RecordQuery {
            search: search.to_string(),
            status: StatusFilter::parse(status),
        }
    }

    pub fn from_options(search: Option<&str>, status: Option<&str>) -> Self {
        Self::new(search.unwrap_or_default(), status.unwrap_or("all"))
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.status.matches(record.status_label())
            && matches_search(&record.search_fields(), &self.search.to_lowercase())
    }
}

/// True when `needle` (already lowercased) is empty or occurs in any field,
/// ignoring case.
pub fn matches_search(fields: &[&str], needle: &str) -> bool {
    needle.is_empty() || fields.iter().any(|field| field.to_lowercase().contains(needle))
}

/// Lazily yields the records that satisfy `query`, keeping their order.
pub fn project<'a, R: Record>(records: &'a [R], query: &RecordQuery) -> impl Iterator<Item = &'a R> + 'a {
    let needle = query.search.to_lowercase();
    let status = query.status.clone();

    records
        .iter()
        .filter(move |record| status.matches(record.status_label()) && matches_search(&record.search_fields(), &needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payable::Payable;
    use crate::models::site_progress::SiteProgress;
    use crate::store::RecordTable;

    #[test]
    fn all_returns_everything_in_order() {
        let table = RecordTable::<Payable>::seeded(2024).unwrap();
        let query = RecordQuery::new("", "all");
        let ids: Vec<&str> = project(table.records(), &query).map(|p| p.id.as_str()).collect();
        let expected: Vec<&str> = table.records().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn exact_status_keeps_only_matching_records() {
        let table = RecordTable::<SiteProgress>::seeded(2024).unwrap();
        let query = RecordQuery::new("", "Critical");
        let matched: Vec<&SiteProgress> = project(table.records(), &query).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].site_name, "Ward 7 Health Centre");

        // Labels are compared exactly, not case-folded.
        assert_eq!(project(table.records(), &RecordQuery::new("", "critical")).count(), 0);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let table = RecordTable::<Payable>::seeded(2024).unwrap();
        let query = RecordQuery::new("builders", "all");
        let matched: Vec<&Payable> = project(table.records(), &query).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].vendor, "ABC Builders Ltd.");
        assert!(query.matches(matched[0]));
    }

    #[test]
    fn search_and_status_combine() {
        let table = RecordTable::<Payable>::seeded(2024).unwrap();
        assert_eq!(
            project(table.records(), &RecordQuery::new("builders", "Pending Approval")).count(),
            0
        );
        assert_eq!(
            project(table.records(), &RecordQuery::new("PAY-2024", "Pending Approval")).count(),
            1
        );
    }

    #[test]
    fn parse_treats_blank_as_all() {
        assert_eq!(StatusFilter::parse(""), StatusFilter::All);
        assert_eq!(StatusFilter::parse("ALL"), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse(" On Hold "),
            StatusFilter::Only("On Hold".to_string())
        );
    }
}
