use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// The record collections a workspace holds, one per administration register.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString, EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Collection {
    Budgets,
    Payables,
    Receipts,
    SiteProgress,
    Compensation,
    Valuations,
    Hearings,
    Dpr,
    Projects,
    Estimates,
    Rti,
}

impl Collection {
    pub fn id_prefix(self) -> &'static str {
        match self {
            Collection::Budgets => "BUD",
            Collection::Payables => "PAY",
            Collection::Receipts => "RCT",
            Collection::SiteProgress => "SPR",
            Collection::Compensation => "CMP",
            Collection::Valuations => "VAL",
            Collection::Hearings => "HRG",
            Collection::Dpr => "DPR",
            Collection::Projects => "PRJ",
            Collection::Estimates => "EST",
            Collection::Rti => "RTI",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Collection::Budgets => "Budgeting",
            Collection::Payables => "Payables",
            Collection::Receipts => "Receipts",
            Collection::SiteProgress => "Site Progress",
            Collection::Compensation => "Compensation",
            Collection::Valuations => "Valuation",
            Collection::Hearings => "Hearings",
            Collection::Dpr => "DPR / Design",
            Collection::Projects => "Project Master",
            Collection::Estimates => "Resource Estimation",
            Collection::Rti => "RTI Applications",
        }
    }

    /// File-name stem for exports (`site_progress`).
    pub fn export_stem(self) -> String {
        self.to_string().replace('-', "_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_kebab_case_names() {
        assert_eq!(Collection::from_str("site-progress").unwrap(), Collection::SiteProgress);
        assert_eq!(Collection::from_str("RTI").unwrap(), Collection::Rti);
        assert!(Collection::from_str("ledger").is_err());
    }

    #[test]
    fn prefixes_are_unique() {
        let mut prefixes: Vec<&str> = Collection::iter().map(Collection::id_prefix).collect();
        prefixes.sort_unstable();
        prefixes.dedup();
        assert_eq!(prefixes.len(), Collection::iter().count());
    }

    #[test]
    fn export_stem_uses_underscores() {
        assert_eq!(Collection::SiteProgress.export_stem(), "site_progress");
        assert_eq!(Collection::Budgets.export_stem(), "budgets");
    }
}
