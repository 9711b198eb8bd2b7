use std::fmt;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const COL_DRUG_NAME: &str = "drug_name";
pub const COL_GENERIC_NAME: &str = "generic_name";
pub const COL_MEDICAL_CONDITION: &str = "medical_condition";
pub const COL_SIDE_EFFECTS: &str = "side_effects";
pub const COL_RATING: &str = "rating";
pub const COL_NO_OF_REVIEWS: &str = "no_of_reviews";
pub const COL_CSA: &str = "csa";
pub const COL_DRUG_LINK: &str = "drug_link";
pub const COL_MEDICAL_CONDITION_URL: &str = "medical_condition_url";

/// Columns a source must provide, otherwise loading fails.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_DRUG_NAME,
    COL_GENERIC_NAME,
    COL_MEDICAL_CONDITION,
    COL_SIDE_EFFECTS,
    COL_RATING,
    COL_NO_OF_REVIEWS,
];

/// Columns that may be missing from a source entirely.
pub const OPTIONAL_COLUMNS: [&str; 3] = [COL_CSA, COL_DRUG_LINK, COL_MEDICAL_CONDITION_URL];

/// Every known column in display order.
pub const ALL_COLUMNS: [&str; 9] = [
    COL_DRUG_NAME,
    COL_GENERIC_NAME,
    COL_MEDICAL_CONDITION,
    COL_SIDE_EFFECTS,
    COL_RATING,
    COL_NO_OF_REVIEWS,
    COL_CSA,
    COL_DRUG_LINK,
    COL_MEDICAL_CONDITION_URL,
];

// ---------------------------------------------------------------------------
// DrugRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single drug entry (one row of the source table).
///
/// Every cell is optional: an empty cell in the source becomes `None`
/// rather than a sentinel string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrugRecord {
    pub drug_name: Option<String>,
    pub generic_name: Option<String>,
    pub medical_condition: Option<String>,
    /// `;`-delimited list of side effect names.
    pub side_effects: Option<String>,
    /// 0–10 user rating.
    pub rating: Option<f64>,
    pub no_of_reviews: Option<u64>,
    /// Controlled substance schedule code.
    pub csa: Option<String>,
    pub drug_link: Option<String>,
    pub medical_condition_url: Option<String>,
}

impl DrugRecord {
    /// Render a cell as display text for the table view.
    pub fn cell(&self, column: &str) -> Cell<'_> {
        match column {
            COL_DRUG_NAME => Cell::text(&self.drug_name),
            COL_GENERIC_NAME => Cell::text(&self.generic_name),
            COL_MEDICAL_CONDITION => Cell::text(&self.medical_condition),
            COL_SIDE_EFFECTS => Cell::text(&self.side_effects),
            COL_RATING => self.rating.map_or(Cell::Missing, Cell::Float),
            COL_NO_OF_REVIEWS => self.no_of_reviews.map_or(Cell::Missing, Cell::Count),
            COL_CSA => Cell::text(&self.csa),
            COL_DRUG_LINK => Cell::text(&self.drug_link),
            COL_MEDICAL_CONDITION_URL => Cell::text(&self.medical_condition_url),
            _ => Cell::Missing,
        }
    }

    /// Drug info URL, only when it is an actual web link.
    pub fn drug_web_link(&self) -> Option<&str> {
        web_link(&self.drug_link)
    }

    /// Condition info URL, only when it is an actual web link.
    pub fn condition_web_link(&self) -> Option<&str> {
        web_link(&self.medical_condition_url)
    }
}

fn web_link(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|url| url.starts_with("http"))
}

/// Borrowed view of a single table cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Float(f64),
    Count(u64),
    Missing,
}

impl<'a> Cell<'a> {
    fn text(value: &'a Option<String>) -> Self {
        value.as_deref().map_or(Cell::Missing, Cell::Text)
    }
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Float(v) => write!(f, "{v:.1}"),
            Cell::Count(c) => write!(f, "{c}"),
            Cell::Missing => write!(f, "N/A"),
        }
    }
}

// ---------------------------------------------------------------------------
// DrugDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct DrugDataset {
    /// All records, in source order.
    pub records: Vec<DrugRecord>,
}

impl DrugDataset {
    pub fn from_records(records: Vec<DrugRecord>) -> Self {
        DrugDataset { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrugRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a DrugDataset {
    type Item = &'a DrugRecord;
    type IntoIter = std::slice::Iter<'a, DrugRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cells_render_as_not_available() {
        let record = DrugRecord {
            drug_name: Some("Aspirin".into()),
            rating: Some(7.3),
            ..Default::default()
        };
        assert_eq!(record.cell(COL_DRUG_NAME).to_string(), "Aspirin");
        assert_eq!(record.cell(COL_RATING).to_string(), "7.3");
        assert_eq!(record.cell(COL_CSA).to_string(), "N/A");
        assert_eq!(record.cell("unknown").to_string(), "N/A");
    }

    #[test]
    fn only_http_links_are_exposed() {
        let record = DrugRecord {
            drug_link: Some("https://www.drugs.com/aspirin.html".into()),
            medical_condition_url: Some("not available".into()),
            ..Default::default()
        };
        assert_eq!(
            record.drug_web_link(),
            Some("https://www.drugs.com/aspirin.html")
        );
        assert_eq!(record.condition_web_link(), None);
    }
}
