// cdmqc-core/src/domain/report.rs
//
// The contract between the check sections and the renderer: rows of cells
// that already carry their highlight classification. The renderer only maps
// highlights to colours; it never recomputes exception logic.

use super::quality::threshold::{CheckOutcome, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    None,
    /// Hard exception: must be corrected before publication.
    Red,
    /// Flagged exception: must be explained in the ETL documentation.
    Blue,
}

impl From<CheckOutcome> for Highlight {
    fn from(outcome: CheckOutcome) -> Self {
        if !outcome.is_exception {
            Highlight::None
        } else {
            match outcome.severity {
                Severity::Hard => Highlight::Red,
                Severity::Flagged => Highlight::Blue,
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub text: String,
    pub highlight: Highlight,
    pub bold: bool,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlight: Highlight::None,
            bold: false,
        }
    }

    /// Row-category label cell (bold hint for the renderer).
    pub fn label(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlight: Highlight::None,
            bold: true,
        }
    }

    pub fn classified(text: impl Into<String>, outcome: CheckOutcome) -> Self {
        Self {
            text: text.into(),
            highlight: outcome.into(),
            bold: false,
        }
    }
}

/// One presentation-ready section table. An empty `rows` is a valid result
/// (nothing matched the check), not an error.
#[derive(Debug, Clone)]
pub struct ReportTable {
    pub title: String,
    pub description: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ReportTable {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        columns: &[&str],
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }
}
