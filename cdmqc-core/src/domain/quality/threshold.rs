// cdmqc-core/src/domain/quality/threshold.rs
//
// Tagged threshold type attached to each check rule, so the evaluator is one
// dispatch over rule kind instead of inline magic numbers. Observed
// thresholds: 0 for orphan/replication/provider counts, 4.99 for
// percentage-based checks (a just-below-5 strict bound that sidesteps float
// equality on "5%"), -5 for drift checks, and the "Yes" sentinel for the
// primary-key check.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    /// Exception iff value > x (strict).
    GreaterThan(f64),
    /// Exception iff value < x (strict). Used for drift: -5.0 itself passes.
    LessThan(f64),
    /// Exception iff the textual result equals the sentinel.
    EqualsSentinel(&'static str),
}

/// Hard exceptions must be corrected before publication; flagged ones must
/// be explained in the ETL documentation. Same comparison logic, different
/// downstream label (red vs blue).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Hard,
    Flagged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutcome {
    pub is_exception: bool,
    pub severity: Severity,
}

impl CheckOutcome {
    pub fn pass(severity: Severity) -> Self {
        Self {
            is_exception: false,
            severity,
        }
    }
}

impl Threshold {
    /// Classifies a numeric result. A missing value (undefined percent
    /// change on a zero baseline) is never an exception.
    pub fn classify_number(&self, value: Option<f64>, severity: Severity) -> CheckOutcome {
        let is_exception = match (self, value) {
            (Threshold::GreaterThan(x), Some(v)) => v > *x,
            (Threshold::LessThan(x), Some(v)) => v < *x,
            (Threshold::EqualsSentinel(_), _) | (_, None) => false,
        };
        CheckOutcome {
            is_exception,
            severity,
        }
    }

    /// Classifies a textual result against the sentinel.
    pub fn classify_text(&self, value: &str, severity: Severity) -> CheckOutcome {
        let is_exception = match self {
            Threshold::EqualsSentinel(s) => value == *s,
            _ => false,
        };
        CheckOutcome {
            is_exception,
            severity,
        }
    }
}
