// cdmqc-core/src/domain/quality/mod.rs

pub mod compare;
pub mod metrics;
pub mod rules;
pub mod threshold;

pub use compare::{SnapshotComparison, percent_change};
pub use rules::{CheckId, CheckRule, rule};
pub use threshold::{CheckOutcome, Severity, Threshold};
