// cdmqc-core/src/domain/quality/rules.rs
//
// One rule per published data check. The numbering follows the CDM quality
// documentation the report operators work from.

use super::threshold::{CheckOutcome, Severity, Threshold};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckId {
    /// 1.05 — primary key definition errors.
    PrimaryKey,
    /// 1.08 — tables contain orphan PATIDs.
    OrphanPatid,
    /// 1.09 — orphan ENCOUNTERIDs for more than 5% of records.
    OrphanEncounter,
    /// 1.10 — replication errors between ENCOUNTER and DIAGNOSIS/PROCEDURES.
    Replication,
    /// 1.11 — more than 5% of encounters assigned to more than one patient.
    MultiPatient,
    /// 1.12 — tables contain orphan PROVIDERIDs.
    OrphanProvider,
    /// 4.01 — >5% decrease in patients or records of a CDM table.
    TableDrift,
    /// 4.02 — >5% decrease within an encounter-type slice.
    EncounterDrift,
    /// 4.03 — >5% decrease in records or distinct codes per code type.
    CodeDrift,
}

impl CheckId {
    pub fn code(&self) -> &'static str {
        match self {
            CheckId::PrimaryKey => "1.05",
            CheckId::OrphanPatid => "1.08",
            CheckId::OrphanEncounter => "1.09",
            CheckId::Replication => "1.10",
            CheckId::MultiPatient => "1.11",
            CheckId::OrphanProvider => "1.12",
            CheckId::TableDrift => "4.01",
            CheckId::EncounterDrift => "4.02",
            CheckId::CodeDrift => "4.03",
        }
    }
}

/// Whether a check reads one schema or diffs two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonKind {
    SingleSchema,
    TwoSchema,
}

#[derive(Debug, Clone, Copy)]
pub struct CheckRule {
    pub id: CheckId,
    pub comparison: ComparisonKind,
    pub threshold: Threshold,
    pub severity: Severity,
    /// Decimal places of the rule's percentage column. The source report
    /// uses 1 for PATID/PROVIDERID shares and 2 for ENCOUNTERID shares;
    /// the distinction is preserved.
    pub pct_decimals: u32,
}

impl CheckRule {
    pub fn classify_number(&self, value: Option<f64>) -> CheckOutcome {
        self.threshold.classify_number(value, self.severity)
    }

    pub fn classify_count(&self, count: i64) -> CheckOutcome {
        self.classify_number(Some(count as f64))
    }

    pub fn classify_text(&self, value: &str) -> CheckOutcome {
        self.threshold.classify_text(value, self.severity)
    }
}

const RULES: &[CheckRule] = &[
    CheckRule {
        id: CheckId::PrimaryKey,
        comparison: ComparisonKind::SingleSchema,
        threshold: Threshold::EqualsSentinel("Yes"),
        severity: Severity::Hard,
        pct_decimals: 0,
    },
    CheckRule {
        id: CheckId::OrphanPatid,
        comparison: ComparisonKind::SingleSchema,
        threshold: Threshold::GreaterThan(0.0),
        severity: Severity::Hard,
        pct_decimals: 1,
    },
    CheckRule {
        id: CheckId::OrphanEncounter,
        comparison: ComparisonKind::SingleSchema,
        threshold: Threshold::GreaterThan(4.99),
        severity: Severity::Hard,
        pct_decimals: 2,
    },
    CheckRule {
        id: CheckId::Replication,
        comparison: ComparisonKind::SingleSchema,
        threshold: Threshold::GreaterThan(0.0),
        severity: Severity::Hard,
        pct_decimals: 0,
    },
    CheckRule {
        id: CheckId::MultiPatient,
        comparison: ComparisonKind::SingleSchema,
        threshold: Threshold::GreaterThan(4.99),
        severity: Severity::Hard,
        pct_decimals: 2,
    },
    CheckRule {
        id: CheckId::OrphanProvider,
        comparison: ComparisonKind::SingleSchema,
        threshold: Threshold::GreaterThan(0.0),
        severity: Severity::Hard,
        pct_decimals: 1,
    },
    CheckRule {
        id: CheckId::TableDrift,
        comparison: ComparisonKind::TwoSchema,
        threshold: Threshold::LessThan(-5.0),
        severity: Severity::Flagged,
        pct_decimals: 1,
    },
    CheckRule {
        id: CheckId::EncounterDrift,
        comparison: ComparisonKind::TwoSchema,
        threshold: Threshold::LessThan(-5.0),
        severity: Severity::Flagged,
        pct_decimals: 1,
    },
    CheckRule {
        id: CheckId::CodeDrift,
        comparison: ComparisonKind::TwoSchema,
        threshold: Threshold::LessThan(-5.0),
        severity: Severity::Flagged,
        pct_decimals: 1,
    },
];

#[allow(clippy::unwrap_used)]
pub fn rule(id: CheckId) -> &'static CheckRule {
    // The rule table covers every CheckId variant; the lookup cannot miss.
    RULES.iter().find(|r| r.id == id).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_check_has_a_rule() {
        for id in [
            CheckId::PrimaryKey,
            CheckId::OrphanPatid,
            CheckId::OrphanEncounter,
            CheckId::Replication,
            CheckId::MultiPatient,
            CheckId::OrphanProvider,
            CheckId::TableDrift,
            CheckId::EncounterDrift,
            CheckId::CodeDrift,
        ] {
            assert_eq!(rule(id).id, id);
        }
    }

    #[test]
    fn test_drift_rules_are_flagged_not_hard() {
        assert_eq!(rule(CheckId::TableDrift).severity, Severity::Flagged);
        assert_eq!(rule(CheckId::CodeDrift).severity, Severity::Flagged);
        assert_eq!(rule(CheckId::OrphanPatid).severity, Severity::Hard);
    }

    #[test]
    fn test_orphan_decimal_places_differ_by_rule() {
        assert_eq!(rule(CheckId::OrphanPatid).pct_decimals, 1);
        assert_eq!(rule(CheckId::OrphanEncounter).pct_decimals, 2);
        assert_eq!(rule(CheckId::MultiPatient).pct_decimals, 2);
        assert_eq!(rule(CheckId::OrphanProvider).pct_decimals, 1);
    }

    #[test]
    fn test_check_codes() {
        assert_eq!(CheckId::PrimaryKey.code(), "1.05");
        assert_eq!(CheckId::TableDrift.code(), "4.01");
    }
}
