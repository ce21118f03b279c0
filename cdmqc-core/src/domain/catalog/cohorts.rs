// cdmqc-core/src/domain/catalog/cohorts.rs
//
// Row catalogue for the potential-patient-pool table (Table IB). The pools
// are a strict progressive narrowing: each later pool intersects its
// predecessor, so cohort sizes are monotonically non-increasing down the
// chain. Percentages switch denominator by row category: total patients for
// the top pools, patients-with-a-face-to-face-encounter for the rest.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolDenominator {
    NoPercent,
    AllPatients,
    EncounterPool,
}

/// One published row: metric label, description and the result column of
/// the pool query that feeds it.
#[derive(Debug, Clone, Copy)]
pub struct CohortRow {
    pub metric: &'static str,
    pub description: &'static str,
    pub result_column: &'static str,
    pub denominator: PoolDenominator,
}

pub const COHORT_ROWS: &[CohortRow] = &[
    CohortRow {
        metric: "All patients",
        description: "Number of unique patients in the DEMOGRAPHIC table",
        result_column: "all_patients",
        denominator: PoolDenominator::NoPercent,
    },
    CohortRow {
        metric: "Potential pool of patients for observational studies",
        description: "Number of unique patients with at least 1 face-to-face (ED, EI, IP, OS, or AV) encounter within the past 5 years",
        result_column: "enc_pool_5",
        denominator: PoolDenominator::AllPatients,
    },
    CohortRow {
        metric: "Potential pool of patients for trials",
        description: "Number of unique patients with at least 1 face-to-face (ED, EI, IP, OS, or AV) encounter within the past 1 year",
        result_column: "enc_pool_1",
        denominator: PoolDenominator::AllPatients,
    },
    CohortRow {
        metric: "Potential pool of patients for studies requiring data on diagnoses, vital measures and (a) medications or (b) medications and lab results",
        description: "Number of unique patients with at least 1 DIAGNOSIS record in a face-to-face setting and at least 1 VITAL record within the past 5 years",
        result_column: "dx_vital_pool",
        denominator: PoolDenominator::EncounterPool,
    },
    CohortRow {
        metric: "",
        description: "Number of unique patients with at least 1 DIAGNOSIS record in a face-to-face setting, at least 1 VITAL record, and at least 1 PRESCRIBING or MED_ADMIN record within the past 5 years",
        result_column: "dx_vital_rx_pool",
        denominator: PoolDenominator::EncounterPool,
    },
    CohortRow {
        metric: "",
        description: "Number of unique patients with at least 1 DIAGNOSIS record in a face-to-face setting, at least 1 VITAL record, at least 1 PRESCRIBING or MED_ADMIN record, and at least 1 LAB_RESULT_CM record within the past 5 years",
        result_column: "dx_vital_rx_lab_pool",
        denominator: PoolDenominator::EncounterPool,
    },
    CohortRow {
        metric: "Patients with diagnosis data",
        description: "Percentage of patients with encounters who have at least 1 diagnosis",
        result_column: "enc_dx_pool",
        denominator: PoolDenominator::EncounterPool,
    },
    CohortRow {
        metric: "Patients with procedure data",
        description: "Percentage of patients with encounters who have at least 1 procedure",
        result_column: "enc_px_pool",
        denominator: PoolDenominator::EncounterPool,
    },
];
