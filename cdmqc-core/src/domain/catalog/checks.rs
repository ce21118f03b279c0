// cdmqc-core/src/domain/catalog/checks.rs
//
// Per-check applicability lists. Tables absent from a list are simply
// excluded from that check's output. The lists are data, not code: adding a
// table to a check is a one-line change here.

/// Check 1.08 — tables whose PATID must exist in DEMOGRAPHIC.
pub const ORPHAN_PATID_TABLES: &[&str] = &[
    "CONDITION",
    "DIAGNOSIS",
    "DEATH",
    "DEATH_CAUSE",
    "DISPENSING",
    "ENCOUNTER",
    "ENROLLMENT",
    "HASH_TOKEN",
    "IMMUNIZATION",
    "LAB_RESULT_CM",
    "LDS_ADDRESS_HISTORY",
    "MED_ADMIN",
    "OBS_CLIN",
    "OBS_GEN",
    "PCORNET_TRIAL",
    "PRESCRIBING",
    "PROCEDURES",
    "PRO_CM",
    "VITAL",
];

/// Check 1.09 — tables whose ENCOUNTERID must exist in ENCOUNTER.
pub const ORPHAN_ENCOUNTER_TABLES: &[&str] = &[
    "CONDITION",
    "DIAGNOSIS",
    "IMMUNIZATION",
    "LAB_RESULT_CM",
    "MED_ADMIN",
    "OBS_CLIN",
    "OBS_GEN",
    "PRESCRIBING",
    "PROCEDURES",
    "PRO_CM",
    "VITAL",
];

/// Check 1.10 — tables carrying denormalized copies of ENC_TYPE/ADMIT_DATE.
pub const REPLICATION_TABLES: &[&str] = &["DIAGNOSIS", "PROCEDURES"];

/// Check 1.11 — tables where one ENCOUNTERID must map to one PATID.
pub const MULTI_PATIENT_TABLES: &[&str] = &[
    "CONDITION",
    "DIAGNOSIS",
    "ENCOUNTER",
    "IMMUNIZATION",
    "LAB_RESULT_CM",
    "MED_ADMIN",
    "OBS_CLIN",
    "OBS_GEN",
    "PRESCRIBING",
    "PROCEDURES",
    "PRO_CM",
    "VITAL",
];

/// Check 1.12 — tables with a provider reference. The column name varies per
/// table; it comes from `TableDefinition::provider_id_column`.
pub const ORPHAN_PROVIDER_TABLES: &[&str] = &[
    "DIAGNOSIS",
    "ENCOUNTER",
    "IMMUNIZATION",
    "MED_ADMIN",
    "OBS_CLIN",
    "OBS_GEN",
    "PRESCRIBING",
    "PROCEDURES",
];

/// Check 4.01 — tables compared between refreshes, in report order.
/// PROVIDER has no patient linkage; its patient counts report as 0.
pub const PERSISTENCE_TABLES: &[&str] = &[
    "DEMOGRAPHIC",
    "ENROLLMENT",
    "ENCOUNTER",
    "DIAGNOSIS",
    "PROCEDURES",
    "VITAL",
    "DEATH",
    "PRESCRIBING",
    "DISPENSING",
    "LAB_RESULT_CM",
    "CONDITION",
    "DEATH_CAUSE",
    "PRO_CM",
    "PROVIDER",
    "MED_ADMIN",
    "OBS_CLIN",
    "OBS_GEN",
    "HASH_TOKEN",
    "IMMUNIZATION",
    "LDS_ADDRESS_HISTORY",
];

/// Check 4.02 — encounter types compared per domain table: (code, label).
pub const ENCOUNTER_TYPES: &[(&str, &str)] = &[
    ("AV", "Ambulatory_Visit"),
    ("ED", "Emergency_Department"),
    ("IP", "Inpatient"),
    ("OA", "Other_Ambulatory"),
    ("TH", "Telehealth_Encounters"),
];

/// Check 4.02 — the domain tables broken down by encounter type. DIAGNOSIS
/// and PROCEDURES carry ENC_TYPE themselves; the others reach it through a
/// join to ENCOUNTER.
pub const ENCOUNTER_DOMAIN_TABLES: &[&str] =
    &["DIAGNOSIS", "PROCEDURES", "LAB_RESULT_CM", "PRESCRIBING"];

pub fn has_own_enc_type(table: &str) -> bool {
    matches!(table, "DIAGNOSIS" | "PROCEDURES")
}

/// Encounter types counted as face-to-face in the patient-pool cohorts.
pub const FACE_TO_FACE_TYPES: &[&str] = &["EI", "ED", "AV", "IP", "OS"];

/// One code-distribution slice for check 4.03: a (table, code column,
/// optional type filter) triple whose record and distinct-code counts are
/// compared between refreshes. ICD9 ('09') slices shrink naturally under the
/// 10-year lookback; the published check keeps them in the table but the
/// drift threshold still applies uniformly, matching the source report.
#[derive(Debug, Clone, Copy)]
pub struct CodeSlice {
    pub table: &'static str,
    pub code_column: &'static str,
    pub type_column: Option<&'static str>,
    pub type_value: &'static str,
}

pub const CODE_SLICES: &[CodeSlice] = &[
    CodeSlice { table: "DIAGNOSIS", code_column: "DX", type_column: Some("DX_TYPE"), type_value: "09" },
    CodeSlice { table: "DIAGNOSIS", code_column: "DX", type_column: Some("DX_TYPE"), type_value: "10" },
    CodeSlice { table: "PROCEDURES", code_column: "PX", type_column: Some("PX_TYPE"), type_value: "09" },
    CodeSlice { table: "PROCEDURES", code_column: "PX", type_column: Some("PX_TYPE"), type_value: "10" },
    CodeSlice { table: "PROCEDURES", code_column: "PX", type_column: Some("PX_TYPE"), type_value: "CH" },
    CodeSlice { table: "PROCEDURES", code_column: "PX", type_column: Some("PX_TYPE"), type_value: "ND" },
    CodeSlice { table: "DISPENSING", code_column: "NDC", type_column: None, type_value: "ND" },
    CodeSlice { table: "IMMUNIZATION", code_column: "VX_CODE", type_column: Some("VX_CODE_TYPE"), type_value: "CH" },
    CodeSlice { table: "IMMUNIZATION", code_column: "VX_CODE", type_column: Some("VX_CODE_TYPE"), type_value: "CX" },
    CodeSlice { table: "IMMUNIZATION", code_column: "VX_CODE", type_column: Some("VX_CODE_TYPE"), type_value: "ND" },
    CodeSlice { table: "IMMUNIZATION", code_column: "VX_CODE", type_column: Some("VX_CODE_TYPE"), type_value: "RX" },
    CodeSlice { table: "MED_ADMIN", code_column: "MEDADMIN_CODE", type_column: Some("MEDADMIN_TYPE"), type_value: "ND" },
    CodeSlice { table: "MED_ADMIN", code_column: "MEDADMIN_CODE", type_column: Some("MEDADMIN_TYPE"), type_value: "RX" },
    CodeSlice { table: "PRESCRIBING", code_column: "RXNORM_CUI", type_column: None, type_value: "RX" },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::lookup;

    #[test]
    fn test_applicability_lists_reference_catalogued_tables() {
        let all = ORPHAN_PATID_TABLES
            .iter()
            .chain(ORPHAN_ENCOUNTER_TABLES)
            .chain(REPLICATION_TABLES)
            .chain(MULTI_PATIENT_TABLES)
            .chain(ORPHAN_PROVIDER_TABLES)
            .chain(PERSISTENCE_TABLES);
        for name in all {
            assert!(lookup(name).is_some(), "{name} missing from catalogue");
        }
    }

    #[test]
    fn test_orphan_patid_tables_all_carry_patid() {
        for name in ORPHAN_PATID_TABLES {
            let def = lookup(name).unwrap();
            assert_eq!(def.patient_id_column, Some("PATID"), "{name}");
        }
    }

    #[test]
    fn test_provider_tables_all_declare_a_provider_column() {
        for name in ORPHAN_PROVIDER_TABLES {
            let def = lookup(name).unwrap();
            assert!(def.provider_id_column.is_some(), "{name}");
        }
    }

    #[test]
    fn test_multi_patient_tables_all_have_temporal_column() {
        // 1.11 filters on the temporal column; every listed table needs one.
        for name in MULTI_PATIENT_TABLES {
            let def = lookup(name).unwrap();
            assert!(def.temporal_column.is_some(), "{name}");
        }
    }

    #[test]
    fn test_code_slices_reference_catalogued_tables() {
        for slice in CODE_SLICES {
            assert!(lookup(slice.table).is_some(), "{}", slice.table);
        }
        assert_eq!(CODE_SLICES.len(), 14);
    }
}
