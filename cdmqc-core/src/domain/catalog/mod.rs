// cdmqc-core/src/domain/catalog/mod.rs
//
// The CDM table catalogue: one declarative entry per table, carrying the
// primary-key definition, the patient/provider linkage columns and the
// temporal column used for cutoff windows and trend binning. Checks only
// ever run over tables the catalogue knows; everything else is skipped
// silently, never reported as an error.

pub mod checks;
pub mod cohorts;
pub mod demographics;

/// Static definition of one CDM table.
#[derive(Debug, Clone, Copy)]
pub struct TableDefinition {
    pub name: &'static str,
    /// Ordered columns whose combination must be unique. A single surrogate
    /// id for most tables, a concatenation for the rest.
    pub primary_key: &'static [&'static str],
    /// Published wording of the primary-key rule, rendered verbatim in the
    /// check 1.05 report.
    pub key_description: &'static str,
    /// Column linking to DEMOGRAPHIC, absent for tables with no patient
    /// linkage (PROVIDER, HARVEST, LAB_HISTORY).
    pub patient_id_column: Option<&'static str>,
    /// Date column used for cutoff filtering and trend binning.
    pub temporal_column: Option<&'static str>,
    /// Column linking to PROVIDER; the name varies per table.
    pub provider_id_column: Option<&'static str>,
}

impl TableDefinition {
    /// SQL expression for the primary key. Composite keys are concatenated
    /// with a separator so that ('AB','C') and ('A','BC') stay distinct.
    pub fn key_expression(&self) -> String {
        if self.primary_key.len() == 1 {
            self.primary_key[0].to_string()
        } else {
            self.primary_key
                .iter()
                .map(|col| format!("COALESCE(CAST({col} AS VARCHAR), '')"))
                .collect::<Vec<_>>()
                .join(" || '|' || ")
        }
    }
}

/// The full CDM catalogue, in the published primary-key table order.
pub const CDM_TABLES: &[TableDefinition] = &[
    TableDefinition {
        name: "DEMOGRAPHIC",
        primary_key: &["PATID"],
        key_description: "PATID is unique",
        patient_id_column: Some("PATID"),
        temporal_column: None,
        provider_id_column: None,
    },
    TableDefinition {
        name: "ENROLLMENT",
        primary_key: &["PATID", "ENR_START_DATE", "ENR_BASIS"],
        key_description: "ENROLLID (concatenation of PATID + ENR_START_DATE + ENR_BASIS) is unique",
        patient_id_column: Some("PATID"),
        temporal_column: Some("ENR_END_DATE"),
        provider_id_column: None,
    },
    TableDefinition {
        name: "DEATH",
        primary_key: &["PATID", "DEATH_SOURCE"],
        key_description: "DEATHID (concatenation of PATID and DEATH_SOURCE) is unique",
        patient_id_column: Some("PATID"),
        temporal_column: None,
        provider_id_column: None,
    },
    TableDefinition {
        name: "ENCOUNTER",
        primary_key: &["ENCOUNTERID"],
        key_description: "ENCOUNTERID is unique",
        patient_id_column: Some("PATID"),
        temporal_column: Some("ADMIT_DATE"),
        provider_id_column: Some("PROVIDERID"),
    },
    TableDefinition {
        name: "DIAGNOSIS",
        primary_key: &["DIAGNOSISID"],
        key_description: "DIAGNOSISID is unique",
        patient_id_column: Some("PATID"),
        temporal_column: Some("ADMIT_DATE"),
        provider_id_column: Some("PROVIDERID"),
    },
    TableDefinition {
        name: "PROCEDURES",
        primary_key: &["PROCEDURESID"],
        key_description: "PROCEDURESID is unique",
        patient_id_column: Some("PATID"),
        temporal_column: Some("ADMIT_DATE"),
        provider_id_column: Some("PROVIDERID"),
    },
    TableDefinition {
        name: "VITAL",
        primary_key: &["VITALID"],
        key_description: "VITALID is unique",
        patient_id_column: Some("PATID"),
        temporal_column: Some("MEASURE_DATE"),
        provider_id_column: None,
    },
    TableDefinition {
        name: "PRESCRIBING",
        primary_key: &["PRESCRIBINGID"],
        key_description: "PRESCRIBINGID is unique",
        patient_id_column: Some("PATID"),
        temporal_column: Some("RX_ORDER_DATE"),
        provider_id_column: Some("RX_PROVIDERID"),
    },
    TableDefinition {
        name: "DISPENSING",
        primary_key: &["DISPENSINGID"],
        key_description: "DISPENSINGID is unique",
        patient_id_column: Some("PATID"),
        temporal_column: Some("DISPENSE_DATE"),
        provider_id_column: None,
    },
    TableDefinition {
        name: "LAB_RESULT_CM",
        primary_key: &["LAB_RESULT_CM_ID"],
        key_description: "LAB_RESULT_CM_ID is unique",
        patient_id_column: Some("PATID"),
        temporal_column: Some("RESULT_DATE"),
        provider_id_column: None,
    },
    TableDefinition {
        name: "HARVEST",
        primary_key: &["NETWORKID", "DATAMARTID"],
        key_description: "NETWORKID + DATAMARTID is unique",
        patient_id_column: None,
        temporal_column: None,
        provider_id_column: None,
    },
    TableDefinition {
        name: "CONDITION",
        primary_key: &["CONDITIONID"],
        key_description: "CONDITIONID is unique",
        patient_id_column: Some("PATID"),
        temporal_column: Some("REPORT_DATE"),
        provider_id_column: None,
    },
    TableDefinition {
        name: "DEATH_CAUSE",
        primary_key: &[
            "PATID",
            "DEATH_CAUSE",
            "DEATH_CAUSE_CODE",
            "DEATH_CAUSE_TYPE",
            "DEATH_CAUSE_SOURCE",
        ],
        key_description: "DEATHCID (concatenation of PATID + DEATH_CAUSE + DEATH_CAUSE_CODE + DEATH_CAUSE_TYPE + DEATH_CAUSE_SOURCE) is unique",
        patient_id_column: Some("PATID"),
        temporal_column: None,
        provider_id_column: None,
    },
    TableDefinition {
        name: "PCORNET_TRIAL",
        primary_key: &["PATID", "TRIALID", "PARTICIPANTID"],
        key_description: "TRIAL_KEY (concatenation of PATID + TRIALID + PARTICIPANTID) is unique",
        patient_id_column: Some("PATID"),
        temporal_column: None,
        provider_id_column: None,
    },
    TableDefinition {
        name: "PRO_CM",
        primary_key: &["PRO_CM_ID"],
        key_description: "PRO_CM_ID is unique",
        patient_id_column: Some("PATID"),
        temporal_column: Some("PRO_DATE"),
        provider_id_column: None,
    },
    TableDefinition {
        name: "PROVIDER",
        primary_key: &["PROVIDERID"],
        key_description: "PROVIDERID is unique",
        patient_id_column: None,
        temporal_column: None,
        provider_id_column: None,
    },
    TableDefinition {
        name: "MED_ADMIN",
        primary_key: &["MEDADMINID"],
        key_description: "MEDADMINID is unique",
        patient_id_column: Some("PATID"),
        temporal_column: Some("MEDADMIN_START_DATE"),
        provider_id_column: Some("MEDADMIN_PROVIDERID"),
    },
    TableDefinition {
        name: "OBS_CLIN",
        primary_key: &["OBSCLINID"],
        key_description: "OBSCLINID is unique",
        patient_id_column: Some("PATID"),
        temporal_column: Some("OBSCLIN_START_DATE"),
        provider_id_column: Some("OBSCLIN_PROVIDERID"),
    },
    TableDefinition {
        name: "OBS_GEN",
        primary_key: &["OBSGENID"],
        key_description: "OBSGENID is unique",
        patient_id_column: Some("PATID"),
        temporal_column: Some("OBSGEN_START_DATE"),
        provider_id_column: Some("OBSGEN_PROVIDERID"),
    },
    TableDefinition {
        name: "HASH_TOKEN",
        primary_key: &["PATID", "TOKEN_ENCRYPTION_KEY"],
        key_description: "HASHID (concatenation of PATID + TOKEN_ENCRYPTION_KEY) is unique",
        patient_id_column: Some("PATID"),
        temporal_column: None,
        provider_id_column: None,
    },
    TableDefinition {
        name: "LDS_ADDRESS_HISTORY",
        primary_key: &["ADDRESSID"],
        key_description: "ADDRESSID is unique",
        patient_id_column: Some("PATID"),
        temporal_column: None,
        provider_id_column: None,
    },
    TableDefinition {
        name: "IMMUNIZATION",
        primary_key: &["IMMUNIZATIONID"],
        key_description: "IMMUNIZATIONID is unique",
        patient_id_column: Some("PATID"),
        temporal_column: Some("VX_ADMIN_DATE"),
        provider_id_column: Some("VX_PROVIDERID"),
    },
    TableDefinition {
        name: "LAB_HISTORY",
        primary_key: &["LABHISTORYID"],
        key_description: "LABHISTORYID is unique",
        patient_id_column: None,
        temporal_column: None,
        provider_id_column: None,
    },
];

/// Catalogue lookup. `None` means "not a CDM table" — callers skip, they do
/// not error.
pub fn lookup(table_name: &str) -> Option<&'static TableDefinition> {
    CDM_TABLES
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(table_name))
}
