// cdmqc-core/src/domain/catalog/demographics.rs
//
// Row catalogue for the demographic summary (Table IA). Each published row
// is one entry: header rows, the raw patient count, age mean/median and the
// category counts with their SQL predicate over DEMOGRAPHIC. Percentages
// use two different denominators by row category — total patients for most
// rows, patients-with-an-encounter for the "race among patients with at
// least 1 encounter" block. That switch is a business rule, not a mistake.
//
// Row order keys are assigned by position and strictly increasing. The
// source report reused a few order keys in the sexual-orientation block (a
// numbering defect); the category sequence is preserved, the keys are not.

/// Patients counted as "with an encounter": at least one ENCOUNTER row after
/// this date.
pub const RACE_ENCOUNTER_SINCE: &str = "2011-12-01";

/// Age in whole years, computed warehouse-side.
pub const AGE_EXPR: &str = "date_diff('year', BIRTH_DATE, current_date)";

#[derive(Debug, Clone, Copy)]
pub enum RowKind {
    /// Category separator, no count.
    Header,
    /// COUNT(*) over DEMOGRAPHIC.
    PatientCount,
    MeanAge,
    MedianAge,
    /// COUNT(*) over DEMOGRAPHIC filtered by this predicate. The fragment
    /// may reference `{{ schema }}` (encounter-membership subqueries).
    Count(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDenominator {
    /// No percentage rendered (headers, Patients, Mean, Median).
    NoPercent,
    /// Percentage of all patients in DEMOGRAPHIC.
    AllPatients,
    /// Percentage of patients with an encounter after RACE_ENCOUNTER_SINCE.
    EncounterPatients,
}

#[derive(Debug, Clone, Copy)]
pub struct DemographicRow {
    pub category: &'static str,
    pub group_name: &'static str,
    pub kind: RowKind,
    pub denominator: RowDenominator,
}

pub const DEMOGRAPHIC_ROWS: &[DemographicRow] = &[
    DemographicRow { category: "Patients", group_name: "", kind: RowKind::PatientCount, denominator: RowDenominator::NoPercent },
    DemographicRow { category: "Age", group_name: "", kind: RowKind::Header, denominator: RowDenominator::NoPercent },
    DemographicRow { category: "", group_name: "Mean", kind: RowKind::MeanAge, denominator: RowDenominator::NoPercent },
    DemographicRow { category: "", group_name: "Median", kind: RowKind::MedianAge, denominator: RowDenominator::NoPercent },
    DemographicRow { category: "Age group", group_name: "", kind: RowKind::Header, denominator: RowDenominator::NoPercent },
    DemographicRow { category: "", group_name: "0-4", kind: RowKind::Count("date_diff('year', BIRTH_DATE, current_date) <= 4"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "5-14", kind: RowKind::Count("date_diff('year', BIRTH_DATE, current_date) > 4 AND date_diff('year', BIRTH_DATE, current_date) <= 14"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "15-21", kind: RowKind::Count("date_diff('year', BIRTH_DATE, current_date) > 14 AND date_diff('year', BIRTH_DATE, current_date) <= 21"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "22-64", kind: RowKind::Count("date_diff('year', BIRTH_DATE, current_date) > 21 AND date_diff('year', BIRTH_DATE, current_date) <= 64"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "65+", kind: RowKind::Count("date_diff('year', BIRTH_DATE, current_date) > 64"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "Missing", kind: RowKind::Count("BIRTH_DATE IS NULL"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "Hispanic", group_name: "", kind: RowKind::Header, denominator: RowDenominator::NoPercent },
    DemographicRow { category: "", group_name: "N (No)", kind: RowKind::Count("HISPANIC = 'N'"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "Y (Yes)", kind: RowKind::Count("HISPANIC = 'Y'"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "Missing or Refused", kind: RowKind::Count("HISPANIC = 'R' OR HISPANIC IS NULL"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "Sex", group_name: "", kind: RowKind::Header, denominator: RowDenominator::NoPercent },
    DemographicRow { category: "", group_name: "F (Female)", kind: RowKind::Count("SEX = 'F'"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "M (Male)", kind: RowKind::Count("SEX = 'M'"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "Missing or Ambiguous", kind: RowKind::Count("SEX IS NULL"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "Race", group_name: "", kind: RowKind::Header, denominator: RowDenominator::NoPercent },
    DemographicRow { category: "", group_name: "White", kind: RowKind::Count("RACE = '05'"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "Non-White", kind: RowKind::Count("RACE IN ('01','02','03','04','06')"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "Missing or Refused", kind: RowKind::Count("RACE IN ('07','NI','UN','OT') OR RACE IS NULL"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "Race among patients with at least 1 encounter after December 2011", group_name: "", kind: RowKind::Header, denominator: RowDenominator::NoPercent },
    DemographicRow { category: "", group_name: "White", kind: RowKind::Count("RACE = '05' AND PATID IN (SELECT DISTINCT PATID FROM {{ schema }}.ENCOUNTER WHERE ADMIT_DATE > DATE '2011-12-01')"), denominator: RowDenominator::EncounterPatients },
    DemographicRow { category: "", group_name: "Non-White", kind: RowKind::Count("RACE IN ('01','02','03','04','06') AND PATID IN (SELECT DISTINCT PATID FROM {{ schema }}.ENCOUNTER WHERE ADMIT_DATE > DATE '2011-12-01')"), denominator: RowDenominator::EncounterPatients },
    DemographicRow { category: "", group_name: "Missing or Refused", kind: RowKind::Count("(RACE IN ('07','NI','UN','OT') OR RACE IS NULL) AND PATID IN (SELECT DISTINCT PATID FROM {{ schema }}.ENCOUNTER WHERE ADMIT_DATE > DATE '2011-12-01')"), denominator: RowDenominator::EncounterPatients },
    DemographicRow { category: "Gender Identity", group_name: "", kind: RowKind::Header, denominator: RowDenominator::NoPercent },
    DemographicRow { category: "", group_name: "GQ (Genderqueer/Non-Binary)", kind: RowKind::Count("GENDER_IDENTITY = 'GQ'"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "M (Man)", kind: RowKind::Count("GENDER_IDENTITY = 'M'"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "W (Woman)", kind: RowKind::Count("GENDER_IDENTITY = 'W'"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "MU (Multiple gender categories), SE (Something else), TF (Transgender female/Trans woman/Male-to-female), or TM (Transgender male/Trans man/Female-to-male)", kind: RowKind::Count("GENDER_IDENTITY IN ('MU','SE','TF','TM')"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "Missing or Refused", kind: RowKind::Count("GENDER_IDENTITY IN ('DC','NI','UN','OT') OR GENDER_IDENTITY IS NULL"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "Sexual Orientation", group_name: "", kind: RowKind::Header, denominator: RowDenominator::NoPercent },
    DemographicRow { category: "", group_name: "Bisexual", kind: RowKind::Count("SEXUAL_ORIENTATION = 'BI'"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "Gay", kind: RowKind::Count("SEXUAL_ORIENTATION = 'GA'"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "Lesbian", kind: RowKind::Count("SEXUAL_ORIENTATION = 'LE'"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "Queer", kind: RowKind::Count("SEXUAL_ORIENTATION = 'QU'"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "Straight", kind: RowKind::Count("SEXUAL_ORIENTATION = 'ST'"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "AS (Asexual), MU (Multiple sexual orientations), SE (Something else), QS (Questioning)", kind: RowKind::Count("SEXUAL_ORIENTATION IN ('AS','MU','SE','QS')"), denominator: RowDenominator::AllPatients },
    DemographicRow { category: "", group_name: "Missing or Refused", kind: RowKind::Count("SEXUAL_ORIENTATION IN ('DC','NI','UN','OT') OR SEXUAL_ORIENTATION IS NULL"), denominator: RowDenominator::AllPatients },
];
