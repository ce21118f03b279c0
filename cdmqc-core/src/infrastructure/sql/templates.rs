// cdmqc-core/src/infrastructure/sql/templates.rs
//
// One template per query shape. Context keys are table/column identifiers
// taken from the static catalogue; every operator-supplied value (cutoff
// dates, window starts) is a `?` placeholder bound at execution time.
// Strict-undefined rendering means each template's full key set must be
// present in the context, with `null` for the optional ones.

/// Distinct key values vs total rows. Detects duplicated primary keys.
pub const PRIMARY_KEY: &str = "\
SELECT
  (SELECT COUNT(DISTINCT {{ key_expr }}) FROM {{ schema }}.{{ table }}) AS distinct_keys,
  (SELECT COUNT(*) FROM {{ schema }}.{{ table }}) AS total_rows";

/// Values of `column` with no match in the reference table, plus the distinct
/// total for the percentage denominator. Shared by the orphan PATID,
/// ENCOUNTERID and PROVIDERID checks.
pub const ORPHANS: &str = "\
SELECT
  (SELECT COUNT(DISTINCT {{ column }}) FROM {{ schema }}.{{ table }}
   WHERE {{ column }} IS NOT NULL
     AND {{ column }} NOT IN (
       SELECT {{ ref_column }} FROM {{ schema }}.{{ ref_table }}
       WHERE {{ ref_column }} IS NOT NULL)) AS orphans,
  (SELECT COUNT(DISTINCT {{ column }}) FROM {{ schema }}.{{ table }}) AS total";

/// Rows whose replicated ENC_TYPE / ADMIT_DATE disagree with ENCOUNTER,
/// with the disagreeing field names aggregated for the report.
pub const REPLICATION: &str = "\
SELECT
  COUNT(*) AS mismatches,
  string_agg(DISTINCT CASE
    WHEN d.ENC_TYPE != e.ENC_TYPE AND d.ADMIT_DATE != e.ADMIT_DATE THEN 'ENC_TYPE & ADMIT_DATE'
    WHEN d.ENC_TYPE != e.ENC_TYPE THEN 'ENC_TYPE'
    WHEN d.ADMIT_DATE != e.ADMIT_DATE THEN 'ADMIT_DATE'
  END, ', ') AS mismatch_fields
FROM {{ schema }}.{{ table }} d
JOIN {{ schema }}.ENCOUNTER e ON d.ENCOUNTERID = e.ENCOUNTERID
WHERE d.ENC_TYPE != e.ENC_TYPE OR d.ADMIT_DATE != e.ADMIT_DATE";

/// Encounters attached to more than one patient within the cutoff window.
/// Param: cutoff date.
pub const MULTI_PATIENT: &str = "\
SELECT
  (SELECT COUNT(*) FROM (
     SELECT ENCOUNTERID FROM {{ schema }}.{{ table }}
     WHERE ENCOUNTERID IS NOT NULL AND {{ temporal }} >= CAST(? AS DATE)
     GROUP BY ENCOUNTERID
     HAVING COUNT(DISTINCT PATID) > 1) shared) AS shared_encounters,
  (SELECT COUNT(DISTINCT ENCOUNTERID) FROM {{ schema }}.{{ table }}) AS total_encounters";

/// Record and patient volume for one table in one schema. The window clause
/// only applies when the table has a temporal column (param: window start);
/// tables without a patient column report zero patients.
pub const VOLUME: &str = "\
SELECT
  COUNT(*) AS records,
  {% if patient_column %}COUNT(DISTINCT {{ patient_column }}){% else %}0{% endif %} AS patients
FROM {{ schema }}.{{ table }}\
{% if temporal %}
WHERE {{ temporal }} >= CAST(? AS DATE){% endif %}";

/// Volume for one encounter type where the table carries ENC_TYPE itself.
/// Params: window start, encounter type.
pub const ENCOUNTER_VOLUME_DIRECT: &str = "\
SELECT COUNT(*) AS records, COUNT(DISTINCT PATID) AS patients
FROM {{ schema }}.{{ table }}
WHERE {{ temporal }} >= CAST(? AS DATE) AND ENC_TYPE = ?";

/// Volume for one encounter type via a join to ENCOUNTER, for tables that do
/// not replicate ENC_TYPE. Params: window start, encounter type, window start.
pub const ENCOUNTER_VOLUME_JOINED: &str = "\
SELECT COUNT(*) AS records, COUNT(DISTINCT t.PATID) AS patients
FROM {{ schema }}.{{ table }} t
JOIN {{ schema }}.ENCOUNTER e
  ON t.ENCOUNTERID = e.ENCOUNTERID AND t.PATID = e.PATID
WHERE t.{{ temporal }} >= CAST(? AS DATE)
  AND e.ENC_TYPE = ?
  AND e.ADMIT_DATE >= CAST(? AS DATE)";

/// Record volume and distinct code count for one code slice. The type filter
/// is inlined from the static slice catalogue. Param: window start.
pub const CODE_VOLUME: &str = "\
SELECT COUNT(*) AS records, COUNT(DISTINCT {{ code_column }}) AS codes
FROM {{ schema }}.{{ table }}
WHERE {{ temporal }} >= CAST(? AS DATE)
  AND {{ code_column }} IS NOT NULL\
{% if type_filter %}
  AND {{ type_filter }}{% endif %}";

/// Time-bucketed record/patient counts. The strftime format comes from the
/// granularity, not from user input. Params: range start, range end.
pub const TREND: &str = "\
SELECT
  strftime({{ temporal }}, '{{ bucket_format }}') AS bucket,
  COUNT(*) AS records\
{% if patient_column %},
  COUNT(DISTINCT {{ patient_column }}) AS patients{% endif %}
FROM {{ schema }}.{{ table }}
WHERE {{ temporal }} >= CAST(? AS DATE) AND {{ temporal }} <= CAST(? AS DATE)
GROUP BY 1
ORDER BY 1";

/// Denominator for the demographic percentage columns.
pub const PATIENT_TOTAL: &str = "SELECT COUNT(*) AS n FROM {{ schema }}.DEMOGRAPHIC";

/// Denominator for the race-among-encounter demographic block. Param: the
/// encounter membership date.
pub const ENCOUNTER_PATIENT_TOTAL: &str = "\
SELECT COUNT(DISTINCT PATID) AS n FROM {{ schema }}.ENCOUNTER
WHERE ADMIT_DATE > CAST(? AS DATE)";

/// The progressive patient pools, evaluated in a single statement so all
/// cohorts see the same snapshot. Eight `?` placeholders: the five-year
/// window start everywhere except the second, which is the one-year start.
pub const COHORT_POOLS: &str = "\
WITH enc_pool_5 AS (
  SELECT DISTINCT PATID FROM {{ schema }}.ENCOUNTER
  WHERE ADMIT_DATE >= CAST(? AS DATE) AND ENC_TYPE IN ({{ ftf_list }})
),
enc_pool_1 AS (
  SELECT DISTINCT PATID FROM {{ schema }}.ENCOUNTER
  WHERE ADMIT_DATE >= CAST(? AS DATE) AND ENC_TYPE IN ({{ ftf_list }})
),
dx_pool AS (
  SELECT DISTINCT PATID FROM {{ schema }}.DIAGNOSIS
  WHERE ADMIT_DATE >= CAST(? AS DATE) AND ENC_TYPE IN ({{ ftf_list }})
),
px_pool AS (
  SELECT DISTINCT PATID FROM {{ schema }}.PROCEDURES
  WHERE ADMIT_DATE >= CAST(? AS DATE)
),
dx_vital_pool AS (
  SELECT PATID FROM dx_pool
  INTERSECT
  SELECT DISTINCT PATID FROM {{ schema }}.VITAL WHERE MEASURE_DATE >= CAST(? AS DATE)
),
rx_pool AS (
  SELECT DISTINCT PATID FROM {{ schema }}.PRESCRIBING WHERE RX_ORDER_DATE >= CAST(? AS DATE)
  UNION
  SELECT DISTINCT PATID FROM {{ schema }}.MED_ADMIN WHERE MEDADMIN_START_DATE >= CAST(? AS DATE)
),
dx_vital_rx_pool AS (
  SELECT PATID FROM dx_vital_pool INTERSECT SELECT PATID FROM rx_pool
),
dx_vital_rx_lab_pool AS (
  SELECT PATID FROM dx_vital_rx_pool
  INTERSECT
  SELECT DISTINCT PATID FROM {{ schema }}.LAB_RESULT_CM WHERE RESULT_DATE >= CAST(? AS DATE)
),
enc_dx_pool AS (
  SELECT PATID FROM enc_pool_5 INTERSECT SELECT PATID FROM dx_pool
),
enc_px_pool AS (
  SELECT PATID FROM enc_pool_5 INTERSECT SELECT PATID FROM px_pool
)
SELECT
  (SELECT COUNT(DISTINCT PATID) FROM {{ schema }}.DEMOGRAPHIC) AS all_patients,
  (SELECT COUNT(*) FROM enc_pool_5) AS enc_pool_5,
  (SELECT COUNT(*) FROM enc_pool_1) AS enc_pool_1,
  (SELECT COUNT(*) FROM dx_vital_pool) AS dx_vital_pool,
  (SELECT COUNT(*) FROM dx_vital_rx_pool) AS dx_vital_rx_pool,
  (SELECT COUNT(*) FROM dx_vital_rx_lab_pool) AS dx_vital_rx_lab_pool,
  (SELECT COUNT(*) FROM enc_dx_pool) AS enc_dx_pool,
  (SELECT COUNT(*) FROM enc_px_pool) AS enc_px_pool";
