// cdmqc/src/commands/describe.rs
//
// USE CASE: print the static CDM table catalogue. No warehouse needed.

use cdmqc_core::domain::catalog::CDM_TABLES;
use cdmqc_core::domain::report::{Cell, ReportTable};

use crate::render::print_report;

pub fn execute() {
    let mut table = ReportTable::new(
        "CDM table catalogue",
        "Primary keys, patient/provider linkage and temporal columns per table.",
        &["Table", "Primary key", "Patient column", "Temporal column", "Provider column"],
    );

    for def in CDM_TABLES {
        table.push_row(vec![
            Cell::label(def.name),
            Cell::plain(def.key_description),
            Cell::plain(def.patient_id_column.unwrap_or("-")),
            Cell::plain(def.temporal_column.unwrap_or("-")),
            Cell::plain(def.provider_id_column.unwrap_or("-")),
        ]);
    }

    print_report(&table);
}
