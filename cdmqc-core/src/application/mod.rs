// cdmqc-core/src/application/mod.rs

pub mod engine;
pub mod ports;
pub mod sections;

// --- RE-EXPORTS (FACADE PATTERN) ---
// The CLI only needs `use cdmqc_core::application::{ReportContext, run_query};`
// without knowing the internal file layout.

pub use engine::run_query;
pub use sections::ReportContext;
