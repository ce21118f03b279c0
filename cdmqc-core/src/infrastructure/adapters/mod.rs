// cdmqc-core/src/infrastructure/adapters/mod.rs

pub mod duckdb;
