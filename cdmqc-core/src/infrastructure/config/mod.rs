// cdmqc-core/src/infrastructure/config/mod.rs

pub mod report;

pub use report::{AppConfig, load_config};
