// cdmqc-core/src/domain/mod.rs

pub mod catalog;
pub mod dates;
pub mod error;
pub mod quality;
pub mod report;
