// File: src/lib.rs
// Crate root library declaration and module exports.
pub mod calendar;
pub mod checks;
pub mod cli;
pub mod document;
pub mod error;
pub mod model;
pub mod p6xml;
pub mod report;
pub mod scalar;
pub mod settings;
pub mod store;
pub mod xer;

pub use document::{Document, ExportHeader, Table};
pub use error::{Error, Result};
pub use p6xml::parse_p6xml;
pub use report::{HealthReport, run_all};
pub use scalar::{Row, Scalar};
pub use settings::{CheckSettings, SettingsRepository};
pub use store::{MemoryStore, TableStore};
pub use xer::{XerOptions, parse_xer};
