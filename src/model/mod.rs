// File: src/model/mod.rs
pub mod enums;
pub mod fields;
pub mod rows;

pub use enums::{ConstraintType, LinkType, TaskStatus, TaskType};
pub use rows::{ProjectRow, TaskPredRow, TaskRow, TaskRsrcRow};
