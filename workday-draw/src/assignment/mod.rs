// Assignment service for drawing one candidate per workday
//
// Pure in-memory logic: the HTTP layer hands over a candidate pool
// extracted from a spreadsheet and the submitted labels, and gets back an
// ordered label -> value assignment. Nothing in here touches the file system.

pub mod core;
pub mod models;

// Re-export commonly used types
pub use self::core::{ExhaustedPoolError, assign};
pub use models::{Assignment, CandidatePool, CellValue};
