//! Result CSV writing, the MAPD solver exchange format, and run summaries.

pub mod csv;
pub mod error;
pub mod mapd;
pub mod summary;

pub use error::{IoError, IoResult};
pub use mapd::{read_storehouse_out, write_storehouse_map, write_storehouse_task, McaOutput, TaskAssignmentEntry};
pub use summary::{summarize, RunSummary};

pub use crate::csv::write_result_csv;
