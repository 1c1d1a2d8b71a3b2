//! Simple to use cli for tracking your study time. Records are kept in a plain csv file, so they
//! can be opened with any spreadsheet application. On top of the records it can show a trend for
//! the last week and how much each subject contributes to the overall study time.
//!

pub mod analysis;
pub mod cli;
pub mod storage;
pub mod utils;
