//! Service module that exports interfaces to external applications, APIs, etc.

pub mod readings;
pub mod visualization;

// rexport some traits and utilty functions
pub use readings::{new_reading_source_handler, ReadingSource, RestClient};
pub use visualization::TerminalDashboard;
