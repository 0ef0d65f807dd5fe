//! Reference data handling

pub mod reference_table;
pub mod loader;

pub use reference_table::ReferenceTable;
pub use loader::{LoadReport, ReferenceLoader};
