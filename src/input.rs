//! Input sources of a compiler run.

pub mod properties;
pub mod transform_table;
