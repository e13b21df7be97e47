//! lang-strtab
//!
//! Compiles per-locale `key=value` property files into a C string table pair:
//! a header of key ordinals and per-locale array declarations, and a source
//! file holding deduplicated string constants and the arrays themselves.

pub mod config;
pub mod emit;
pub mod indexer;
pub mod input;
pub mod interned;
pub mod pipeline;
pub mod table;
pub mod transform;
pub mod types;

mod test_utils;

pub use pipeline::{
    CompileError,
    compile,
    run,
};
