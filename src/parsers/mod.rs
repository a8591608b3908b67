//! File parsing modules
//!
//! Low-level readers for the tabular formats accepted as song lists.

pub mod csv_parser;
pub mod excel_parser;

// Re-export commonly used parsers
pub use csv_parser::*;
pub use excel_parser::*;
