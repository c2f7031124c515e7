//! Distribution files: grammar, line parsers for both dialects, whole-file
//! parsing and discovery.

pub mod document;
pub mod format;
pub mod grammar;
pub mod line;
pub mod models;
pub mod scanner;
pub mod skypatcher;
pub mod spid;

pub use document::{parse_distribution_text, read_distribution_file};
pub use format::format_spid_line;
pub use line::{parse_line, ParsedLine};
pub use models::*;
pub use scanner::{scan_distribution_files, ScanEvent, ScanOutcome, ScanStatus};
