//! Parsing, outfit resolution and conflict detection for SPID and SkyPatcher
//! distribution files.
//!
//! The host supplies plugin records through [`services::records::RecordStore`];
//! everything else is computed from the distribution files themselves.

pub mod services;
pub mod types;
#[cfg(test)]
pub mod test_utils;

pub use services::config::{ConfigService, ResolverSettings};
pub use services::conflict::{detect_conflicts, ConflictDetectionResult, NpcConflictInfo};
pub use services::distribution::{
    parse_distribution_text, read_distribution_file, scan_distribution_files, DistributionDialect,
    DistributionFile, SpidDistributionFilter,
};
pub use services::records::{FormKey, InMemoryRecordStore, ModKey, NpcFilterData, RecordStore};
pub use services::resolution::{resolve_outfits, NpcOutfitAssignment, ResolutionReport};
pub use types::{DistributionError, DistributionParseError, DistributionResult};
