//! Resolution engine: reference binding, filter matching, the keyword fixed
//! point and final outfit selection.

pub mod keywords;
pub mod matcher;
pub mod models;
pub mod outfits;
pub mod references;

pub use keywords::{resolve_keywords, KeywordResolution, KeywordRule};
pub use matcher::{matches_filter, wildcard_matches};
pub use models::*;
pub use outfits::{order_files, resolve_outfits};
pub use references::{keyword_grant, resolve_filter_references, KeywordGrant};
