pub mod errors;

pub use errors::{DistributionError, DistributionParseError, DistributionResult};
