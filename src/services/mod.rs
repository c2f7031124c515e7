pub mod config;
pub mod conflict;
pub mod distribution;
pub mod records;
pub mod resolution;
