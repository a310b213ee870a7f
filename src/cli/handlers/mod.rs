//! CLI command handlers module
//!
//! This module is organized by functional domains:
//! - init: schema and index creation
//! - ingest: embedding interchange files and loading records
//! - ask: one-shot and interactive queries
//! - info: information display (stats, config)

pub mod ask;
pub mod info;
pub mod ingest;
pub mod init;

// Re-export all public handlers
pub use ask::*;
pub use info::*;
pub use ingest::*;
pub use init::*;
