//! Command handlers for CLI operations
//!
//! This module contains handlers for different CLI commands,
//! separating command execution logic from parsing and validation.

pub mod fetch;
pub mod info;
pub mod purge;
pub mod stats;

pub use fetch::FetchCommandHandler;
pub use info::InfoCommandHandler;
pub use purge::PurgeCommandHandler;
pub use stats::StatsCommandHandler;
