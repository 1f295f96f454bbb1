//! CLI command implementations

pub mod config;
pub mod inspect;
pub mod play;
pub mod train;
