//! CLI infrastructure for the gladiator arena
//!
//! This module provides the command-line interface for self-play training,
//! interactive matches against a trained brain, brain inspection and config
//! scaffolding.

pub mod commands;
pub mod config;
pub mod output;
