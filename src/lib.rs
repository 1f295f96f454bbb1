//! Gladiator arena: a turn-based duel between two learning fighters
//!
//! This crate provides:
//! - A one-dimensional arena with distance regimes, mana, arrows and guard
//! - A turn arbiter that alternates Red and Blue, filters illegal moves and
//!   scores every turn with a shaped reward
//! - A tabular decision engine that learns from those rewards and persists
//!   its table after every update
//! - A self-play training pipeline with pluggable observers
//! - A CLI for training, playing against a brain and inspecting it

pub mod adapters;
pub mod app;
pub mod arena;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use error::{Error, Result};
pub use types::{MatchResult, Side, SituationKey};
