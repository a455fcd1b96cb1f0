//! crinton Engine - Core simulation types and logic
//!
//! This crate contains the Crinton game model: the rank-only deck, payoff
//! resolution, the betting strategies, the per-game turn loop, and the
//! parallel Monte Carlo runner that aggregates results across games.
//!
//! The engine is platform-agnostic and has zero UI dependencies. All
//! randomness is passed in by the caller.

pub mod card;
pub mod deck;
pub mod error;
pub mod game;
pub mod payoff;
pub mod simulation;
pub mod strategy;

pub use error::{CrintonError, Result};
pub use game::{Game, GameConfig, GameResult, Status};
pub use simulation::{simulate, SimulationConfig, Summary};
pub use strategy::{lineup, Strategy, StrategyCode};
