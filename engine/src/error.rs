//! Error type shared by every engine module

use thiserror::Error;

/// Errors raised by the simulation engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CrintonError {
    /// A strategy code did not match any registered strategy.
    #[error("unknown strategy code: {0:?}")]
    UnknownStrategyCode(String),

    /// More cards were requested than remain in the deck.
    ///
    /// The reshuffle rule keeps at least four cards available for every hand,
    /// so reaching this means an internal invariant was broken.
    #[error("deck underflow: requested {requested} card(s) with {remaining} remaining")]
    DeckUnderflow { requested: usize, remaining: usize },

    /// A configuration value is outside its legal range.
    #[error("{field} must be > 0 (got {value})")]
    InvalidConfiguration { field: &'static str, value: i64 },

    /// The optimal-bet quadratic has no real root for the given probabilities.
    #[error("negative discriminant {discriminant} in optimal bet solution")]
    InvalidProbabilityState { discriminant: f64 },

    /// A game ran past the defensive turn cap without terminating.
    #[error("game did not terminate within {turns} turns")]
    TurnLimitExceeded { turns: u64 },

    /// A game or simulation was started with no players.
    #[error("at least one strategy is required")]
    EmptyLineup,
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, CrintonError>;
