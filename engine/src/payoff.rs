//! Payoff resolution for a single hand
//!
//! Chips only ever move between the acting player and the pot, so every
//! resolution preserves `chips + pot`.

use crate::card::{Card, Fence};

/// Where the middle card landed relative to the fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Strictly between the posts: the player takes `bet` from the pot.
    Inside,
    /// Below the left post or above the right post: the player pays `bet`.
    Outside,
    /// Equal to either post: the player pays `2 * bet`.
    Post,
}

impl Outcome {
    /// Classify `middle` against `fence`.
    pub fn of(fence: Fence, middle: Card) -> Self {
        let m = middle.rank();
        if m < fence.left() || m > fence.right() {
            Outcome::Outside
        } else if m > fence.left() && m < fence.right() {
            Outcome::Inside
        } else {
            Outcome::Post
        }
    }

    /// Signed chip change for the player on a `bet`.
    pub fn delta(self, bet: i64) -> i64 {
        match self {
            Outcome::Inside => bet,
            Outcome::Outside => -bet,
            Outcome::Post => -2 * bet,
        }
    }
}

/// Resolve one hand. Returns the player's new chip balance, the new pot and
/// the outcome. Pure: inputs are taken by value.
pub fn resolve(fence: Fence, middle: Card, chips: i64, pot: i64, bet: i64) -> (i64, i64, Outcome) {
    let outcome = Outcome::of(fence, middle);
    let delta = outcome.delta(bet);
    (chips + delta, pot - delta, outcome)
}
