//! Hand and game loop
//!
//! A game starts with every player anteing into the pot and runs turns
//! round-robin until either the pot is empty or every player has been
//! eliminated by reaching the max-loss threshold.
//!
//! Each turn for an active player: reshuffle if exactly four cards remain,
//! draw the fence, ask the player's strategy for a bet, draw the middle card
//! and settle against the pot. Eliminated players are skipped without
//! touching the deck.

use crate::card::Fence;
use crate::deck::Deck;
use crate::error::{CrintonError, Result};
use crate::payoff::resolve;
use crate::strategy::{Strategy, TableView, MIN_BET};
use rand::Rng;
use tracing::debug;

/// Default cap on turns per game. Real games end in a few hundred.
pub const MAX_TURNS: u64 = 10_000_000;

/// Table rules shared by every game in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    ante: i64,
    max_loss: i64,
}

impl GameConfig {
    /// Validate and build a config. Both values must be positive.
    pub fn new(ante: i64, max_loss: i64) -> Result<Self> {
        if ante <= 0 {
            return Err(CrintonError::InvalidConfiguration { field: "ante", value: ante });
        }
        if max_loss <= 0 {
            return Err(CrintonError::InvalidConfiguration { field: "max_loss", value: max_loss });
        }
        Ok(GameConfig { ante, max_loss })
    }

    /// Chips each player puts in the pot at the start of a game
    pub fn ante(&self) -> i64 {
        self.ante
    }

    /// Loss threshold at which a player is eliminated
    pub fn max_loss(&self) -> i64 {
        self.max_loss
    }

    /// A player with this balance or less sits out the rest of the game.
    pub fn elimination_line(&self) -> i64 {
        -self.max_loss + 1
    }
}

/// Per-player state. Only `chips` affects play; the counters are reporting only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seat {
    /// Net chips relative to the start of the game, ante included
    pub chips: i64,
    /// Hands played
    pub hands: u64,
    /// Hands where the player bet the table minimum
    pub min_bets: u64,
}

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Pot has chips and at least one player can still act
    Active,
    /// Every player is at or below the elimination line
    AllEliminated,
    /// The pot reached zero
    PotExhausted,
}

impl Status {
    /// Check if the game is over
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Active)
    }
}

/// Final state of a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub status: Status,
    pub seats: Vec<Seat>,
    pub turns: u64,
}

impl GameResult {
    /// Chips won by each player. A game where everyone was eliminated counts
    /// as a wash: all zeros.
    pub fn winnings(&self) -> Vec<i64> {
        match self.status {
            Status::AllEliminated => vec![0; self.seats.len()],
            _ => self.seats.iter().map(|seat| seat.chips).collect(),
        }
    }
}

/// One game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    strategies: Vec<Strategy>,
    deck: Deck,
    pot: i64,
    seats: Vec<Seat>,
    current: usize,
    turns: u64,
    turn_limit: u64,
}

impl Game {
    /// Start a game with a freshly shuffled deck. Player count is the number
    /// of strategies.
    pub fn new<R: Rng + ?Sized>(config: GameConfig, strategies: Vec<Strategy>, rng: &mut R) -> Result<Self> {
        Self::with_deck(config, strategies, Deck::new(rng))
    }

    /// Start a game from a given deck.
    pub fn with_deck(config: GameConfig, strategies: Vec<Strategy>, deck: Deck) -> Result<Self> {
        if strategies.is_empty() {
            return Err(CrintonError::EmptyLineup);
        }
        let players = strategies.len();
        let seats = vec![
            Seat {
                chips: -config.ante(),
                ..Seat::default()
            };
            players
        ];
        Ok(Game {
            config,
            strategies,
            deck,
            pot: config.ante() * players as i64,
            seats,
            current: 0,
            turns: 0,
            turn_limit: MAX_TURNS,
        })
    }

    /// Override the defensive turn cap.
    pub fn with_turn_limit(mut self, turn_limit: u64) -> Self {
        self.turn_limit = turn_limit;
        self
    }

    pub fn pot(&self) -> i64 {
        self.pot
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Index of the player whose turn is next
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn turns(&self) -> u64 {
        self.turns
    }

    /// Check if a player has dropped to the elimination line
    pub fn is_eliminated(&self, player: usize) -> bool {
        self.seats[player].chips <= self.config.elimination_line()
    }

    pub fn status(&self) -> Status {
        if self.pot == 0 {
            Status::PotExhausted
        } else if (0..self.seats.len()).all(|player| self.is_eliminated(player)) {
            Status::AllEliminated
        } else {
            Status::Active
        }
    }

    /// Play one turn. Returns the status after the turn; terminal statuses
    /// leave the game untouched.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Status> {
        let status = self.status();
        if status.is_terminal() {
            return Ok(status);
        }
        self.turns += 1;
        if self.is_eliminated(self.current) {
            self.advance();
            return Ok(Status::Active);
        }

        if self.deck.reshuffle_if_low(rng) {
            debug!("shuffle");
        }
        let (first, second) = self.deck.draw_pair()?;
        let fence = Fence::new(first, second);

        let player = self.current;
        let view = TableView {
            fence,
            deck: &self.deck,
            chips: self.seats[player].chips,
            pot: self.pot,
            max_loss: self.config.max_loss(),
        };
        let bet = self.strategies[player].bet(&view);

        let seat = &mut self.seats[player];
        seat.hands += 1;
        if bet == MIN_BET {
            seat.min_bets += 1;
        }

        let middle = self.deck.draw()?;
        let (chips, pot, outcome) = resolve(fence, middle, seat.chips, self.pot, bet);
        seat.chips = chips;
        self.pot = pot;
        debug!(
            player,
            left = fence.left(),
            middle = middle.rank(),
            right = fence.right(),
            bet,
            ?outcome,
            chips,
            pot,
            "hand"
        );
        debug_assert!(self.pot >= 0, "pot went negative");
        debug_assert_eq!(self.seats.iter().map(|s| s.chips).sum::<i64>() + self.pot, 0);

        if self.pot == 0 {
            return Ok(Status::PotExhausted);
        }
        self.advance();
        Ok(Status::Active)
    }

    /// Run turns until the game ends.
    pub fn play<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<GameResult> {
        loop {
            let status = self.step(rng)?;
            if status.is_terminal() {
                return Ok(GameResult {
                    status,
                    seats: self.seats,
                    turns: self.turns,
                });
            }
            if self.turns >= self.turn_limit {
                return Err(CrintonError::TurnLimitExceeded { turns: self.turns });
            }
        }
    }

    fn advance(&mut self) {
        self.current = (self.current + 1) % self.seats.len();
    }
}
