//! Repeated independent games and per-player aggregation
//!
//! Games share nothing: each one owns its deck, seats and generator, seeded
//! from the run seed plus the game index, so a run is reproducible regardless
//! of how Rayon schedules it. Results are folded into per-worker batches and
//! merged at the end.

use crate::error::{CrintonError, Result};
use crate::game::{Game, GameConfig, GameResult, Status};
use crate::strategy::Strategy;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::info;

/// How many games to run and from which seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    games: u64,
    seed: u64,
}

impl SimulationConfig {
    /// `games` must be positive. Without a seed one is drawn at random so
    /// the run can still be replayed.
    pub fn new(games: u64, seed: Option<u64>) -> Result<Self> {
        if games == 0 {
            return Err(CrintonError::InvalidConfiguration { field: "games", value: 0 });
        }
        Ok(SimulationConfig {
            games,
            seed: seed.unwrap_or_else(rand::random),
        })
    }

    pub fn games(&self) -> u64 {
        self.games
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Running totals for one player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    /// Games played
    pub games: u64,
    /// Chips won, summed over games
    pub chips: i64,
    /// Hands played
    pub hands: u64,
    /// Hands bet at the table minimum
    pub min_bets: u64,
    /// Worst single-game result
    pub min: Option<i64>,
    /// Best single-game result
    pub max: Option<i64>,
}

impl Tally {
    /// Add one game's outcome for this player.
    pub fn record(&mut self, won: i64, hands: u64, min_bets: u64) {
        self.games += 1;
        self.chips += won;
        self.hands += hands;
        self.min_bets += min_bets;
        self.min = Some(self.min.map_or(won, |m| m.min(won)));
        self.max = Some(self.max.map_or(won, |m| m.max(won)));
    }

    /// Combine two partial tallies.
    pub fn merge(self, other: Tally) -> Tally {
        let pick = |a: Option<i64>, b: Option<i64>, f: fn(i64, i64) -> i64| match (a, b) {
            (Some(a), Some(b)) => Some(f(a, b)),
            (a, b) => a.or(b),
        };
        Tally {
            games: self.games + other.games,
            chips: self.chips + other.chips,
            hands: self.hands + other.hands,
            min_bets: self.min_bets + other.min_bets,
            min: pick(self.min, other.min, i64::min),
            max: pick(self.max, other.max, i64::max),
        }
    }

    /// Mean chips won per game
    pub fn chips_per_game(&self) -> f64 {
        ratio(self.chips as f64, self.games)
    }

    /// Mean chips won per hand played
    pub fn chips_per_hand(&self) -> f64 {
        ratio(self.chips as f64, self.hands)
    }

    /// Share of hands bet at the table minimum
    pub fn min_bet_fraction(&self) -> f64 {
        ratio(self.min_bets as f64, self.hands)
    }
}

fn ratio(numerator: f64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

/// Per-worker partial result.
#[derive(Debug, Clone)]
struct Batch {
    tallies: Vec<Tally>,
    wipeouts: u64,
}

impl Batch {
    fn new(players: usize) -> Self {
        Batch {
            tallies: vec![Tally::default(); players],
            wipeouts: 0,
        }
    }

    fn record(mut self, result: &GameResult) -> Self {
        if result.status == Status::AllEliminated {
            self.wipeouts += 1;
        }
        for ((tally, won), seat) in self.tallies.iter_mut().zip(result.winnings()).zip(&result.seats) {
            tally.record(won, seat.hands, seat.min_bets);
        }
        self
    }

    fn merge(self, other: Batch) -> Self {
        Batch {
            tallies: self
                .tallies
                .into_iter()
                .zip(other.tallies)
                .map(|(a, b)| a.merge(b))
                .collect(),
            wipeouts: self.wipeouts + other.wipeouts,
        }
    }
}

/// Aggregate results for one seat.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSummary {
    pub player: usize,
    pub strategy: Strategy,
    pub tally: Tally,
}

/// Result of a full simulation run.
#[derive(Debug, Clone)]
pub struct Summary {
    pub config: GameConfig,
    pub games: u64,
    pub seed: u64,
    /// Games that ended with every player eliminated
    pub wipeouts: u64,
    pub players: Vec<PlayerSummary>,
    pub elapsed: Duration,
}

/// Play `sim.games()` independent games with one seat per strategy.
pub fn simulate(config: GameConfig, strategies: &[Strategy], sim: SimulationConfig) -> Result<Summary> {
    if strategies.is_empty() {
        return Err(CrintonError::EmptyLineup);
    }
    let players = strategies.len();
    info!(games = sim.games(), players, seed = sim.seed(), "starting simulation");
    let start = Instant::now();

    let batch = (0..sim.games())
        .into_par_iter()
        .map(|i| {
            let mut rng = SmallRng::seed_from_u64(sim.seed().wrapping_add(i));
            Game::new(config, strategies.to_vec(), &mut rng)?.play(&mut rng)
        })
        .try_fold(|| Batch::new(players), |batch, game| game.map(|game| batch.record(&game)))
        .try_reduce(|| Batch::new(players), |a, b| Ok(a.merge(b)))?;

    let elapsed = start.elapsed();
    info!(elapsed_ms = elapsed.as_millis() as u64, wipeouts = batch.wipeouts, "simulation finished");

    Ok(Summary {
        config,
        games: sim.games(),
        seed: sim.seed(),
        wipeouts: batch.wipeouts,
        players: batch
            .tallies
            .into_iter()
            .zip(strategies)
            .enumerate()
            .map(|(player, (tally, &strategy))| PlayerSummary { player, strategy, tally })
            .collect(),
        elapsed,
    })
}
