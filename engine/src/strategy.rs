//! Betting strategies
//!
//! A strategy is a pure function of the table as seen by the acting player
//! ([`TableView`]) to a bet size. Strategies are a closed set of variants so
//! dispatch is a `match`, and a lineup of players is a `Vec<Strategy>`.
//!
//! Every strategy bets at most [`max_bet`], which keeps a player from losing
//! more than `max_loss` chips even on a post hit.

use crate::card::Fence;
use crate::deck::Deck;
use crate::error::{CrintonError, Result};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Table minimum bet.
pub const MIN_BET: i64 = 1;

/// Everything a strategy may look at when sizing a bet.
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    /// Normalized fence for the current hand
    pub fence: Fence,
    /// Remaining deck after the fence was drawn
    pub deck: &'a Deck,
    /// Acting player's chip balance (negative after the ante)
    pub chips: i64,
    /// Current pot
    pub pot: i64,
    /// Elimination threshold
    pub max_loss: i64,
}

impl TableView<'_> {
    /// Largest bet that keeps a double loss above `-max_loss`.
    pub fn max_bet(&self) -> i64 {
        max_bet(self.chips, self.max_loss)
    }
}

/// `floor(0.5 * (chips + max_loss))`, truncated toward zero.
///
/// Any player still in the game has `chips + max_loss >= 2`, so this is at
/// least one for every bet the game loop asks for.
pub fn max_bet(chips: i64, max_loss: i64) -> i64 {
    (chips + max_loss) / 2
}

/// Round to the nearest integer, ties to even.
fn round_chips(x: f64) -> i64 {
    x.round_ties_even() as i64
}

/// Expected value per unit bet given win and plain-loss probabilities.
pub fn expected_value(pw: f64, pl: f64) -> f64 {
    3.0 * pw + pl - 2.0
}

/// Growth-optimal fraction of the pot to bet.
///
/// Smaller root of `2x² + (pl - 3pw)x + (3pw + pl - 2) = 0`.
pub fn kelly_fraction(pw: f64, pl: f64) -> Result<f64> {
    let (a, b, c) = (2.0, pl - 3.0 * pw, expected_value(pw, pl));
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Err(CrintonError::InvalidProbabilityState { discriminant });
    }
    Ok((-b - discriminant.sqrt()) / (2.0 * a))
}

/// A betting strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Sizes bets from exact probabilities over the remaining deck.
    Perfect,
    /// Half pot on wide fences when the pot is large, full pot on the widest.
    Home,
    /// Home with a lower half-pot threshold and a capped full-pot band.
    HomeV2,
    /// Full pot at `gap >= full_gap`, half pot at `gap >= half_gap`.
    FullHalf { full_gap: u8, half_gap: u8 },
}

impl Strategy {
    /// Every concrete strategy reachable from a registry code.
    pub const ALL: [Strategy; 9] = [
        Strategy::Perfect,
        Strategy::Home,
        Strategy::HomeV2,
        Strategy::FullHalf { full_gap: 11, half_gap: 7 },
        Strategy::FullHalf { full_gap: 11, half_gap: 8 },
        Strategy::FullHalf { full_gap: 12, half_gap: 7 },
        Strategy::FullHalf { full_gap: 12, half_gap: 8 },
        Strategy::FullHalf { full_gap: 13, half_gap: 7 },
        Strategy::FullHalf { full_gap: 13, half_gap: 8 },
    ];

    /// Bet size for the acting player.
    pub fn bet(&self, view: &TableView) -> i64 {
        match *self {
            Strategy::Perfect => perfect(view),
            Strategy::Home => home(view),
            Strategy::HomeV2 => home_v2(view),
            Strategy::FullHalf { full_gap, half_gap } => full_half(full_gap, half_gap, view),
        }
    }

    /// Short registry code (`p`, `h`, `h2`, `117`, ...)
    pub fn code(&self) -> String {
        match *self {
            Strategy::Perfect => "p".to_string(),
            Strategy::Home => "h".to_string(),
            Strategy::HomeV2 => "h2".to_string(),
            Strategy::FullHalf { full_gap, half_gap } => format!("{}{}", full_gap, half_gap),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Strategy::Perfect => write!(f, "perfect"),
            Strategy::Home => write!(f, "strategy_home"),
            Strategy::HomeV2 => write!(f, "strategy_home2"),
            Strategy::FullHalf { full_gap, half_gap } => write!(f, "fh_{}_{}", full_gap, half_gap),
        }
    }
}

fn perfect(view: &TableView) -> i64 {
    let max_bet = view.max_bet();
    let deck = view.deck;
    if deck.is_empty() {
        return max_bet.min(MIN_BET);
    }
    let size = deck.len() as f64;
    let fence = view.fence;

    let wins: u32 = fence.inside().map(|r| deck.remaining_count(r) as u32).sum();
    let matches = deck.remaining_count(fence.left()) as u32 + deck.remaining_count(fence.right()) as u32;
    let pw = wins as f64 / size;
    let pm = matches as f64 / size;
    let pl = 1.0 - pw - pm;

    if expected_value(pw, pl) <= 0.0 {
        return max_bet.min(MIN_BET);
    }
    match kelly_fraction(pw, pl) {
        Ok(fraction) => max_bet.min(round_chips(fraction * view.pot as f64)),
        Err(e) => {
            warn!(pw, pl, error = %e, "falling back to minimum bet");
            max_bet.min(MIN_BET)
        }
    }
}

fn full_half(full_gap: u8, half_gap: u8, view: &TableView) -> i64 {
    let gap = view.fence.gap();
    if gap >= full_gap {
        return view.max_bet().min(view.pot);
    }
    if gap >= half_gap {
        return view.max_bet().min(round_chips(0.5 * view.pot as f64));
    }
    MIN_BET
}

fn home(view: &TableView) -> i64 {
    let gap = view.fence.gap();
    if gap <= 9 {
        MIN_BET
    } else if view.pot > 20 && gap < 12 {
        view.max_bet().min(round_chips(0.5 * view.pot as f64))
    } else {
        view.max_bet().min(view.pot)
    }
}

fn home_v2(view: &TableView) -> i64 {
    let gap = view.fence.gap();
    if gap <= 8 {
        MIN_BET
    } else if (9..=10).contains(&gap) || (view.pot > 20 && (11..=12).contains(&gap)) {
        view.max_bet().min(round_chips(0.5 * view.pot as f64))
    } else {
        view.max_bet().min(view.pot)
    }
}

/// A registry entry: either a fixed strategy or a random pick among them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyCode {
    Fixed(Strategy),
    /// `r`: one of [`Strategy::ALL`], chosen when the lineup is built.
    Random,
}

impl StrategyCode {
    /// Turn the code into a concrete strategy.
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Strategy {
        match self {
            StrategyCode::Fixed(strategy) => strategy,
            StrategyCode::Random => *Strategy::ALL.choose(rng).unwrap_or(&Strategy::Perfect),
        }
    }
}

impl FromStr for StrategyCode {
    type Err = CrintonError;

    fn from_str(s: &str) -> Result<Self> {
        let fixed = |strategy: Strategy| -> Result<Self> { Ok(StrategyCode::Fixed(strategy)) };
        match s {
            "p" => fixed(Strategy::Perfect),
            "h" => fixed(Strategy::Home),
            "h2" => fixed(Strategy::HomeV2),
            "r" => Ok(StrategyCode::Random),
            other => Strategy::ALL
                .iter()
                .find(|strategy| strategy.code() == other)
                .map(|&strategy| StrategyCode::Fixed(strategy))
                .ok_or_else(|| CrintonError::UnknownStrategyCode(other.to_string())),
        }
    }
}

/// Parse one code per player into a lineup, resolving `r` with `rng`.
///
/// Fails on the first unknown code.
pub fn lineup<S: AsRef<str>, R: Rng + ?Sized>(codes: &[S], rng: &mut R) -> Result<Vec<Strategy>> {
    codes
        .iter()
        .map(|code| code.as_ref().parse::<StrategyCode>().map(|c| c.resolve(rng)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn fence(a: u8, b: u8) -> Fence {
        Fence::new(Card::new(a), Card::new(b))
    }

    fn fresh_deck() -> Deck {
        Deck::new(&mut SmallRng::seed_from_u64(3))
    }

    fn view(fence: Fence, deck: &Deck, chips: i64, pot: i64, max_loss: i64) -> TableView<'_> {
        TableView { fence, deck, chips, pot, max_loss }
    }

    const FH_11_7: Strategy = Strategy::FullHalf { full_gap: 11, half_gap: 7 };

    #[test]
    fn test_max_bet_truncates() {
        assert_eq!(max_bet(-6, 160), 77);
        assert_eq!(max_bet(-5, 160), 77);
        assert_eq!(max_bet(-158, 160), 1);
        assert_eq!(max_bet(-159, 160), 0);
    }

    #[test]
    fn test_full_half_full_pot_on_widest_gap() {
        let deck = fresh_deck();
        // gap 12 >= 11
        assert_eq!(FH_11_7.bet(&view(fence(1, 13), &deck, -6, 12, 160)), 12);
        // capped by max_bet
        assert_eq!(FH_11_7.bet(&view(fence(1, 13), &deck, -150, 40, 160)), 5);
    }

    #[test]
    fn test_full_half_half_pot_on_mid_gap() {
        let deck = fresh_deck();
        // gap 8 >= 7: half of 13 is 6.5, ties to even
        assert_eq!(FH_11_7.bet(&view(fence(5, 13), &deck, -6, 13, 160)), 6);
        assert_eq!(FH_11_7.bet(&view(fence(5, 13), &deck, -6, 15, 160)), 8);
        assert_eq!(FH_11_7.bet(&view(fence(5, 13), &deck, -152, 40, 160)), 4);
    }

    #[test]
    fn test_full_half_minimum_on_narrow_gap() {
        let deck = fresh_deck();
        assert_eq!(FH_11_7.bet(&view(fence(5, 11), &deck, -6, 100, 160)), MIN_BET);
    }

    #[test]
    fn test_ace_pair_counts_as_full_gap() {
        let deck = fresh_deck();
        let strategy = Strategy::FullHalf { full_gap: 13, half_gap: 8 };
        assert_eq!(strategy.bet(&view(fence(1, 1), &deck, -6, 12, 160)), 12);
    }

    #[test]
    fn test_home_breakpoints() {
        let deck = fresh_deck();
        let home = Strategy::Home;
        assert_eq!(home.bet(&view(fence(2, 11), &deck, -6, 30, 160)), MIN_BET); // gap 9
        assert_eq!(home.bet(&view(fence(2, 12), &deck, -6, 30, 160)), 15); // gap 10, big pot
        assert_eq!(home.bet(&view(fence(2, 12), &deck, -6, 20, 160)), 20); // gap 10, small pot
        assert_eq!(home.bet(&view(fence(1, 13), &deck, -6, 30, 160)), 30); // gap 12
    }

    #[test]
    fn test_home_v2_breakpoints() {
        let deck = fresh_deck();
        let home = Strategy::HomeV2;
        assert_eq!(home.bet(&view(fence(2, 10), &deck, -6, 30, 160)), MIN_BET); // gap 8
        assert_eq!(home.bet(&view(fence(2, 11), &deck, -6, 10, 160)), 5); // gap 9, any pot
        assert_eq!(home.bet(&view(fence(1, 13), &deck, -6, 30, 160)), 15); // gap 12, big pot
        assert_eq!(home.bet(&view(fence(1, 13), &deck, -6, 20, 160)), 20); // gap 12, small pot
        assert_eq!(home.bet(&view(fence(1, 1), &deck, -6, 30, 160)), 30); // gap 13
    }

    #[test]
    fn test_perfect_minimum_on_certain_loss() {
        // Only posts and outside cards remain.
        let deck = Deck::stacked(&[Card::new(6), Card::new(7), Card::new(13)]);
        let bet = Strategy::Perfect.bet(&view(fence(6, 7), &deck, -6, 100, 160));
        assert_eq!(bet, MIN_BET);
        assert!(expected_value(0.0, 1.0) <= 0.0);
    }

    #[test]
    fn test_perfect_bets_kelly_fraction_of_pot() {
        // Every remaining card is strictly inside: pw = 1.
        let deck = Deck::stacked(&[Card::new(5), Card::new(6), Card::new(7), Card::new(8)]);
        let fraction = kelly_fraction(1.0, 0.0).unwrap();
        assert!((fraction - 0.5).abs() < 1e-12);
        let bet = Strategy::Perfect.bet(&view(fence(2, 12), &deck, -6, 40, 160));
        assert_eq!(bet, 20);
    }

    #[test]
    fn test_perfect_respects_max_bet() {
        let deck = Deck::stacked(&[Card::new(5), Card::new(6), Card::new(7), Card::new(8)]);
        let bet = Strategy::Perfect.bet(&view(fence(2, 12), &deck, -150, 400, 160));
        assert_eq!(bet, 5);
    }

    #[test]
    fn test_perfect_skips_narrow_fences_on_fresh_deck() {
        let deck = fresh_deck();
        assert_eq!(Strategy::Perfect.bet(&view(fence(4, 9), &deck, -6, 100, 160)), MIN_BET);
        assert!(Strategy::Perfect.bet(&view(fence(1, 1), &deck, -6, 100, 160)) > MIN_BET);
    }

    #[test]
    fn test_kelly_root_positive_when_ev_positive() {
        let (pw, pl) = (0.8, 0.1);
        assert!(expected_value(pw, pl) > 0.0);
        let x = kelly_fraction(pw, pl).unwrap();
        assert!(x > 0.0 && x < 1.0);
        // x is a root of 2x² + bx + c
        let (b, c) = (pl - 3.0 * pw, expected_value(pw, pl));
        assert!((2.0 * x * x + b * x + c).abs() < 1e-9);
    }

    #[test]
    fn test_kelly_rejects_negative_discriminant() {
        // b = 0, c = 1: discriminant = -8
        let err = kelly_fraction(0.5, 1.5).unwrap_err();
        assert_eq!(err, CrintonError::InvalidProbabilityState { discriminant: -8.0 });
    }

    #[test]
    fn test_registry_codes() {
        let parse = |s: &str| s.parse::<StrategyCode>().unwrap();
        assert_eq!(parse("p"), StrategyCode::Fixed(Strategy::Perfect));
        assert_eq!(parse("h"), StrategyCode::Fixed(Strategy::Home));
        assert_eq!(parse("h2"), StrategyCode::Fixed(Strategy::HomeV2));
        assert_eq!(parse("128"), StrategyCode::Fixed(Strategy::FullHalf { full_gap: 12, half_gap: 8 }));
        assert_eq!(parse("r"), StrategyCode::Random);
        for strategy in Strategy::ALL {
            assert_eq!(parse(&strategy.code()), StrategyCode::Fixed(strategy));
        }
    }

    #[test]
    fn test_unknown_code_fails_loudly() {
        assert_eq!(
            "119".parse::<StrategyCode>(),
            Err(CrintonError::UnknownStrategyCode("119".to_string()))
        );
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(lineup(&["p", "nope"], &mut rng).is_err());
    }

    #[test]
    fn test_lineup_resolves_random_to_concrete() {
        let mut rng = SmallRng::seed_from_u64(11);
        let players = lineup(&["p", "r", "117"], &mut rng).unwrap();
        assert_eq!(players.len(), 3);
        assert_eq!(players[0], Strategy::Perfect);
        assert!(Strategy::ALL.contains(&players[1]));
        assert_eq!(players[2], FH_11_7);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Strategy::Perfect.to_string(), "perfect");
        assert_eq!(Strategy::HomeV2.to_string(), "strategy_home2");
        assert_eq!(FH_11_7.to_string(), "fh_11_7");
    }
}
