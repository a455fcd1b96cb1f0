//! Deck model: a shrinking, shuffled multiset of 52 rank-only cards
//!
//! The deck owns the per-rank remaining counts and updates them on every
//! draw, so strategies read probabilities from the same structure the game
//! draws from.

use crate::card::{Card, RANKS};
use crate::error::{CrintonError, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// Copies of each rank in a fresh deck.
pub const COPIES: u8 = 4;

/// Cards in a fresh deck.
pub const DECK_SIZE: usize = RANKS as usize * COPIES as usize;

/// Remaining size at which the deck is replaced before a hand.
pub const RESHUFFLE_AT: usize = 4;

/// Ordered multiset of remaining cards plus a rank → count index.
#[derive(Debug, Clone)]
pub struct Deck {
    /// Remaining cards; the next card drawn is the last element.
    cards: Vec<Card>,
    /// counts[rank] for rank 1-13. Slot 0 is unused.
    counts: [u8; RANKS as usize + 1],
}

impl Deck {
    /// A uniformly shuffled fresh deck (Fisher-Yates via `SliceRandom`).
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards: Vec<Card> = (0..COPIES).flat_map(|_| Card::all()).collect();
        cards.shuffle(rng);
        Self::from_draw_order(cards)
    }

    /// A deck that yields `order[0]` first, `order[1]` second, and so on.
    ///
    /// Used to replay fixed card sequences.
    pub fn stacked(order: &[Card]) -> Self {
        Self::from_draw_order(order.to_vec())
    }

    fn from_draw_order(mut cards: Vec<Card>) -> Self {
        cards.reverse();
        let mut counts = [0u8; RANKS as usize + 1];
        for card in &cards {
            counts[card.rank() as usize] += 1;
        }
        Deck { cards, counts }
    }

    /// Remove and return the next card.
    pub fn draw(&mut self) -> Result<Card> {
        let card = self.cards.pop().ok_or(CrintonError::DeckUnderflow {
            requested: 1,
            remaining: 0,
        })?;
        self.counts[card.rank() as usize] -= 1;
        Ok(card)
    }

    /// Remove and return the next two cards, failing before drawing either
    /// if fewer than two remain.
    pub fn draw_pair(&mut self) -> Result<(Card, Card)> {
        if self.cards.len() < 2 {
            return Err(CrintonError::DeckUnderflow {
                requested: 2,
                remaining: self.cards.len(),
            });
        }
        Ok((self.draw()?, self.draw()?))
    }

    /// How many cards of `rank` remain. Ranks outside 1-13 (such as the
    /// promoted Ace post, 14) always report zero.
    pub fn remaining_count(&self, rank: u8) -> u8 {
        self.counts.get(rank as usize).copied().unwrap_or(0)
    }

    /// Replace the deck with a fresh shuffle if exactly `RESHUFFLE_AT` cards
    /// remain. Returns whether a reshuffle happened.
    pub fn reshuffle_if_low<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.cards.len() == RESHUFFLE_AT {
            *self = Deck::new(rng);
            true
        } else {
            false
        }
    }

    /// Number of cards remaining
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the deck is exhausted
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
