//! Card and fence definitions
//!
//! Crinton ignores suits entirely: a card is just its rank. The two fence
//! cards drawn at the start of a hand define the winning range for the
//! middle card.

/// Number of distinct ranks in the deck (Ace through King).
pub const RANKS: u8 = 13;

/// Rank an Ace-Ace fence uses for its right post.
pub const HIGH_ACE: u8 = RANKS + 1;

/// A playing card identified by rank only (1 = Ace, 11 = Jack, 12 = Queen, 13 = King).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card(u8);

impl Card {
    /// Create a new card from a rank 1-13
    pub fn new(rank: u8) -> Self {
        assert!((1..=RANKS).contains(&rank), "Card rank must be 1-13");
        Card(rank)
    }

    /// Get the raw rank (1-13)
    pub fn rank(self) -> u8 {
        self.0
    }

    /// Every rank once, Ace first.
    pub fn all() -> impl Iterator<Item = Card> {
        (1..=RANKS).map(Card)
    }
}

/// The normalized pair of fence cards for one hand.
///
/// Invariant: `left <= right`. Two Aces become `(1, 14)` so the fence spans the
/// whole rank range; any other pair keeps its ranks, sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fence {
    left: u8,
    right: u8,
}

impl Fence {
    /// Build a fence from the two cards in the order they were drawn.
    pub fn new(first: Card, second: Card) -> Self {
        let (a, b) = (first.rank(), second.rank());
        if a == 1 && b == 1 {
            return Fence { left: 1, right: HIGH_ACE };
        }
        Fence {
            left: a.min(b),
            right: a.max(b),
        }
    }

    /// Low post rank
    pub fn left(self) -> u8 {
        self.left
    }

    /// High post rank (14 for an Ace pair)
    pub fn right(self) -> u8 {
        self.right
    }

    /// Span of the fence, used by the heuristic strategies.
    pub fn gap(self) -> u8 {
        self.right - self.left
    }

    /// Ranks strictly between the posts. Empty for pairs and adjacent ranks.
    pub fn inside(self) -> impl Iterator<Item = u8> {
        (self.left + 1)..self.right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_sorts_posts() {
        let fence = Fence::new(Card::new(13), Card::new(5));
        assert_eq!(fence.left(), 5);
        assert_eq!(fence.right(), 13);
        assert_eq!(fence.gap(), 8);
    }

    #[test]
    fn test_ace_pair_spans_full_range() {
        let fence = Fence::new(Card::new(1), Card::new(1));
        assert_eq!((fence.left(), fence.right()), (1, 14));
        assert_eq!(fence.gap(), 13);
        assert_eq!(fence.inside().count(), 12);
    }

    #[test]
    fn test_other_pairs_have_no_inside() {
        let fence = Fence::new(Card::new(7), Card::new(7));
        assert_eq!(fence.gap(), 0);
        assert_eq!(fence.inside().count(), 0);
    }

    #[test]
    fn test_ace_with_king_is_not_promoted() {
        let fence = Fence::new(Card::new(13), Card::new(1));
        assert_eq!((fence.left(), fence.right()), (1, 13));
    }

    #[test]
    #[should_panic(expected = "Card rank must be 1-13")]
    fn test_card_rank_out_of_range() {
        Card::new(14);
    }
}
