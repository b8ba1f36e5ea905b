//! Shuffle-and-draw card container, used identically for player cards and
//! infection cards, plus the epidemic-seeding algorithm for the player
//! draw stack.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::cards::PlayerCard;
use crate::errors::domain::{DomainError, ValidationKind};

/// Ordered card container. The back of the vector is the top of the stack;
/// the only ordering guarantee is "top of stack = next drawn".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardStack<T> {
    cards: Vec<T>,
}

impl<T> Default for CardStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CardStack<T> {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Build a stack from bottom-to-top card order.
    pub fn from_cards(cards: Vec<T>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Put one card on top.
    pub fn push(&mut self, card: T) {
        self.cards.push(card);
    }

    /// Remove and return the top card.
    pub fn pop(&mut self) -> Result<T, DomainError> {
        self.cards
            .pop()
            .ok_or_else(|| DomainError::validation(ValidationKind::EmptyStack, "stack is empty"))
    }

    /// Top `n` cards without removing them; the first yielded card is the
    /// next one drawn.
    pub fn peek_top(&self, n: usize) -> impl Iterator<Item = &T> {
        self.cards.iter().rev().take(n)
    }

    /// Add cards on top, in iteration order (the last card added ends up
    /// topmost).
    pub fn add_all(&mut self, cards: impl IntoIterator<Item = T>) {
        self.cards.extend(cards);
    }

    /// Drain the whole stack, bottom-to-top order.
    pub fn take_all(&mut self) -> Vec<T> {
        std::mem::take(&mut self.cards)
    }

    /// Remove the first card matching `pred`, scanning from the top.
    pub fn remove_first(&mut self, mut pred: impl FnMut(&T) -> bool) -> Option<T> {
        let idx = self.cards.iter().rposition(|c| pred(c))?;
        Some(self.cards.remove(idx))
    }

    /// Uniform random permutation.
    pub fn shuffle(&mut self, rng: &mut (impl Rng + ?Sized)) {
        self.cards.shuffle(rng);
    }

    /// Bottom-to-top iteration.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cards.iter()
    }
}

/// Build the final player draw stack with epidemic cards seeded into it.
///
/// The base stack (all city and event cards minus the dealt starting hands)
/// is shuffled once, split into `epidemic_cards` contiguous sub-stacks whose
/// sizes differ by at most one card (`total / e` each, remainder distributed
/// to the first `total % e`), one epidemic card is pushed onto each
/// sub-stack, every sub-stack is shuffled independently, and the sub-stacks
/// are concatenated in their original order. Net effect: every chunk of the
/// draw pile holds exactly one epidemic card, with chunks shrinking as the
/// difficulty adds epidemics.
pub fn seed_epidemics(
    mut base: Vec<PlayerCard>,
    epidemic_cards: usize,
    rng: &mut (impl Rng + ?Sized),
) -> CardStack<PlayerCard> {
    base.shuffle(rng);
    if epidemic_cards == 0 {
        return CardStack::from_cards(base);
    }

    let total = base.len();
    let chunk = total / epidemic_cards;
    let remainder = total % epidemic_cards;

    let mut stacked = Vec::with_capacity(total + epidemic_cards);
    let mut start = 0;
    for i in 0..epidemic_cards {
        let size = chunk + usize::from(i < remainder);
        let mut sub = base[start..start + size].to_vec();
        start += size;
        sub.push(PlayerCard::Epidemic);
        sub.shuffle(rng);
        stacked.extend(sub);
    }
    CardStack::from_cards(stacked)
}
