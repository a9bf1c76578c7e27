use itertools::Itertools;
use log::trace;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::{Card, CardId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Deals `pairs` symbols (taken from the front of `symbols`) twice each and
    /// permutes them. The same seed always yields the same layout.
    pub fn shuffled(symbols: &[&str], pairs: usize, seed: u64) -> Self {
        let chosen = &symbols[..pairs.min(symbols.len())];
        let mut dealt: Vec<&str> = chosen.iter().chain(chosen.iter()).copied().collect();

        let mut rng = StdRng::seed_from_u64(seed);
        dealt.shuffle(&mut rng);
        trace!(target: "deck", "Dealt {} cards with seed {}", dealt.len(), seed);

        let cards = dealt
            .into_iter()
            .enumerate()
            .map(|(id, symbol)| Card::new(id, symbol))
            .collect();
        Self { cards }
    }

    /// Builds a deck in the given order without shuffling.
    pub fn from_symbols(symbols: &[&str]) -> Self {
        Self {
            cards: symbols
                .iter()
                .enumerate()
                .map(|(id, symbol)| Card::new(id, *symbol))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(id)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Every symbol appears exactly twice and ids equal positions.
    pub fn is_well_formed(&self) -> bool {
        let ids_in_place = self.cards.iter().enumerate().all(|(i, c)| c.id == i);
        let counts = self.cards.iter().map(|c| c.symbol.as_str()).counts();
        ids_in_place && self.cards.len() % 2 == 0 && counts.values().all(|&n| n == 2)
    }
}
