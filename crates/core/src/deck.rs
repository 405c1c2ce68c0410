//! Per-tier draw piles with automatic reshuffle.
//!
//! Each pile owns a permutation of indices into its tier of the catalog and a
//! cursor that counts the cards still undrawn. Drawing moves the cursor down
//! by one; nothing is removed or reallocated. When the cursor reaches zero
//! the permutation is reshuffled in place and the cursor reset to the top.
//!
//! A reshuffle is independent of the previous cycle, so the last card of one
//! cycle may come up again as the first card of the next.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::model::{Catalog, CatalogError, Difficulty, Question};

#[derive(Debug, Clone)]
struct Pile {
    order: Vec<usize>,
    cursor: usize,
    cycle: u64,
}

impl Pile {
    fn shuffled(len: usize, rng: &mut StdRng) -> Self {
        let mut pile = Self {
            order: (0..len).collect(),
            cursor: 0,
            cycle: 0,
        };
        pile.reshuffle(rng);
        pile
    }

    fn reshuffle(&mut self, rng: &mut StdRng) {
        self.order.shuffle(rng);
        self.cursor = self.order.len();
        self.cycle += 1;
    }

    fn pop(&mut self) -> Option<usize> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.order[self.cursor])
    }
}

/// Owns one draw pile per difficulty tier.
#[derive(Debug, Clone)]
pub struct DeckManager {
    catalog: Arc<Catalog>,
    piles: [Pile; 3],
    rng: StdRng,
}

impl DeckManager {
    /// Build shuffled piles for every tier using OS entropy.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyCatalog` if any tier has no questions.
    pub fn new(catalog: Arc<Catalog>) -> Result<Self, CatalogError> {
        Self::with_rng(catalog, StdRng::from_os_rng())
    }

    /// Build shuffled piles with a reproducible seed.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyCatalog` if any tier has no questions.
    pub fn seeded(catalog: Arc<Catalog>, seed: u64) -> Result<Self, CatalogError> {
        Self::with_rng(catalog, StdRng::seed_from_u64(seed))
    }

    /// Build shuffled piles with the given RNG.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyCatalog` if any tier has no questions.
    pub fn with_rng(catalog: Arc<Catalog>, mut rng: StdRng) -> Result<Self, CatalogError> {
        if let Some(tier) = Difficulty::ALL
            .into_iter()
            .find(|tier| catalog.tier(*tier).is_empty())
        {
            return Err(CatalogError::EmptyCatalog(tier));
        }

        let piles = Difficulty::ALL.map(|tier| Pile::shuffled(catalog.tier(tier).len(), &mut rng));
        Ok(Self {
            catalog,
            piles,
            rng,
        })
    }

    /// Draw the next question of `tier`, reshuffling first if the pile is empty.
    pub fn draw(&mut self, tier: Difficulty) -> Question {
        let pile = &mut self.piles[tier.index()];
        let idx = match pile.pop() {
            Some(idx) => idx,
            None => {
                pile.reshuffle(&mut self.rng);
                debug!(%tier, cycle = pile.cycle, "pile exhausted, reshuffled");
                // Tiers are non-empty, so a fresh pile always yields a card.
                pile.pop().unwrap_or_default()
            }
        };

        let question = self.catalog.tier(tier)[idx].clone();
        debug!(%tier, id = %question.id(), remaining = pile.cursor, "drew question");
        question
    }

    /// Discard every pile and start a new shuffle cycle for all tiers.
    pub fn reset(&mut self) {
        for pile in &mut self.piles {
            pile.reshuffle(&mut self.rng);
        }
    }

    /// Cards left in the current cycle of `tier`.
    #[must_use]
    pub fn remaining(&self, tier: Difficulty) -> usize {
        self.piles[tier.index()].cursor
    }

    /// Number of shuffles performed for `tier`, starting at 1.
    #[must_use]
    pub fn cycle(&self, tier: Difficulty) -> u64 {
        self.piles[tier.index()].cycle
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}
