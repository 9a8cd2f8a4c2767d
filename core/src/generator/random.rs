use super::*;

/// Uniformly random arrangement (Fisher–Yates over every slot) driven by a
/// seeded [`rand::rngs::SmallRng`] so a board can be reproduced from its seed.
#[derive(Clone, Debug)]
pub struct RandomBoardGenerator {
    rng: rand::rngs::SmallRng,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        use rand::prelude::*;
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(
        &mut self,
        profile: &DifficultyProfile,
        symbol_pool: &[Symbol],
        metrics: BoardMetrics,
    ) -> Result<Vec<Card>> {
        use rand::prelude::*;

        let total_cards = profile.total_cards();
        if total_cards < 4 || total_cards % 2 != 0 {
            return Err(GameError::InvalidGridShape);
        }

        // The first `pair_count` distinct symbols, in pool order, decide which
        // faces this grid size shows.
        let pair_count = profile.pair_count() as usize;
        let mut faces: Vec<Symbol> = Vec::with_capacity(pair_count);
        for &symbol in symbol_pool {
            if faces.contains(&symbol) {
                continue;
            }
            faces.push(symbol);
            if faces.len() == pair_count {
                break;
            }
        }
        if faces.len() < pair_count {
            log::warn!(
                "symbol pool exhausted, needed {} distinct symbols but found {}",
                pair_count,
                faces.len()
            );
            return Err(GameError::InsufficientSymbols);
        }

        let mut symbols: Vec<Symbol> = Vec::with_capacity(total_cards as usize);
        symbols.extend_from_slice(&faces);
        symbols.extend_from_slice(&faces);
        symbols.shuffle(&mut self.rng);

        let cols = profile.cols as usize;
        let card_width = (metrics.width - 2.0 * BOARD_MARGIN
            - (profile.cols - 1) as f32 * CARD_GUTTER)
            / profile.cols as f32;
        let card_height = (metrics.height - 2.0 * BOARD_MARGIN
            - (profile.rows - 1) as f32 * CARD_GUTTER)
            / profile.rows as f32;

        let mut cards = Vec::with_capacity(total_cards as usize);
        for (index, symbol) in symbols.into_iter().enumerate() {
            let row = (index / cols) as Coord;
            let col = (index % cols) as Coord;
            let rect = CellRect::new(
                BOARD_MARGIN + col as f32 * (card_width + CARD_GUTTER),
                BOARD_MARGIN + row as f32 * (card_height + CARD_GUTTER),
                card_width,
                card_height,
            );
            cards.push(Card {
                id: index as CardId,
                symbol,
                row,
                col,
                rect,
                revealed: false,
                matched: false,
            });
        }

        log::debug!(
            "generated {} cards ({} pairs) for {}",
            cards.len(),
            pair_count,
            profile.name
        );
        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;

    fn generate(difficulty: Difficulty) -> Vec<Card> {
        RandomBoardGenerator::new(42)
            .generate(
                &difficulty.profile(),
                DEFAULT_SYMBOL_POOL,
                BoardMetrics::default(),
            )
            .unwrap()
    }

    #[test]
    fn deals_every_symbol_exactly_twice() {
        for difficulty in Difficulty::ALL {
            let profile = difficulty.profile();
            let cards = generate(difficulty);
            assert_eq!(cards.len(), profile.total_cards() as usize);

            let mut counts: BTreeMap<Symbol, u32> = BTreeMap::new();
            for card in &cards {
                *counts.entry(card.symbol).or_insert(0) += 1;
            }
            assert_eq!(counts.len(), profile.pair_count() as usize);
            assert!(counts.values().all(|&count| count == 2));
        }
    }

    #[test]
    fn cards_are_numbered_in_row_major_order() {
        let cards = generate(Difficulty::Medium);
        let cols = Difficulty::Medium.profile().cols as usize;

        for (index, card) in cards.iter().enumerate() {
            assert_eq!(card.id as usize, index);
            assert_eq!(card.row as usize, index / cols);
            assert_eq!(card.col as usize, index % cols);
            assert!(!card.revealed && !card.matched);
        }
    }

    #[test]
    fn rects_stay_inside_the_surface_and_never_overlap() {
        let metrics = BoardMetrics::default();
        let cards = generate(Difficulty::Expert);

        for card in &cards {
            assert!(card.rect.x >= BOARD_MARGIN);
            assert!(card.rect.y >= BOARD_MARGIN);
            assert!(card.rect.x + card.rect.width <= metrics.width - BOARD_MARGIN + 0.001);
            assert!(card.rect.y + card.rect.height <= metrics.height - BOARD_MARGIN + 0.001);
        }

        for a in &cards {
            for b in &cards {
                if a.id != b.id {
                    assert!(!a.rect.intersects(&b.rect), "{} overlaps {}", a.id, b.id);
                }
            }
        }
    }

    #[test]
    fn short_pool_is_rejected() {
        let result = RandomBoardGenerator::new(42).generate(
            &Difficulty::Hard.profile(),
            &['🎈', '🎲', '🎧'],
            BoardMetrics::default(),
        );
        assert_eq!(result, Err(GameError::InsufficientSymbols));
    }

    #[test]
    fn duplicate_pool_entries_do_not_count_twice() {
        // 4 entries but only 2 distinct symbols, easy needs 3 pairs
        let result = RandomBoardGenerator::new(42).generate(
            &Difficulty::Easy.profile(),
            &['🎈', '🎈', '🎲', '🎲'],
            BoardMetrics::default(),
        );
        assert_eq!(result, Err(GameError::InsufficientSymbols));
    }

    #[test]
    fn degenerate_profiles_are_rejected() {
        let profile = DifficultyProfile::new_unchecked("broken", 1, 3, 30);
        let result = RandomBoardGenerator::new(42).generate(
            &profile,
            DEFAULT_SYMBOL_POOL,
            BoardMetrics::default(),
        );
        assert_eq!(result, Err(GameError::InvalidGridShape));
    }

    #[test]
    fn same_seed_reproduces_the_same_board() {
        let first = generate(Difficulty::Expert);
        let second = generate(Difficulty::Expert);
        assert_eq!(first, second);
    }

    #[test]
    fn consecutive_boards_from_one_generator_differ() {
        let mut generator = RandomBoardGenerator::new(42);
        let profile = Difficulty::Expert.profile();
        let first = generator
            .generate(&profile, DEFAULT_SYMBOL_POOL, BoardMetrics::default())
            .unwrap();
        let second = generator
            .generate(&profile, DEFAULT_SYMBOL_POOL, BoardMetrics::default())
            .unwrap();

        let faces = |cards: &[Card]| cards.iter().map(|card| card.symbol).collect::<Vec<_>>();
        assert_ne!(faces(&first), faces(&second));
    }
}
