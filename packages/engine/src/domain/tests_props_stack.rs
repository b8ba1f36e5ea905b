//! Property tests for the epidemic-seeding algorithm.
//!
//! Properties tested:
//! - The seeded stack carries exactly the requested number of epidemics
//! - Chunk windows differ in size by at most one card
//! - Every chunk window holds exactly one epidemic card
//! - The non-epidemic cards are exactly the base cards

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::card_stack::seed_epidemics;
use crate::domain::cards::{CityCard, PlayerCard};
use crate::domain::map::FieldId;
use crate::domain::plague::Plague;
use crate::domain::test_prelude;

fn base_cards(n: usize) -> Vec<PlayerCard> {
    (0..n)
        .map(|i| {
            PlayerCard::City(CityCard {
                field: FieldId(i as u16),
                plague: Plague::Amber,
            })
        })
        .collect()
}

/// Chunk sizes after seeding: `total / e` plus one for the first
/// `total % e` chunks, each plus its epidemic card.
fn chunk_sizes(total: usize, epidemics: usize) -> Vec<usize> {
    let chunk = total / epidemics;
    let remainder = total % epidemics;
    (0..epidemics)
        .map(|i| chunk + usize::from(i < remainder) + 1)
        .collect()
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: exactly E epidemics, and the non-epidemic cards are the
    /// base cards in some order.
    #[test]
    fn prop_seeding_preserves_cards(
        n in 10usize..=60,
        epidemics in 1usize..=8,
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let stack = seed_epidemics(base_cards(n), epidemics, &mut rng);

        prop_assert_eq!(stack.len(), n + epidemics);
        let epidemic_count = stack.iter().filter(|c| c.is_epidemic()).count();
        prop_assert_eq!(epidemic_count, epidemics);

        let mut rest: Vec<PlayerCard> =
            stack.iter().filter(|c| !c.is_epidemic()).copied().collect();
        let mut expected = base_cards(n);
        rest.sort_by_key(|c| c.as_city().map(|city| city.field));
        expected.sort_by_key(|c| c.as_city().map(|city| city.field));
        prop_assert_eq!(rest, expected);
    }

    /// Property: every chunk window of the final stack holds exactly one
    /// epidemic card, and window sizes differ by at most one.
    #[test]
    fn prop_one_epidemic_per_chunk(
        n in 10usize..=60,
        epidemics in 1usize..=8,
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let stack = seed_epidemics(base_cards(n), epidemics, &mut rng);

        let sizes = chunk_sizes(n, epidemics);
        let min = sizes.iter().min().copied().unwrap_or(0);
        let max = sizes.iter().max().copied().unwrap_or(0);
        prop_assert!(max - min <= 1);

        let cards: Vec<PlayerCard> = stack.iter().copied().collect();
        let mut offset = 0;
        for size in sizes {
            let window = &cards[offset..offset + size];
            let count = window.iter().filter(|c| c.is_epidemic()).count();
            prop_assert_eq!(count, 1, "window at {} must hold one epidemic", offset);
            offset += size;
        }
        prop_assert_eq!(offset, cards.len());
    }

    /// Property: difficulty zero (no epidemics) is just the shuffled base.
    #[test]
    fn prop_zero_epidemics_is_plain_shuffle(
        n in 1usize..=40,
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let stack = seed_epidemics(base_cards(n), 0, &mut rng);
        prop_assert_eq!(stack.len(), n);
        prop_assert!(stack.iter().all(|c| !c.is_epidemic()));
    }
}
