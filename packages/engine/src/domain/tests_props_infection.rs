//! Property tests for the infection cascade.
//!
//! Properties tested:
//! - Cube conservation: pool + map always equals the initial pool size
//! - Termination on arbitrary cyclic graphs, with the outbreak counter
//!   rising by at most the field count per call
//! - Non-executable actions never mutate state

use proptest::prelude::*;

use crate::domain::actions::{Action, ActionKind};
use crate::domain::game::{Game, GameConfig};
use crate::domain::map::{FieldId, GameMap};
use crate::domain::plague::Plague;
use crate::domain::rules::{Difficulty, CUBES_PER_PLAGUE};
use crate::domain::snapshot::snapshot;
use crate::domain::test_game_helpers::{ai, two_player_game};
use crate::domain::test_gens;
use crate::domain::test_prelude;

fn assert_conservation(game: &Game) {
    for plague in Plague::ALL {
        assert_eq!(
            u32::from(game.cubes_remaining(plague)) + game.map().cubes_on_map(plague),
            u32::from(CUBES_PER_PLAGUE),
            "cubes of {plague:?} are moved, never created or destroyed"
        );
    }
}

/// A connected graph of `n` fields: a ring plus arbitrary chords.
fn chordal_map(n: u16, chords: &[(u16, u16)]) -> GameMap {
    let cities = (0..n)
        .map(|i| (format!("city-{i}"), Plague::Amber))
        .collect();
    let mut edges: Vec<(u16, u16)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    edges.extend(
        chords
            .iter()
            .filter(|(a, b)| a != b)
            .map(|&(a, b)| (a % n, b % n))
            .filter(|(a, b)| a != b),
    );
    GameMap::new(cities, &edges, FieldId(0)).expect("chordal map builds")
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: any sequence of infections and cures conserves cubes.
    #[test]
    fn prop_cube_conservation(
        seed in test_gens::seed(),
        ops in prop::collection::vec(
            (0u16..24, test_gens::plague(), any::<bool>()),
            1..80,
        ),
    ) {
        let mut game = two_player_game(seed);
        assert_conservation(&game);

        for (field, plague, infect) in ops {
            let field = FieldId(field);
            let result = if infect {
                game.infect_field(field, plague).map(|_| ())
            } else {
                game.cure_field(field, plague)
            };
            // Errors (no cubes to cure, game already lost) are fine; the
            // invariant must hold regardless.
            let _ = result;
            assert_conservation(&game);
        }
    }

    /// Property: a single infection call terminates on any finite cyclic
    /// graph and raises the outbreak counter by at most the field count.
    #[test]
    fn prop_cascade_terminates_on_cyclic_graphs(
        n in 9u16..=16,
        chords in prop::collection::vec((any::<u16>(), any::<u16>()), 0..10),
        origins in prop::collection::vec(any::<u16>(), 1..12),
        seed in test_gens::seed(),
    ) {
        let map = chordal_map(n, &chords);
        let mut game = Game::new(GameConfig {
            difficulty: Difficulty::Easy,
            seed,
            players: vec![ai("a"), ai("b")],
            map: Some(map),
        }).expect("game builds");

        for origin in origins {
            if game.is_lost() {
                break;
            }
            let before = game.outbreak_level();
            let record = game
                .infect_field(FieldId(origin % n), Plague::Cobalt)
                .expect("cascade resolves");
            let after = game.outbreak_level();

            prop_assert!(u32::from(after - before) <= u32::from(n));
            prop_assert!(record.outbreaks.len() <= usize::from(n));
            prop_assert!(record.placements.len() <= usize::from(n));
            assert_conservation(&game);
        }
    }

    /// Property: executing a non-executable action fails and leaves the
    /// whole game state untouched.
    #[test]
    fn prop_refused_actions_never_mutate(
        seed in test_gens::seed(),
        target in 0u16..24,
        plague in test_gens::plague(),
        wrong_actor in prop::bool::ANY,
    ) {
        let mut game = two_player_game(seed);
        let actor = if wrong_actor {
            game.players()[1].id
        } else {
            game.current_player().id
        };

        // Cure on a field the actor does not stand on (or out of turn):
        // never executable at game start for a fresh non-home plague.
        let action = Action::new(actor, ActionKind::Cure { plague });
        let executable = action.is_executable(&game);
        let before = snapshot(&game);
        let result = game.perform_action(&action);

        if !executable {
            prop_assert!(result.is_err());
            prop_assert_eq!(snapshot(&game), before);
        }

        // A move to an arbitrary non-adjacent field must behave the same.
        let start = game.map().start_field();
        let target = FieldId(target);
        if !game.map().are_adjacent(start, target) {
            let action = Action::new(
                game.current_player().id,
                ActionKind::DriveFerry { target },
            );
            let before = snapshot(&game);
            if !action.is_executable(&game) {
                prop_assert!(game.perform_action(&action).is_err());
                prop_assert_eq!(snapshot(&game), before);
            }
        }
    }
}
