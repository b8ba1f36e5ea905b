//! Action capability contract: availability, executability, execution, and
//! the guarantee that a refused execute mutates nothing.

use crate::domain::actions::{Action, ActionKind};
use crate::domain::cards::PlayerCard;
use crate::domain::map::FieldId;
use crate::domain::plague::{Plague, PlagueStatus};
use crate::domain::rules::MAX_CUBES_PER_FIELD;
use crate::domain::snapshot::snapshot;
use crate::domain::test_game_helpers::{give_city_card, two_player_game};
use crate::domain::turn::TurnPhase;
use crate::errors::domain::ValidationKind;

#[test]
fn drive_ferry_moves_and_spends_an_action() {
    let mut game = two_player_game(21);
    let actor = game.current_player().id;
    let start = game.map().start_field();
    let target = game.map().neighbors(start)[0];

    let action = Action::new(actor, ActionKind::DriveFerry { target });
    assert!(action.is_available(&game));
    assert!(action.is_executable(&game));

    let phase = game.perform_action(&action).unwrap();
    assert_eq!(game.player(actor).unwrap().field, target);
    assert_eq!(game.current_turn().actions_left(), 3);
    assert_eq!(phase, TurnPhase::Actions);
}

#[test]
fn non_executable_actions_fail_without_mutating() {
    let mut game = two_player_game(22);
    let actor = game.current_player().id;
    let start = game.map().start_field();

    // A field that is not adjacent to the start field.
    let far = game
        .map()
        .fields()
        .iter()
        .map(|f| f.id)
        .find(|&id| id != start && !game.map().are_adjacent(start, id))
        .unwrap();

    let action = Action::new(actor, ActionKind::DriveFerry { target: far });
    assert!(!action.is_executable(&game));

    let before = snapshot(&game);
    let err = game.perform_action(&action).unwrap_err();
    assert_eq!(err.kind(), Some(&ValidationKind::NotExecutable));
    assert_eq!(snapshot(&game), before, "refused execute must not mutate");
}

#[test]
fn acting_out_of_turn_is_refused() {
    let mut game = two_player_game(23);
    let other = game.players()[1].id;
    let start = game.map().start_field();
    let target = game.map().neighbors(start)[0];

    let action = Action::new(other, ActionKind::DriveFerry { target });
    let before = snapshot(&game);
    let err = game.perform_action(&action).unwrap_err();
    assert_eq!(err.kind(), Some(&ValidationKind::NotExecutable));
    assert_eq!(snapshot(&game), before);
}

#[test]
fn direct_flight_discards_the_card_and_moves() {
    let mut game = two_player_game(24);
    let actor = game.current_player().id;
    let card = give_city_card(&mut game, actor, FieldId(17));

    let action = Action::new(actor, ActionKind::DirectFlight { card });
    game.perform_action(&action).unwrap();

    assert_eq!(game.player(actor).unwrap().field, FieldId(17));
    assert!(!game.player(actor).unwrap().holds(&PlayerCard::City(card)));
    assert!(game
        .player_discard()
        .iter()
        .any(|c| c == &PlayerCard::City(card)));
}

#[test]
fn charter_flight_discards_the_current_city_card() {
    let mut game = two_player_game(25);
    let actor = game.current_player().id;
    let start = game.map().start_field();
    let card = give_city_card(&mut game, actor, start);

    let action = Action::new(actor, ActionKind::CharterFlight { target: FieldId(19) });
    game.perform_action(&action).unwrap();

    assert_eq!(game.player(actor).unwrap().field, FieldId(19));
    assert!(game
        .player_discard()
        .iter()
        .any(|c| c == &PlayerCard::City(card)));
}

#[test]
fn shuttle_flight_needs_laboratories_on_both_ends() {
    let mut game = two_player_game(26);
    let actor = game.current_player().id;
    let target = FieldId(20);

    let action = Action::new(actor, ActionKind::ShuttleFlight { target });
    assert!(!action.is_available(&game), "only one laboratory exists yet");

    game.build_laboratory(target).unwrap();
    assert!(action.is_executable(&game));
    game.perform_action(&action).unwrap();
    assert_eq!(game.player(actor).unwrap().field, target);
}

#[test]
fn cure_removes_one_cube_without_an_antidote() {
    let mut game = two_player_game(27);
    let actor = game.current_player().id;
    let start = game.map().start_field();

    // Sable is never seeded on the Cobalt start field.
    for _ in 0..2 {
        game.infect_field(start, Plague::Sable).unwrap();
    }

    let action = Action::new(actor, ActionKind::Cure { plague: Plague::Sable });
    game.perform_action(&action).unwrap();
    assert_eq!(game.map().field(start).unwrap().cubes_of(Plague::Sable), 1);
    assert_eq!(game.current_turn().actions_left(), 3);
}

#[test]
fn cure_clears_the_field_once_the_antidote_exists() {
    let mut game = two_player_game(28);
    let actor = game.current_player().id;
    let start = game.map().start_field();
    for _ in 0..MAX_CUBES_PER_FIELD {
        game.infect_field(start, Plague::Sable).unwrap();
    }
    game.place_antidote(Plague::Sable);

    let action = Action::new(actor, ActionKind::Cure { plague: Plague::Sable });
    game.perform_action(&action).unwrap();
    assert_eq!(game.map().field(start).unwrap().cubes_of(Plague::Sable), 0);
    assert_eq!(game.current_turn().actions_left(), 3, "one action, all cubes");
}

#[test]
fn build_laboratory_consumes_the_city_card_and_pool() {
    let mut game = two_player_game(29);
    let actor = game.current_player().id;
    let site = FieldId(13);
    game.move_player(actor, site).unwrap();
    give_city_card(&mut game, actor, site);
    let labs_before = game.laboratories_left();

    let action = Action::new(actor, ActionKind::BuildLaboratory);
    assert!(action.is_available(&game));
    game.perform_action(&action).unwrap();

    assert!(game.map().field(site).unwrap().has_laboratory);
    assert_eq!(game.laboratories_left(), labs_before - 1);

    // Without the city card the action is not even available.
    let again = Action::new(actor, ActionKind::BuildLaboratory);
    assert!(!again.is_available(&game));
}

#[test]
fn discover_antidote_needs_five_matching_cards_at_a_laboratory() {
    let mut game = two_player_game(30);
    let actor = game.current_player().id;

    // Five Cobalt city cards; the player already stands on the start
    // laboratory.
    let cards: Vec<_> = (0..5u16)
        .map(|i| give_city_card(&mut game, actor, FieldId(i)))
        .collect();

    let action = Action::new(
        actor,
        ActionKind::DiscoverAntidote {
            plague: Plague::Cobalt,
            cards: cards.clone(),
        },
    );
    assert!(action.is_executable(&game));
    game.perform_action(&action).unwrap();

    assert_ne!(game.plague_status(Plague::Cobalt), PlagueStatus::Active);
    for card in &cards {
        assert!(!game.player(actor).unwrap().holds(&PlayerCard::City(*card)));
    }

    // A second discovery of the same plague is refused.
    let cards: Vec<_> = (0..5u16)
        .map(|i| give_city_card(&mut game, actor, FieldId(i)))
        .collect();
    let again = Action::new(
        actor,
        ActionKind::DiscoverAntidote {
            plague: Plague::Cobalt,
            cards,
        },
    );
    assert!(!again.is_executable(&game));
}

#[test]
fn discover_antidote_rejects_duplicate_cards() {
    let mut game = two_player_game(31);
    let actor = game.current_player().id;
    let card = give_city_card(&mut game, actor, FieldId(1));

    let action = Action::new(
        actor,
        ActionKind::DiscoverAntidote {
            plague: Plague::Cobalt,
            cards: vec![card; 5],
        },
    );
    assert!(!action.is_executable(&game));
}

#[test]
fn waive_forfeits_the_remaining_budget() {
    let mut game = two_player_game(32);
    let actor = game.current_player().id;
    let start = game.map().start_field();
    let neighbor = game.map().neighbors(start)[0];

    game.perform_action(&Action::new(actor, ActionKind::DriveFerry { target: neighbor }))
        .unwrap();
    let phase = game
        .perform_action(&Action::new(actor, ActionKind::Waive))
        .unwrap();
    assert_eq!(phase, TurnPhase::PlayerDraw);
    assert_eq!(game.current_turn().actions_left(), 0);
}

#[test]
fn budget_exhaustion_stops_further_actions() {
    let mut game = two_player_game(33);
    let actor = game.current_player().id;
    let start = game.map().start_field();
    let neighbor = game.map().neighbors(start)[0];

    // Shuttle back and forth until the budget is gone.
    for i in 0..4 {
        let target = if i % 2 == 0 { neighbor } else { start };
        game.perform_action(&Action::new(actor, ActionKind::DriveFerry { target }))
            .unwrap();
    }
    assert_eq!(game.current_turn().phase(), TurnPhase::PlayerDraw);

    let err = game
        .perform_action(&Action::new(actor, ActionKind::DriveFerry { target: neighbor }))
        .unwrap_err();
    assert_eq!(err.kind(), Some(&ValidationKind::NotExecutable));
}

#[test]
fn card_transfers_never_execute_without_approval() {
    let mut game = two_player_game(34);
    let actor = game.current_player().id;
    let receiver = game.players()[1].id;
    let start = game.map().start_field();
    let card = give_city_card(&mut game, actor, start);

    // Both players stand on the start field and the card matches it, yet
    // direct execution is refused: consent is missing by construction.
    let action = Action::new(actor, ActionKind::SendCard { receiver, card });
    assert!(action.is_available(&game));
    assert!(!action.is_executable(&game));

    let before = snapshot(&game);
    let err = game.perform_action(&action).unwrap_err();
    assert_eq!(err.kind(), Some(&ValidationKind::NotExecutable));
    assert_eq!(snapshot(&game), before);
}
