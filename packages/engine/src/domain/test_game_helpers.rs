//! Test-only game builders for domain unit tests.

use crate::domain::actions::{Action, ActionKind};
use crate::domain::cards::{CityCard, EventCard, PlayerCard};
use crate::domain::game::{Game, GameConfig};
use crate::domain::map::{FieldId, GameMap};
use crate::domain::plague::Plague;
use crate::domain::player::{PlayerId, PlayerIdentity};
use crate::domain::rules::Difficulty;

pub fn ai(name: &str) -> PlayerIdentity {
    PlayerIdentity::Ai {
        display_name: name.into(),
    }
}

/// Build a game on the default map with AI players.
pub fn new_game(players: usize, difficulty: Difficulty, seed: u64) -> Game {
    let identities = (0..players).map(|i| ai(&format!("bot-{i}"))).collect();
    Game::new(GameConfig {
        difficulty,
        seed,
        players: identities,
        map: None,
    })
    .expect("game builds")
}

pub fn two_player_game(seed: u64) -> Game {
    new_game(2, Difficulty::Easy, seed)
}

/// Ring of `n` cities, all Amber; field 0 is the start. Tests that need
/// full cube control infect a non-Amber plague: setup never places one.
pub fn ring_map(n: u16) -> GameMap {
    let cities = (0..n).map(|i| (format!("city-{i}"), Plague::Amber)).collect();
    let edges: Vec<(u16, u16)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    GameMap::new(cities, &edges, FieldId(0)).expect("ring map builds")
}

/// Two-player Easy game on a ring map.
pub fn ring_game(n: u16, seed: u64) -> Game {
    Game::new(GameConfig {
        difficulty: Difficulty::Easy,
        seed,
        players: vec![ai("bot-0"), ai("bot-1")],
        map: Some(ring_map(n)),
    })
    .expect("ring game builds")
}

/// Hand the player a city card for `field` (home plague of that field).
pub fn give_city_card(game: &mut Game, player: PlayerId, field: FieldId) -> CityCard {
    let plague = game.map().field(field).unwrap().home_plague;
    let card = CityCard { field, plague };
    game.player_mut(player).unwrap().add_card(PlayerCard::City(card));
    card
}

/// Hand the player an event card.
pub fn give_event_card(game: &mut Game, player: PlayerId, event: EventCard) {
    game.player_mut(player)
        .unwrap()
        .add_card(PlayerCard::Event(event));
}

/// Spend the whole action budget doing nothing.
pub fn waive_into_draw_phase(game: &mut Game) {
    let action = Action::new(game.current_player().id, ActionKind::Waive);
    game.perform_action(&action).expect("waive");
}

/// Drive the game into the infection phase of the current turn.
pub fn into_infection_phase(game: &mut Game) {
    waive_into_draw_phase(game);
    while game.current_turn().player_draws_left() > 0 {
        game.draw_player_card().expect("player draw");
    }
}
