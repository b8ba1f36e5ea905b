use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Actions a player may execute before the forced draw phases begin.
pub const ACTIONS_PER_TURN: u8 = 4;
/// Player cards drawn in the draw phase of every turn.
pub const PLAYER_CARDS_PER_TURN: u8 = 2;
/// Hand cards a player may hold entering the infection phase.
pub const MAX_HAND_CARDS: usize = 7;

/// Shared cube pool size per plague.
pub const CUBES_PER_PLAGUE: u8 = 24;
/// Cubes of one plague a single field can hold before it breaks out.
pub const MAX_CUBES_PER_FIELD: u8 = 3;
/// Research laboratories available over the whole game.
pub const LABORATORIES: u8 = 6;
/// Outbreak level at which the game is lost.
pub const MAX_OUTBREAKS: u8 = 8;
/// City cards of one plague required to discover its antidote.
pub const CARDS_FOR_ANTIDOTE: usize = 5;
/// Infection cards the Forecast event peeks at and reorders.
pub const FORECAST_CARDS: usize = 6;

/// Infection cards drawn per turn, indexed by infection level. The level
/// rises by one per epidemic and saturates at the end of the track.
pub const INFECTION_RATE_TRACK: [u8; 7] = [2, 2, 2, 3, 3, 4, 4];

/// Initial infection: three waves of three distinct cities, placing
/// 3, 2 and 1 cubes per city respectively.
pub const INITIAL_INFECTION_WAVES: [u8; 3] = [3, 2, 1];
/// Cities infected per setup wave.
pub const CITIES_PER_INFECTION_WAVE: usize = 3;

pub fn valid_player_range() -> RangeInclusive<usize> {
    MIN_PLAYERS..=MAX_PLAYERS
}

/// Starting hand size by player count: 2 → 4, 3 → 3, 4 → 2.
pub fn starting_hand_size(player_count: usize) -> Option<u8> {
    match player_count {
        2 => Some(4),
        3 => Some(3),
        4 => Some(2),
        _ => None,
    }
}

/// Infection cards drawn per turn at the given infection level.
pub fn infection_rate(level: usize) -> u8 {
    let idx = level.min(INFECTION_RATE_TRACK.len() - 1);
    INFECTION_RATE_TRACK[idx]
}

/// Game difficulty, expressed as the number of epidemic cards seeded into
/// the player draw stack.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Normal,
    Heroic,
}

impl Difficulty {
    pub fn epidemic_cards(self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Normal => 5,
            Difficulty::Heroic => 6,
        }
    }
}
