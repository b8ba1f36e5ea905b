//! Plague strains, cubes, and the finite shared cube pools.

use serde::{Deserialize, Serialize};

use crate::domain::rules::CUBES_PER_PLAGUE;

/// The four plague strains. Fixed set, never extended at runtime.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plague {
    Amber,
    Cobalt,
    Sable,
    Viridian,
}

impl Plague {
    pub const COUNT: usize = 4;
    pub const ALL: [Plague; Plague::COUNT] =
        [Plague::Amber, Plague::Cobalt, Plague::Sable, Plague::Viridian];

    /// Stable index into per-plague arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A single unit of infection of one plague. Cubes are moved between the
/// pool and the map, never created or destroyed after setup.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlagueCube {
    pub plague: Plague,
}

/// Antidote progress per plague.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlagueStatus {
    /// No antidote yet.
    Active,
    /// Antidote marker placed.
    Cured,
    /// Antidote placed and zero cubes anywhere on the map.
    Exterminated,
}

/// Finite per-plague cube reserves, owned exclusively by the game aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubePool {
    remaining: [u8; Plague::COUNT],
}

impl CubePool {
    pub fn full() -> Self {
        Self {
            remaining: [CUBES_PER_PLAGUE; Plague::COUNT],
        }
    }

    pub fn remaining(&self, plague: Plague) -> u8 {
        self.remaining[plague.index()]
    }

    /// Take one cube out of the pool. `None` means the pool for this plague
    /// is exhausted, which is a loss condition decided by the game, not here.
    pub fn take(&mut self, plague: Plague) -> Option<PlagueCube> {
        let slot = &mut self.remaining[plague.index()];
        if *slot == 0 {
            return None;
        }
        *slot -= 1;
        Some(PlagueCube { plague })
    }

    /// Return a cube removed from the map.
    pub fn put_back(&mut self, cube: PlagueCube) {
        let slot = &mut self.remaining[cube.plague.index()];
        debug_assert!(*slot < CUBES_PER_PLAGUE, "more cubes returned than exist");
        *slot = slot.saturating_add(1).min(CUBES_PER_PLAGUE);
    }
}
