//! City graph: fields, cube capacity, laboratories, and adjacency.
//!
//! The graph is many-to-many and may contain cycles; the outbreak cascade
//! in `domain::game` relies only on the adjacency lists exposed here.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::plague::Plague;
use crate::domain::rules::MAX_CUBES_PER_FIELD;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct FieldId(pub u16);

/// One city on the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub id: FieldId,
    pub name: String,
    /// The plague whose infection card and city card name this field.
    pub home_plague: Plague,
    cubes: [u8; Plague::COUNT],
    pub has_laboratory: bool,
}

impl Field {
    fn new(id: FieldId, name: impl Into<String>, home_plague: Plague) -> Self {
        Self {
            id,
            name: name.into(),
            home_plague,
            cubes: [0; Plague::COUNT],
            has_laboratory: false,
        }
    }

    pub fn cubes_of(&self, plague: Plague) -> u8 {
        self.cubes[plague.index()]
    }

    pub fn total_cubes(&self) -> u8 {
        self.cubes.iter().sum()
    }

    pub fn at_capacity(&self, plague: Plague) -> bool {
        self.cubes[plague.index()] >= MAX_CUBES_PER_FIELD
    }

    /// Place one cube; returns `false` when the field is already at capacity
    /// for this plague (the caller turns that into an outbreak).
    pub(crate) fn try_add_cube(&mut self, plague: Plague) -> bool {
        let slot = &mut self.cubes[plague.index()];
        if *slot >= MAX_CUBES_PER_FIELD {
            return false;
        }
        *slot += 1;
        true
    }

    /// Remove one cube of `plague`.
    pub(crate) fn remove_cube(&mut self, plague: Plague) -> Result<(), DomainError> {
        let slot = &mut self.cubes[plague.index()];
        if *slot == 0 {
            return Err(DomainError::validation(
                ValidationKind::NoCubesOfPlagueOnField,
                format!("no {plague:?} cubes on {}", self.name),
            ));
        }
        *slot -= 1;
        Ok(())
    }
}

/// City graph owned by the game aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMap {
    fields: Vec<Field>,
    adjacency: Vec<Vec<FieldId>>,
    start_field: FieldId,
}

impl GameMap {
    /// Build a map from city specs and an undirected edge list.
    ///
    /// Edges are validated (in range, no self-loops) and stored
    /// symmetrically; duplicates are ignored.
    pub fn new(
        cities: Vec<(String, Plague)>,
        edges: &[(u16, u16)],
        start_field: FieldId,
    ) -> Result<Self, DomainError> {
        if cities.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::InvalidMap,
                "map needs at least one field",
            ));
        }
        let count = cities.len();
        if usize::from(start_field.0) >= count {
            return Err(DomainError::validation(
                ValidationKind::InvalidMap,
                "start field outside the map",
            ));
        }

        let fields: Vec<Field> = cities
            .into_iter()
            .enumerate()
            .map(|(i, (name, plague))| Field::new(FieldId(i as u16), name, plague))
            .collect();

        let mut adjacency = vec![Vec::new(); count];
        for &(a, b) in edges {
            if usize::from(a) >= count || usize::from(b) >= count {
                return Err(DomainError::validation(
                    ValidationKind::InvalidMap,
                    format!("edge ({a}, {b}) outside the map"),
                ));
            }
            if a == b {
                return Err(DomainError::validation(
                    ValidationKind::InvalidMap,
                    format!("field {a} cannot neighbor itself"),
                ));
            }
            if !adjacency[usize::from(a)].contains(&FieldId(b)) {
                adjacency[usize::from(a)].push(FieldId(b));
                adjacency[usize::from(b)].push(FieldId(a));
            }
        }

        Ok(Self {
            fields,
            adjacency,
            start_field,
        })
    }

    /// The built-in 24-city map.
    pub fn default_map() -> GameMap {
        DEFAULT_MAP.clone()
    }

    pub fn field(&self, id: FieldId) -> Result<&Field, DomainError> {
        self.fields.get(usize::from(id.0)).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Field, format!("no field {}", id.0))
        })
    }

    pub(crate) fn field_mut(&mut self, id: FieldId) -> Result<&mut Field, DomainError> {
        self.fields.get_mut(usize::from(id.0)).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Field, format!("no field {}", id.0))
        })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn neighbors(&self, id: FieldId) -> &[FieldId] {
        self.adjacency
            .get(usize::from(id.0))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn are_adjacent(&self, a: FieldId, b: FieldId) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Where every player starts; carries the first laboratory.
    pub fn start_field(&self) -> FieldId {
        self.start_field
    }

    pub fn cubes_on_map(&self, plague: Plague) -> u32 {
        self.fields
            .iter()
            .map(|f| u32::from(f.cubes_of(plague)))
            .sum()
    }

    pub fn laboratory_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.has_laboratory)
    }
}

const DEFAULT_CITIES: [(&str, Plague); 24] = [
    ("Atlanta", Plague::Cobalt),
    ("Chicago", Plague::Cobalt),
    ("New York", Plague::Cobalt),
    ("London", Plague::Cobalt),
    ("Paris", Plague::Cobalt),
    ("Essen", Plague::Cobalt),
    ("Lagos", Plague::Amber),
    ("Kinshasa", Plague::Amber),
    ("Johannesburg", Plague::Amber),
    ("Sao Paulo", Plague::Amber),
    ("Lima", Plague::Amber),
    ("Bogota", Plague::Amber),
    ("Cairo", Plague::Sable),
    ("Istanbul", Plague::Sable),
    ("Moscow", Plague::Sable),
    ("Baghdad", Plague::Sable),
    ("Karachi", Plague::Sable),
    ("Delhi", Plague::Sable),
    ("Bangkok", Plague::Viridian),
    ("Jakarta", Plague::Viridian),
    ("Hong Kong", Plague::Viridian),
    ("Shanghai", Plague::Viridian),
    ("Tokyo", Plague::Viridian),
    ("Sydney", Plague::Viridian),
];

const DEFAULT_EDGES: [(u16, u16); 33] = [
    (0, 1),
    (0, 2),
    (0, 11),
    (1, 2),
    (1, 22),
    (2, 3),
    (3, 4),
    (3, 5),
    (4, 5),
    (4, 12),
    (4, 13),
    (5, 14),
    (6, 7),
    (6, 9),
    (7, 8),
    (8, 12),
    (9, 11),
    (10, 11),
    (10, 23),
    (12, 13),
    (12, 15),
    (13, 14),
    (13, 15),
    (14, 16),
    (15, 16),
    (16, 17),
    (17, 18),
    (18, 19),
    (18, 20),
    (19, 23),
    (20, 21),
    (20, 22),
    (21, 22),
];

static DEFAULT_MAP: Lazy<GameMap> = Lazy::new(|| {
    let cities = DEFAULT_CITIES
        .iter()
        .map(|&(name, plague)| (name.to_string(), plague))
        .collect();
    GameMap::new(cities, &DEFAULT_EDGES, FieldId(0)).expect("default map data is valid")
});
