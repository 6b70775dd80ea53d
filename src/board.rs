//! The board: cells, colour groups, card decks and the bank's building supply.
//!
//! Cells are addressed by index; movement wraps modulo the board length.
//! Ownership lives on the property cells as a player id, mirrored by each
//! player's owned list.

mod cell;
mod layout;

pub use cell::{Cell, CellKind, Group, Property, Tax};
pub use layout::standard_cells;

use std::collections::BTreeMap;

use crate::Money;
use crate::cards::{Card, Deck, DeckKind, chance_cards, community_chest_cards};
use crate::config::GameMechanics;
use crate::error::SetupError;

/// Index of the jail cell on the standard board.
pub const JAIL_POSITION: usize = 10;

/// Board state for one game.
#[derive(Debug, Clone)]
pub struct Board {
    cells: Vec<Cell>,
    groups: BTreeMap<Group, Vec<usize>>,
    /// Chance deck.
    pub chance: Deck,
    /// Community Chest deck.
    pub chest: Deck,
    /// Houses left in the bank.
    pub available_houses: u32,
    /// Hotels left in the bank.
    pub available_hotels: u32,
    /// Pot paid out on Free Parking under the house rule.
    pub free_parking_money: Money,
}

impl Board {
    /// Standard board with the standard (unshuffled) decks.
    #[must_use]
    pub fn new(mechanics: &GameMechanics) -> Self {
        Self::build(standard_cells(), chance_cards(), community_chest_cards(), mechanics)
    }

    /// Board from an explicit cell list and deck contents.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::EmptyBoard`] if `cells` is empty.
    pub fn with_layout(
        cells: Vec<Cell>,
        chance: Vec<Card>,
        chest: Vec<Card>,
        mechanics: &GameMechanics,
    ) -> Result<Self, SetupError> {
        if cells.is_empty() {
            return Err(SetupError::EmptyBoard);
        }
        Ok(Self::build(cells, chance, chest, mechanics))
    }

    fn build(cells: Vec<Cell>, chance: Vec<Card>, chest: Vec<Card>, mechanics: &GameMechanics) -> Self {
        let mut groups: BTreeMap<Group, Vec<usize>> = BTreeMap::new();
        for (index, cell) in cells.iter().enumerate() {
            if let Some(property) = cell.property() {
                groups.entry(property.group).or_default().push(index);
            }
        }
        Self {
            cells,
            groups,
            chance: Deck::new(chance),
            chest: Deck::new(chest),
            available_houses: mechanics.available_houses,
            available_hotels: mechanics.available_hotels,
            free_parking_money: 0,
        }
    }

    /// Number of cells.
    #[must_use]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// All cells in board order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at an index (wrapped onto the board).
    #[must_use]
    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index % self.cells.len()]
    }

    /// Property at an index, if that cell is one.
    #[must_use]
    pub fn property(&self, index: usize) -> Option<&Property> {
        self.cells.get(index).and_then(Cell::property)
    }

    /// Mutable property at an index, if that cell is one.
    pub fn property_mut(&mut self, index: usize) -> Option<&mut Property> {
        self.cells.get_mut(index).and_then(Cell::property_mut)
    }

    /// Group → member cell indices, in group order.
    #[must_use]
    pub fn groups(&self) -> &BTreeMap<Group, Vec<usize>> {
        &self.groups
    }

    /// Member cells of a group.
    #[must_use]
    pub fn group_members(&self, group: Group) -> &[usize] {
        self.groups.get(&group).map_or(&[], Vec::as_slice)
    }

    /// Deck by kind.
    #[must_use]
    pub fn deck(&self, kind: DeckKind) -> &Deck {
        match kind {
            DeckKind::Chance => &self.chance,
            DeckKind::CommunityChest => &self.chest,
        }
    }

    /// Mutable deck by kind.
    pub fn deck_mut(&mut self, kind: DeckKind) -> &mut Deck {
        match kind {
            DeckKind::Chance => &mut self.chance,
            DeckKind::CommunityChest => &mut self.chest,
        }
    }

    /// First cell of `group` strictly ahead of `from`, wrapping past Go.
    #[must_use]
    pub fn nearest(&self, from: usize, group: Group) -> Option<usize> {
        let size = self.cells.len();
        (1..=size)
            .map(|step| (from + step) % size)
            .find(|&index| self.property(index).is_some_and(|p| p.group == group))
    }

    /// Recompute rent multipliers for every member of the changed cell's group.
    ///
    /// Must run after every ownership change.
    pub fn recalculate_monopoly_multipliers(&mut self, changed_cell: usize) {
        let Some(group) = self.property(changed_cell).map(|p| p.group) else {
            return;
        };
        let members = self.group_members(group).to_vec();
        let owners: Vec<_> = members
            .iter()
            .map(|&index| self.property(index).and_then(|p| p.owner))
            .collect();

        for &index in &members {
            let Some(property) = self.property_mut(index) else {
                continue;
            };
            property.multiplier = match property.owner {
                None => group.neutral_multiplier(),
                Some(owner) => {
                    let held = owners.iter().filter(|o| **o == Some(owner)).count();
                    let full_set = held == members.len();
                    match group {
                        Group::Railroads => 1 << (held - 1),
                        Group::Utilities => {
                            if full_set {
                                10
                            } else {
                                4
                            }
                        }
                        _ => {
                            if full_set {
                                2
                            } else {
                                1
                            }
                        }
                    }
                }
            };
        }
    }

    /// Houses currently standing on the board.
    #[must_use]
    pub fn houses_in_play(&self) -> u32 {
        self.cells
            .iter()
            .filter_map(Cell::property)
            .map(|p| u32::from(p.houses))
            .sum()
    }

    /// Hotels currently standing on the board.
    #[must_use]
    pub fn hotels_in_play(&self) -> u32 {
        self.cells
            .iter()
            .filter_map(Cell::property)
            .map(|p| u32::from(p.hotel))
            .sum()
    }
}
