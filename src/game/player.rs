//! Player state.

use std::collections::BTreeSet;
use std::fmt;

use crate::Money;
use crate::cards::DeckKind;
use crate::config::PlayerPolicy;

/// Index of a player in the game's seating order.
pub type PlayerId = usize;

/// Rent adjustment set by a card for the landing that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RentNote {
    /// Normal rent.
    #[default]
    None,
    /// Nearest-railroad card: twice the normal rent.
    DoubleRent,
    /// Nearest-utility card: ten times the dice sum.
    TenTimesDice,
}

/// One player's mutable state.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Unique name.
    pub name: String,
    /// Behaviour policy.
    pub policy: PlayerPolicy,
    /// Cash; never negative.
    pub money: Money,
    /// Cell index.
    pub position: usize,
    /// Currently in jail.
    pub in_jail: bool,
    /// Failed attempts to leave jail so far (0-2).
    pub days_in_jail: u8,
    /// Doubles rolled in a row this move (0-2).
    pub had_doubles: u8,
    /// Holding the Chance jail card.
    pub jail_card_chance: bool,
    /// Holding the Community Chest jail card.
    pub jail_card_chest: bool,
    /// Owned property cells, in acquisition order.
    pub owned: Vec<usize>,
    /// Terminal: a bankrupt player never moves again.
    pub is_bankrupt: bool,
    /// Pending rent adjustment, cleared after every roll.
    pub rent_note: RentNote,
    /// Properties this player would trade away.
    pub wants_to_sell: BTreeSet<usize>,
    /// Properties this player would trade for.
    pub wants_to_buy: BTreeSet<usize>,
}

impl Player {
    /// New player on Go with no cash.
    #[must_use]
    pub fn new(name: impl Into<String>, policy: PlayerPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            money: 0,
            position: 0,
            in_jail: false,
            days_in_jail: 0,
            had_doubles: 0,
            jail_card_chance: false,
            jail_card_chest: false,
            owned: Vec::new(),
            is_bankrupt: false,
            rent_note: RentNote::None,
            wants_to_sell: BTreeSet::new(),
            wants_to_buy: BTreeSet::new(),
        }
    }

    /// Deck of the jail card this player would use first, if any.
    #[must_use]
    pub fn jail_card(&self) -> Option<DeckKind> {
        if self.jail_card_chance {
            Some(DeckKind::Chance)
        } else if self.jail_card_chest {
            Some(DeckKind::CommunityChest)
        } else {
            None
        }
    }

    /// Whether the player holds the jail card from one deck.
    #[must_use]
    pub fn holds_jail_card(&self, source: DeckKind) -> bool {
        match source {
            DeckKind::Chance => self.jail_card_chance,
            DeckKind::CommunityChest => self.jail_card_chest,
        }
    }

    /// Give or take the jail card from one deck.
    pub fn set_jail_card(&mut self, source: DeckKind, held: bool) {
        match source {
            DeckKind::Chance => self.jail_card_chance = held,
            DeckKind::CommunityChest => self.jail_card_chest = held,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
