//! Chance and Community Chest cards.

mod deck;
mod standard;

pub use deck::Deck;
pub use standard::{GET_OUT_OF_JAIL_FREE, chance_cards, community_chest_cards};

use crate::Money;
use crate::board::Group;

/// Which deck a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeckKind {
    /// Chance.
    Chance,
    /// Community Chest.
    CommunityChest,
}

/// What a card does to the player who drew it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEffect {
    /// Move to a cell, collecting salary when passing Go.
    AdvanceTo {
        /// Destination cell index.
        target: usize,
    },
    /// Move to the next cell of a group. Railroads then charge double rent,
    /// utilities ten times the dice.
    AdvanceToNearest(Group),
    /// Move back a number of cells; never collects salary.
    GoBack(usize),
    /// Keep the card to leave jail later.
    GetOutOfJailFree,
    /// Straight to jail; the move ends.
    GoToJail,
    /// Receive money from the bank.
    BankPays(Money),
    /// Pay money to the bank.
    PayBank(Money),
    /// Pay the bank per house and per hotel owned.
    Repairs {
        /// Charge per house.
        per_house: Money,
        /// Charge per hotel.
        per_hotel: Money,
    },
    /// Receive this amount from every other solvent player.
    CollectFromEachPlayer(Money),
    /// Pay this amount to every other solvent player.
    PayEachPlayer(Money),
}

/// A card: display text plus effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Text printed on the card; identifies it for removal.
    pub text: String,
    /// Effect applied on drawing.
    pub effect: CardEffect,
}

impl Card {
    /// Create a card.
    #[must_use]
    pub fn new(text: impl Into<String>, effect: CardEffect) -> Self {
        Self {
            text: text.into(),
            effect,
        }
    }

    /// The jail card, as returned to a deck after use.
    #[must_use]
    pub fn get_out_of_jail_free() -> Self {
        Self::new(GET_OUT_OF_JAIL_FREE, CardEffect::GetOutOfJailFree)
    }
}
