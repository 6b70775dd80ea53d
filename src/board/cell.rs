//! Cells, properties and colour groups.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Money;
use crate::game::PlayerId;

/// Colour group (including railroads and utilities), in board order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Group {
    /// Mediterranean, Baltic.
    Brown,
    /// The four railroads.
    Railroads,
    /// Oriental, Vermont, Connecticut.
    LightBlue,
    /// St. Charles, States, Virginia.
    Pink,
    /// Electric Company, Waterworks.
    Utilities,
    /// St. James, Tennessee, New York.
    Orange,
    /// Kentucky, Indiana, Illinois.
    Red,
    /// Atlantic, Ventnor, Marvin Gardens.
    Yellow,
    /// Pacific, North Carolina, Pennsylvania.
    Green,
    /// Park Place, Boardwalk.
    Indigo,
}

impl Group {
    /// Whether houses and hotels can be built in this group.
    #[must_use]
    pub fn is_improvable(self) -> bool {
        !matches!(self, Self::Railroads | Self::Utilities)
    }

    /// Multiplier for an unowned member, or when no owner has a full set.
    #[must_use]
    pub fn neutral_multiplier(self) -> Money {
        match self {
            Self::Utilities => 4,
            _ => 1,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Brown => "BROWN",
            Self::Railroads => "RAILROADS",
            Self::LightBlue => "LIGHTBLUE",
            Self::Pink => "PINK",
            Self::Utilities => "UTILITIES",
            Self::Orange => "ORANGE",
            Self::Red => "RED",
            Self::Yellow => "YELLOW",
            Self::Green => "GREEN",
            Self::Indigo => "INDIGO",
        };
        f.write_str(name)
    }
}

/// A purchasable cell and its mutable ownership state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    /// Purchase price.
    pub cost_base: Money,
    /// Rent without improvements, before the multiplier.
    pub rent_base: Money,
    /// Price of one house (or of the hotel step).
    pub cost_house: Money,
    /// Rent with 1-4 houses, then with a hotel.
    pub rent_house: [Money; 5],
    /// Colour group.
    pub group: Group,
    /// Current owner.
    pub owner: Option<PlayerId>,
    /// Houses built (0-4).
    pub houses: u8,
    /// Hotel built; never together with houses.
    pub hotel: bool,
    /// Mortgaged properties charge no rent.
    pub mortgaged: bool,
    pub(super) multiplier: Money,
}

impl Property {
    /// Unowned, unimproved property.
    #[must_use]
    pub fn new(cost_base: Money, rent_base: Money, cost_house: Money, rent_house: [Money; 5], group: Group) -> Self {
        Self {
            cost_base,
            rent_base,
            cost_house,
            rent_house,
            group,
            owner: None,
            houses: 0,
            hotel: false,
            mortgaged: false,
            multiplier: group.neutral_multiplier(),
        }
    }

    /// Railroad or utility with no improvement table.
    #[must_use]
    pub fn unimprovable(cost_base: Money, rent_base: Money, group: Group) -> Self {
        Self::new(cost_base, rent_base, 0, [0; 5], group)
    }

    /// Rent multiplier derived from how the group is held.
    #[must_use]
    pub fn monopoly_multiplier(&self) -> Money {
        self.multiplier
    }

    /// 0-4 for houses, 5 for a hotel.
    #[must_use]
    pub fn improvement_level(&self) -> u8 {
        if self.hotel { 5 } else { self.houses }
    }

    /// Any house or hotel on the property.
    #[must_use]
    pub fn is_improved(&self) -> bool {
        self.hotel || self.houses > 0
    }

    /// Bank buy-back price for one improvement step.
    #[must_use]
    pub fn improvement_sale_price(&self) -> Money {
        self.cost_house / 2
    }

    /// Base rent for a landing with the given dice sum.
    #[must_use]
    pub fn rent(&self, dice_sum: u32) -> Money {
        if self.hotel {
            self.rent_house[4]
        } else if self.houses > 0 {
            self.rent_house[usize::from(self.houses) - 1]
        } else if self.group == Group::Utilities {
            Money::from(dice_sum) * self.multiplier
        } else {
            self.rent_base * self.multiplier
        }
    }
}

/// Which tax a tax cell charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tax {
    /// Lower of the cap and a share of net worth.
    Income,
    /// Flat amount.
    Luxury,
}

/// What happens on landing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Go, Jail (just visiting) and other inert cells.
    Plain,
    /// Purchasable property.
    Property(Property),
    /// Tax cell.
    Tax(Tax),
    /// Draw from the Chance deck.
    Chance,
    /// Draw from the Community Chest deck.
    CommunityChest,
    /// Sends the player to jail.
    GoToJail,
    /// Pays out the pot under the free-parking house rule.
    FreeParking,
}

/// One square of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Display name, never changes.
    pub name: String,
    /// Landing behaviour and property state.
    pub kind: CellKind,
}

impl Cell {
    /// Create a cell.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: CellKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Property state, if this cell is a property.
    #[must_use]
    pub fn property(&self) -> Option<&Property> {
        match &self.kind {
            CellKind::Property(property) => Some(property),
            _ => None,
        }
    }

    /// Mutable property state, if this cell is a property.
    pub fn property_mut(&mut self) -> Option<&mut Property> {
        match &mut self.kind {
            CellKind::Property(property) => Some(property),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
