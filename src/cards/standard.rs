//! The standard Chance and Community Chest card sets, unshuffled.

use super::{Card, CardEffect};
use crate::board::Group;

/// Text of the jail card; the same in both decks.
pub const GET_OUT_OF_JAIL_FREE: &str = "Get Out of Jail Free";

/// The 17 Chance cards.
#[must_use]
pub fn chance_cards() -> Vec<Card> {
    use CardEffect::{
        AdvanceTo, AdvanceToNearest, BankPays, GetOutOfJailFree, GoBack, GoToJail, PayBank, PayEachPlayer, Repairs,
    };

    vec![
        Card::new("Advance to Go (Collect $200)", AdvanceTo { target: 0 }),
        Card::new("Advance to Boardwalk", AdvanceTo { target: 39 }),
        Card::new("Advance to Illinois Avenue.", AdvanceTo { target: 24 }),
        Card::new("Advance to St. Charles Place.", AdvanceTo { target: 11 }),
        Card::new("Advance to Reading Railroad", AdvanceTo { target: 5 }),
        Card::new(
            "Advance token to nearest Utility. If owned, pay diceX10",
            AdvanceToNearest(Group::Utilities),
        ),
        Card::new("Advance to the nearest Railroad.", AdvanceToNearest(Group::Railroads)),
        Card::new("Advance to the nearest Railroad.", AdvanceToNearest(Group::Railroads)),
        Card::new("Bank pays you dividend of $50", BankPays(50)),
        Card::new(GET_OUT_OF_JAIL_FREE, GetOutOfJailFree),
        Card::new("Go Back 3 Spaces", GoBack(3)),
        Card::new(
            "Go to Jail. Go directly to Jail, do not pass Go, do not collect $200",
            GoToJail,
        ),
        Card::new(
            "Make general repairs on all your property. For each house pay $25. For each hotel pay $100",
            Repairs {
                per_house: 25,
                per_hotel: 100,
            },
        ),
        Card::new("Speeding fine $15", PayBank(15)),
        Card::new(
            "Take a trip to Reading Railroad. If you pass Go, collect $200",
            AdvanceTo { target: 5 },
        ),
        Card::new(
            "You have been elected Chairman of the Board. Pay each player $50",
            PayEachPlayer(50),
        ),
        Card::new("Your building loan matures. Collect $150", BankPays(150)),
    ]
}

/// The 16 Community Chest cards.
#[must_use]
pub fn community_chest_cards() -> Vec<Card> {
    use CardEffect::{AdvanceTo, BankPays, CollectFromEachPlayer, GetOutOfJailFree, GoToJail, PayBank, Repairs};

    vec![
        Card::new("Advance to Go (Collect $200)", AdvanceTo { target: 0 }),
        Card::new("Bank error in your favor. Collect $200", BankPays(200)),
        Card::new("Doctor's fee. Pay $50", PayBank(50)),
        Card::new("From sale of stock you get $50", BankPays(50)),
        Card::new(GET_OUT_OF_JAIL_FREE, GetOutOfJailFree),
        Card::new(
            "Go to Jail. Go directly to jail, do not pass Go, do not collect $200",
            GoToJail,
        ),
        Card::new("Holiday fund matures. Receive $100", BankPays(100)),
        Card::new("Income tax refund. Collect $20", BankPays(20)),
        Card::new(
            "It is your birthday. Collect $10 from every player",
            CollectFromEachPlayer(10),
        ),
        Card::new("Life insurance matures. Collect $100", BankPays(100)),
        Card::new("Pay hospital fees of $100", PayBank(100)),
        Card::new("Pay school fees of $50", PayBank(50)),
        Card::new("Receive $25 consultancy fee", BankPays(25)),
        Card::new(
            "You are assessed for street repair. $40 per house. $115 per hotel",
            Repairs {
                per_house: 40,
                per_hotel: 115,
            },
        ),
        Card::new(
            "You have won second prize in a beauty contest. Collect $10",
            BankPays(10),
        ),
        Card::new("You inherit $100", BankPays(100)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_sizes() {
        assert_eq!(chance_cards().len(), 17);
        assert_eq!(community_chest_cards().len(), 16);
    }

    #[test]
    fn test_one_jail_card_per_deck() {
        for cards in [chance_cards(), community_chest_cards()] {
            let jail_cards = cards.iter().filter(|c| c.text == GET_OUT_OF_JAIL_FREE).count();
            assert_eq!(jail_cards, 1);
            assert!(cards.contains(&Card::get_out_of_jail_free()));
        }
    }

    #[test]
    fn test_two_nearest_railroad_cards() {
        let count = chance_cards()
            .iter()
            .filter(|c| c.effect == CardEffect::AdvanceToNearest(Group::Railroads))
            .count();
        assert_eq!(count, 2);
    }
}
