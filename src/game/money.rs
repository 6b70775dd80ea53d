//! Payments, raising money and bankruptcy.
//!
//! A payment that exceeds cash first liquidates buildings, then mortgages
//! properties. If even full liquidation cannot cover it, the payer goes
//! bankrupt and everything left goes to the payee.

use std::cmp::Reverse;

use log::debug;

use super::{Game, PlayerId};
use crate::Money;
use crate::cards::{Card, DeckKind};

/// Who receives a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payee {
    /// The bank (or the free-parking pot under the house rule).
    Bank,
    /// Another player.
    Player(PlayerId),
}

impl Game {
    fn payee_name(&self, payee: Payee) -> String {
        match payee {
            Payee::Bank => "the bank".to_string(),
            Payee::Player(id) => self.players[id].name.clone(),
        }
    }

    fn credit(&mut self, payee: Payee, amount: Money) {
        match payee {
            Payee::Player(id) => self.players[id].money += amount,
            Payee::Bank => {
                if self.mechanics.free_parking_money {
                    self.board.free_parking_money += amount;
                }
            }
        }
    }

    fn transfer(&mut self, payer: PlayerId, amount: Money, payee: Payee) {
        self.players[payer].money -= amount;
        self.credit(payee, amount);
        let line = format!(
            "{} pays ${amount} to {}",
            self.players[payer].name,
            self.payee_name(payee)
        );
        self.log.add(line);
    }

    /// Pay `amount`, raising money or going bankrupt as needed.
    ///
    /// Paying exactly the cash on hand is an ordinary payment. If cash is
    /// short but liquidation can cover the debt, buildings are sold and
    /// properties mortgaged first. Otherwise the payer goes bankrupt.
    pub fn pay_money(&mut self, payer: PlayerId, amount: Money, payee: Payee) {
        if amount <= self.players[payer].money {
            self.transfer(payer, amount, payee);
            return;
        }
        let max_raisable = self.max_raisable_money(payer);
        if amount <= max_raisable {
            let line = format!(
                "{} has ${} and needs ${amount}, raising money",
                self.players[payer].name, self.players[payer].money
            );
            self.log.add(line);
            self.raise_money(payer, amount);
            self.transfer(payer, amount, payee);
        } else {
            self.declare_bankruptcy(payer, amount, max_raisable, payee);
        }
    }

    /// Cash plus everything liquidation could yield: half the improvement
    /// cost per building step and the mortgage value of unmortgaged
    /// properties.
    #[must_use]
    pub fn max_raisable_money(&self, id: PlayerId) -> Money {
        let player = &self.players[id];
        let liquid: Money = player
            .owned
            .iter()
            .filter_map(|&index| self.board.property(index))
            .map(|property| {
                let buildings = property.improvement_sale_price() * Money::from(property.improvement_level());
                let mortgage = if property.mortgaged {
                    0
                } else {
                    self.mechanics.mortgage_amount(property.cost_base)
                };
                buildings + mortgage
            })
            .sum();
        player.money + liquid
    }

    /// Liquidate until cash reaches `required` or nothing is left.
    ///
    /// Sells improvements first (evenly across a group, houses before
    /// hotels), then mortgages the most valuable unimproved properties.
    pub fn raise_money(&mut self, id: PlayerId, required: Money) {
        while self.players[id].money < required {
            let need = required - self.players[id].money;
            let Some(index) = self.next_property_to_downgrade(id, need) else {
                break;
            };
            self.downgrade_property(id, index);
        }

        let mut candidates: Vec<(usize, Money)> = Vec::new();
        for &index in &self.players[id].owned {
            if let Some(property) = self.board.property(index)
                && !property.mortgaged
                && !property.is_improved()
            {
                candidates.push((index, self.mechanics.mortgage_amount(property.cost_base)));
            }
        }
        candidates.sort_by_key(|&(_, value)| Reverse(value));

        for (index, value) in candidates {
            if self.players[id].money >= required {
                break;
            }
            if let Some(property) = self.board.property_mut(index) {
                property.mortgaged = true;
            }
            self.players[id].money += value;
            let line = format!(
                "{} mortgages {} for ${value}",
                self.players[id].name,
                self.board.cell(index)
            );
            self.log.add(line);
        }
    }

    /// Improved property to sell a building from, given the cash still needed.
    ///
    /// A property qualifies only if no member of its group is more improved.
    /// Houses go before hotels. Among the rest, the cheapest building whose
    /// sale still covers the need is preferred, else the most expensive.
    fn next_property_to_downgrade(&self, id: PlayerId, need: Money) -> Option<usize> {
        let level = |index: usize| self.board.property(index).map_or(0, |p| p.improvement_level());
        let price = |index: usize| self.board.property(index).map_or(0, |p| p.improvement_sale_price());

        let mut candidates: Vec<usize> = self.players[id]
            .owned
            .iter()
            .copied()
            .filter(|&index| {
                self.board.property(index).is_some_and(|property| {
                    property.is_improved()
                        && self
                            .board
                            .group_members(property.group)
                            .iter()
                            .all(|&member| level(member) <= property.improvement_level())
                })
            })
            .collect();
        if candidates.iter().any(|&index| level(index) < 5) {
            candidates.retain(|&index| level(index) < 5);
        }
        candidates.sort_by_key(|&index| price(index));

        while candidates.len() > 1 {
            let second_best = candidates[candidates.len() - 2];
            if price(second_best) < need {
                break;
            }
            candidates.pop();
        }
        candidates.last().copied()
    }

    fn downgrade_property(&mut self, id: PlayerId, index: usize) {
        let Some(mut property) = self.board.property(index).copied() else {
            return;
        };
        let price = property.improvement_sale_price();
        let (proceeds, what) = if property.hotel && self.board.available_houses >= 4 {
            property.hotel = false;
            property.houses = 4;
            self.board.available_hotels += 1;
            self.board.available_houses -= 4;
            (price, "a hotel (replaced by 4 houses)")
        } else if property.hotel {
            property.hotel = false;
            self.board.available_hotels += 1;
            (price * 5, "a hotel and its houses")
        } else {
            property.houses -= 1;
            self.board.available_houses += 1;
            (price, "a house")
        };
        if let Some(slot) = self.board.property_mut(index) {
            *slot = property;
        }
        self.players[id].money += proceeds;
        let line = format!(
            "{} sells {what} on {} for ${proceeds}",
            self.players[id].name,
            self.board.cell(index)
        );
        self.log.add(line);
    }

    fn declare_bankruptcy(&mut self, id: PlayerId, amount: Money, max_raisable: Money, payee: Payee) {
        let name = self.players[id].name.clone();
        let payee_name = self.payee_name(payee);
        self.log.add(format!(
            "{name} owes ${amount} to {payee_name} but can raise at most ${max_raisable}: bankrupt"
        ));
        debug!("game {}: {name} bankrupt on turn {}", self.number, self.turn);

        self.players[id].is_bankrupt = true;
        self.raise_money(id, Money::MAX);

        let cash = std::mem::take(&mut self.players[id].money);
        self.credit(payee, cash);
        self.log.add(format!("{name} hands ${cash} to {payee_name}"));

        let owned = std::mem::take(&mut self.players[id].owned);
        for index in owned.into_iter().rev() {
            let Some(property) = self.board.property_mut(index) else {
                continue;
            };
            match payee {
                Payee::Player(to) => {
                    property.owner = Some(to);
                    self.players[to].owned.push(index);
                }
                Payee::Bank => {
                    debug_assert!(!property.is_improved(), "liquidation leaves no buildings");
                    property.owner = None;
                    property.mortgaged = false;
                }
            }
            self.board.recalculate_monopoly_multipliers(index);
            let line = format!("{} goes from {name} to {payee_name}", self.board.cell(index));
            self.log.add(line);
        }

        for source in [DeckKind::Chance, DeckKind::CommunityChest] {
            if self.players[id].holds_jail_card(source) {
                self.players[id].set_jail_card(source, false);
                self.board.deck_mut(source).add_card(Card::get_out_of_jail_free());
                self.log.add(format!("{name}'s Get Out of Jail Free card returns to its deck"));
            }
        }

        self.players[id].in_jail = false;
        self.refresh_trade_lists();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::GET_OUT_OF_JAIL_FREE;
    use crate::game::invariants::check_invariants;
    use crate::game::test_support::{game, settings};

    fn build(game: &mut Game, index: usize, houses: u8) {
        let property = game.board.property_mut(index).unwrap();
        property.houses = houses;
        game.board.available_houses -= u32::from(houses);
    }

    fn build_hotel(game: &mut Game, index: usize) {
        game.board.property_mut(index).unwrap().hotel = true;
        game.board.available_hotels -= 1;
    }

    #[test]
    fn test_exact_cash_is_not_bankruptcy() {
        let mut game = game(&["A", "B"]);
        game.players[0].money = 80;
        game.pay_money(0, 80, Payee::Player(1));
        assert_eq!(game.players[0].money, 0);
        assert!(!game.players[0].is_bankrupt);
        assert_eq!(game.players[1].money, 1580);
    }

    #[test]
    fn test_mortgage_to_pay() {
        let mut game = game(&["A", "B"]);
        game.assign_property(0, 5);
        game.players[0].money = 50;
        game.pay_money(0, 80, Payee::Bank);
        assert_eq!(game.players[0].money, 70);
        assert!(game.board.property(5).unwrap().mortgaged);
        assert!(!game.players[0].is_bankrupt);
    }

    #[test]
    fn test_most_valuable_mortgaged_first() {
        let mut game = game(&["A", "B"]);
        game.assign_property(0, 1);
        game.assign_property(0, 39);
        game.players[0].money = 0;
        game.raise_money(0, 100);
        assert!(game.board.property(39).unwrap().mortgaged);
        assert!(!game.board.property(1).unwrap().mortgaged);
        assert_eq!(game.players[0].money, 200);
    }

    #[test]
    fn test_houses_sold_before_mortgaging() {
        let mut game = game(&["A", "B"]);
        game.assign_property(0, 1);
        game.assign_property(0, 3);
        build(&mut game, 1, 2);
        build(&mut game, 3, 2);
        game.players[0].money = 0;

        game.raise_money(0, 40);
        // two houses at $25 each; groups stay even
        assert_eq!(game.players[0].money, 50);
        assert_eq!(game.board.property(1).unwrap().houses, 1);
        assert_eq!(game.board.property(3).unwrap().houses, 1);
        assert!(!game.board.property(1).unwrap().mortgaged);
        assert_eq!(game.board.available_houses, 34);
        assert!(check_invariants(&game).is_empty());
    }

    fn brown_and_indigo(indigo_hotels: bool) -> Game {
        let mut game = game(&["A", "B"]);
        for index in [1, 3, 37, 39] {
            game.assign_property(0, index);
        }
        build(&mut game, 1, 1);
        build(&mut game, 3, 1);
        for index in [37, 39] {
            if indigo_hotels {
                build_hotel(&mut game, index);
            } else {
                build(&mut game, index, 1);
            }
        }
        game.players[0].money = 0;
        game
    }

    #[test]
    fn test_houses_sold_before_hotels() {
        let mut game = brown_and_indigo(true);
        game.raise_money(0, 20);
        assert_eq!(game.players[0].money, 25);
        assert_eq!(game.board.property(1).unwrap().houses, 0);
        assert_eq!(game.board.property(3).unwrap().houses, 1);
        assert!(game.board.property(37).unwrap().hotel);
        assert!(game.board.property(39).unwrap().hotel);
        assert_eq!(game.board.available_hotels, 10);
        assert!(check_invariants(&game).is_empty());
    }

    #[test]
    fn test_cheapest_sufficient_building_sold() {
        // A $25 Brown house covers $20
        let mut game = brown_and_indigo(false);
        game.raise_money(0, 20);
        assert_eq!(game.players[0].money, 25);
        assert_eq!(game.board.property(37).unwrap().houses, 1);
        assert_eq!(game.board.property(39).unwrap().houses, 1);

        // No Brown house covers $60, so one $100 Indigo house goes
        let mut game = brown_and_indigo(false);
        game.raise_money(0, 60);
        assert_eq!(game.players[0].money, 100);
        assert_eq!(game.board.property(1).unwrap().houses, 1);
        assert_eq!(game.board.property(3).unwrap().houses, 1);
        let indigo_houses: u8 = [37, 39].iter().map(|&i| game.board.property(i).unwrap().houses).sum();
        assert_eq!(indigo_houses, 1);
        assert!(check_invariants(&game).is_empty());
    }

    #[test]
    fn test_hotel_converts_to_houses() {
        let mut game = game(&["A", "B"]);
        game.assign_property(0, 37);
        game.assign_property(0, 39);
        build_hotel(&mut game, 37);
        build_hotel(&mut game, 39);
        game.players[0].money = 0;

        game.raise_money(0, 100);
        assert_eq!(game.players[0].money, 100);
        let converted = [37, 39]
            .iter()
            .filter(|&&i| game.board.property(i).unwrap().houses == 4)
            .count();
        assert_eq!(converted, 1);
        assert_eq!(game.board.available_houses, 32);
        assert_eq!(game.board.available_hotels, 11);
        assert!(check_invariants(&game).is_empty());
    }

    #[test]
    fn test_hotel_sold_whole_when_bank_short_of_houses() {
        let mut game = game(&["A", "B"]);
        game.assign_property(0, 1);
        game.assign_property(0, 3);
        build_hotel(&mut game, 1);
        build_hotel(&mut game, 3);
        game.board.available_houses = 2;
        game.players[0].money = 0;

        game.raise_money(0, 10);
        assert_eq!(game.players[0].money, 125);
        assert_eq!(game.board.available_hotels, 11);
        assert_eq!(game.board.available_houses, 2);
    }

    #[test]
    fn test_max_raisable() {
        let mut game = game(&["A", "B"]);
        game.assign_property(0, 1);
        game.assign_property(0, 3);
        build(&mut game, 1, 1);
        build_hotel(&mut game, 3);
        game.players[0].money = 10;
        // cash 10 + house 25 + hotel 5 * 25 + mortgages 30 + 30
        assert_eq!(game.max_raisable_money(0), 220);
    }

    #[test]
    fn test_bankruptcy_to_player() {
        let mut game = game(&["A", "B"]);
        game.assign_property(0, 1);
        game.assign_property(0, 3);
        build(&mut game, 1, 1);
        game.players[0].money = 10;
        game.board.chest.remove_card(GET_OUT_OF_JAIL_FREE).unwrap();
        game.players[0].jail_card_chest = true;
        let chest_size = game.board.chest.len();

        game.pay_money(0, 1000, Payee::Player(1));

        let loser = &game.players[0];
        assert!(loser.is_bankrupt);
        assert_eq!(loser.money, 0);
        assert!(loser.owned.is_empty());
        assert!(!loser.jail_card_chest);
        assert_eq!(game.board.chest.len(), chest_size + 1);

        // 10 cash + 25 house + 30 + 30 mortgages
        assert_eq!(game.players[1].money, 1595);
        assert_eq!(game.players[1].owned, vec![3, 1]);
        assert!(game.board.property(1).unwrap().mortgaged);
        assert_eq!(game.board.property(1).unwrap().owner, Some(1));
        assert_eq!(game.board.property(1).unwrap().monopoly_multiplier(), 2);
        assert!(check_invariants(&game).is_empty());
    }

    #[test]
    fn test_bankruptcy_to_bank_frees_properties() {
        let mut game = game(&["A", "B", "C"]);
        game.assign_property(0, 5);
        game.players[0].money = 0;
        game.pay_money(0, 500, Payee::Bank);

        assert!(game.players[0].is_bankrupt);
        let railroad = game.board.property(5).unwrap();
        assert_eq!(railroad.owner, None);
        assert!(!railroad.mortgaged);
        assert_eq!(game.board.free_parking_money, 0);
    }

    #[test]
    fn test_free_parking_pot_collects_bank_payments() {
        let mut settings = settings(&["A", "B"]);
        settings.mechanics.free_parking_money = true;
        let mut game = Game::new(1, 0, &settings).unwrap();
        game.pay_money(0, 75, Payee::Bank);
        assert_eq!(game.board.free_parking_money, 75);

        game.players[1].money = 20;
        game.pay_money(1, 500, Payee::Bank);
        assert_eq!(game.board.free_parking_money, 95);
    }
}
