//! Building houses and hotels, lifting mortgages.

use super::{Game, PlayerId};

impl Game {
    /// Build greedily while cash stays above the player's floor.
    ///
    /// Each step builds on the cheapest eligible property: a full, unmortgaged
    /// colour set, built evenly, with a building left in the bank.
    pub fn improve_properties(&mut self, id: PlayerId) {
        while let Some(index) = self.next_property_to_improve(id) {
            let Some(mut property) = self.board.property(index).copied() else {
                break;
            };
            let player = &self.players[id];
            if player.money - property.cost_house < player.policy.unspendable_cash {
                break;
            }

            let what = if property.houses == 4 {
                property.houses = 0;
                property.hotel = true;
                self.board.available_houses += 4;
                self.board.available_hotels -= 1;
                "a hotel".to_string()
            } else {
                property.houses += 1;
                self.board.available_houses -= 1;
                format!("house {}", property.houses)
            };
            if let Some(slot) = self.board.property_mut(index) {
                *slot = property;
            }
            self.players[id].money -= property.cost_house;
            let line = format!(
                "{} builds {what} on {} for ${}",
                self.players[id].name,
                self.board.cell(index),
                property.cost_house
            );
            self.log.add(line);
        }
    }

    fn next_property_to_improve(&self, id: PlayerId) -> Option<usize> {
        self.players[id]
            .owned
            .iter()
            .copied()
            .filter(|&index| {
                let Some(property) = self.board.property(index) else {
                    return false;
                };
                let even = self.board.group_members(property.group).iter().all(|&member| {
                    self.board
                        .property(member)
                        .is_some_and(|other| !other.mortgaged && (other.hotel || other.houses >= property.houses))
                });
                let supply = if property.houses == 4 {
                    self.board.available_hotels > 0
                } else {
                    self.board.available_houses > 0
                };
                !property.hotel
                    && !property.mortgaged
                    && property.monopoly_multiplier() == 2
                    && property.group.is_improvable()
                    && even
                    && supply
            })
            .min_by_key(|&index| self.board.property(index).map_or(0, |p| p.cost_house))
    }

    /// Lift one mortgage if cash allows; returns whether one was lifted.
    ///
    /// Takes the first mortgaged property in acquisition order whose
    /// mortgage value plus fee leaves cash at or above the floor.
    pub fn unmortgage_a_property(&mut self, id: PlayerId) -> bool {
        let player = &self.players[id];
        let found = player.owned.iter().copied().find_map(|index| {
            let property = self.board.property(index)?;
            let cost = self.mechanics.unmortgage_cost(property.cost_base);
            (property.mortgaged && player.money - cost >= player.policy.unspendable_cash).then_some((index, cost))
        });
        let Some((index, cost)) = found else {
            return false;
        };

        if let Some(property) = self.board.property_mut(index) {
            property.mortgaged = false;
        }
        self.players[id].money -= cost;
        let line = format!(
            "{} unmortgages {} for ${cost}",
            self.players[id].name,
            self.board.cell(index)
        );
        self.log.add(line);
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::game::Game;
    use crate::game::invariants::check_invariants;
    use crate::game::test_support::game;

    fn brown_monopoly() -> Game {
        let mut game = game(&["A", "B"]);
        game.assign_property(0, 1);
        game.assign_property(0, 3);
        game
    }

    #[test]
    fn test_builds_evenly_down_to_floor() {
        let mut game = brown_monopoly();
        game.players[0].money = 500;
        game.improve_properties(0);
        // $50 each until cash would drop below the $200 floor
        assert_eq!(game.players[0].money, 200);
        assert_eq!(game.board.property(1).unwrap().houses, 3);
        assert_eq!(game.board.property(3).unwrap().houses, 3);
        assert_eq!(game.board.available_houses, 30);
        assert!(check_invariants(&game).is_empty());
    }

    #[test]
    fn test_builds_hotels_after_four_houses() {
        let mut game = brown_monopoly();
        game.players[0].money = 200 + 10 * 50;
        game.improve_properties(0);
        assert!(game.board.property(1).unwrap().hotel);
        assert!(game.board.property(3).unwrap().hotel);
        assert_eq!(game.board.property(1).unwrap().houses, 0);
        assert_eq!(game.board.available_houses, 36);
        assert_eq!(game.board.available_hotels, 10);
        assert_eq!(game.players[0].money, 200);
        assert!(check_invariants(&game).is_empty());
    }

    #[test]
    fn test_no_building_without_monopoly_or_on_railroads() {
        let mut game = game(&["A", "B"]);
        game.assign_property(0, 1);
        game.assign_property(0, 5);
        game.assign_property(0, 15);
        game.players[0].money = 5000;
        game.improve_properties(0);
        assert_eq!(game.board.houses_in_play(), 0);
        assert_eq!(game.players[0].money, 5000);
    }

    #[test]
    fn test_no_building_when_group_member_mortgaged() {
        let mut game = brown_monopoly();
        game.board.property_mut(3).unwrap().mortgaged = true;
        game.players[0].money = 5000;
        game.improve_properties(0);
        assert_eq!(game.board.houses_in_play(), 0);
    }

    #[test]
    fn test_house_shortage_stops_building() {
        let mut game = brown_monopoly();
        game.board.available_houses = 1;
        game.players[0].money = 5000;
        game.improve_properties(0);
        assert_eq!(game.board.houses_in_play(), 1);
        assert_eq!(game.board.available_houses, 0);
    }

    #[test]
    fn test_unmortgage_respects_floor() {
        let mut game = brown_monopoly();
        game.board.property_mut(1).unwrap().mortgaged = true;
        game.board.property_mut(3).unwrap().mortgaged = true;

        // unmortgage cost for a $60 property: 30 + 6
        game.players[0].money = 235;
        assert!(!game.unmortgage_a_property(0));

        game.players[0].money = 272;
        assert!(game.unmortgage_a_property(0));
        assert!(!game.board.property(1).unwrap().mortgaged);
        assert!(game.unmortgage_a_property(0));
        assert!(!game.board.property(3).unwrap().mortgaged);
        assert_eq!(game.players[0].money, 200);
        assert!(!game.unmortgage_a_property(0));
    }
}
