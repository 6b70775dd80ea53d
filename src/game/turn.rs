//! The per-move state machine: maintenance, roll, jail, movement, landing.

use super::{Game, MoveResult, Payee, PlayerId, RentNote};
use crate::Money;
use crate::board::{CellKind, JAIL_POSITION, Property, Tax};
use crate::cards::{Card, DeckKind};
use crate::config::truncated_share;
use crate::dice::Roll;

/// Consecutive doubles that send a player to jail instead of moving.
const DOUBLES_TO_JAIL: u8 = 3;

impl Game {
    /// Play one player's move, including any extra rolls from doubles.
    ///
    /// Each roll is preceded by trading, unmortgaging and building. A third
    /// double in a row sends the player to jail, so a move has at most three
    /// rolls.
    pub fn make_a_move(&mut self, id: PlayerId) -> MoveResult {
        if self.players[id].is_bankrupt {
            return MoveResult::Bankrupt;
        }
        loop {
            self.pre_roll_maintenance(id);
            let roll = self.dice.roll();
            if let Some(result) = self.play_roll(id, &roll) {
                return result;
            }
        }
    }

    fn pre_roll_maintenance(&mut self, id: PlayerId) {
        while self.do_a_two_way_trade(id) {}
        while self.unmortgage_a_property(id) {}
        self.improve_properties(id);
    }

    /// Resolve one roll. Returns `None` when the player rolls again.
    fn play_roll(&mut self, id: PlayerId, roll: &Roll) -> Option<MoveResult> {
        let name = self.players[id].name.clone();
        let double = if roll.is_double { " (double)" } else { "" };
        self.log.add(format!("{name} rolls {:?} = {}{double}", roll.dice, roll.sum));

        if roll.is_double && self.players[id].had_doubles + 1 >= DOUBLES_TO_JAIL {
            self.send_to_jail(id, "third double in a row");
            return Some(MoveResult::EndMove);
        }

        if self.players[id].in_jail {
            if self.stays_in_jail(id, roll.is_double) {
                return Some(MoveResult::EndMove);
            }
            if self.players[id].is_bankrupt {
                return Some(MoveResult::Bankrupt);
            }
        }

        self.advance_by(id, roll.sum);
        let ended = self.resolve_landing(id, roll);
        self.players[id].rent_note = RentNote::None;

        if self.players[id].is_bankrupt {
            return Some(MoveResult::Bankrupt);
        }
        if ended {
            return Some(MoveResult::EndMove);
        }
        if roll.is_double {
            self.players[id].had_doubles += 1;
            self.log.add(format!("{name} rolled a double and goes again"));
            None
        } else {
            self.players[id].had_doubles = 0;
            Some(MoveResult::EndMove)
        }
    }

    /// Jail attempt for this roll. Returns `true` if the player stays in.
    fn stays_in_jail(&mut self, id: PlayerId, is_double: bool) -> bool {
        let name = self.players[id].name.clone();
        if let Some(source) = self.players[id].jail_card() {
            self.players[id].set_jail_card(source, false);
            self.board.deck_mut(source).add_card(Card::get_out_of_jail_free());
            self.release_from_jail(id);
            self.log.add(format!("{name} uses a Get Out of Jail Free card"));
            false
        } else if is_double {
            self.release_from_jail(id);
            self.log.add(format!("{name} rolls a double and leaves jail"));
            false
        } else if self.players[id].days_in_jail >= 2 {
            self.release_from_jail(id);
            self.log.add(format!("{name} pays the fine to leave jail"));
            self.pay_money(id, self.mechanics.exit_jail_fine, Payee::Bank);
            false
        } else {
            self.players[id].days_in_jail += 1;
            self.log.add(format!("{name} stays in jail"));
            true
        }
    }

    fn release_from_jail(&mut self, id: PlayerId) {
        let player = &mut self.players[id];
        player.in_jail = false;
        player.days_in_jail = 0;
    }

    /// Put a player in jail; no salary, doubles reset.
    pub fn send_to_jail(&mut self, id: PlayerId, reason: &str) {
        let player = &mut self.players[id];
        player.position = JAIL_POSITION;
        player.in_jail = true;
        player.had_doubles = 0;
        player.days_in_jail = 0;
        let line = format!("{} goes to jail ({reason})", player.name);
        self.log.add(line);
    }

    pub(super) fn collect_salary(&mut self, id: PlayerId) {
        let salary = self.mechanics.salary;
        let player = &mut self.players[id];
        player.money += salary;
        let line = format!("{} passes Go and collects ${salary}", player.name);
        self.log.add(line);
    }

    /// Move forward, collecting salary when wrapping past Go.
    pub(super) fn advance_by(&mut self, id: PlayerId, steps: u32) {
        let size = self.board.size();
        let target = self.players[id].position + steps as usize;
        if target >= size {
            self.collect_salary(id);
        }
        let position = target % size;
        self.players[id].position = position;
        let line = format!(
            "{} moves to {} ({position})",
            self.players[id].name,
            self.board.cell(position)
        );
        self.log.add(line);
    }

    /// Handle the cell the player ended on. Returns `true` if the move ends.
    fn resolve_landing(&mut self, id: PlayerId, roll: &Roll) -> bool {
        for (kind, deck) in [
            (CellKind::Chance, DeckKind::Chance),
            (CellKind::CommunityChest, DeckKind::CommunityChest),
        ] {
            if self.board.cell(self.players[id].position).kind == kind
                && self.draw_card(id, deck) == MoveResult::EndMove
            {
                return true;
            }
            if self.players[id].is_bankrupt {
                return true;
            }
        }

        let position = self.players[id].position;
        let kind = self.board.cell(position).kind;
        match kind {
            CellKind::Property(property) => self.land_on_property(id, position, &property, roll.sum),
            CellKind::GoToJail => {
                self.send_to_jail(id, "landed on Go To Jail");
                return true;
            }
            CellKind::FreeParking => self.collect_free_parking(id),
            CellKind::Tax(Tax::Luxury) => {
                let tax = self.mechanics.luxury_tax;
                self.log.add(format!("{} owes luxury tax of ${tax}", self.players[id].name));
                self.pay_money(id, tax, Payee::Bank);
            }
            CellKind::Tax(Tax::Income) => {
                let tax = self.income_tax(id);
                self.log.add(format!("{} owes income tax of ${tax}", self.players[id].name));
                self.pay_money(id, tax, Payee::Bank);
            }
            CellKind::Plain | CellKind::Chance | CellKind::CommunityChest => {}
        }
        false
    }

    fn land_on_property(&mut self, id: PlayerId, position: usize, property: &Property, dice_sum: u32) {
        let name = self.players[id].name.clone();
        let cell = self.board.cell(position).name.clone();
        match property.owner {
            None => self.offer_purchase(id, position, property),
            Some(owner) if owner == id => {
                self.log.add(format!("{name} lands on their own {cell}"));
            }
            Some(owner) if property.mortgaged => {
                let owner = &self.players[owner].name;
                let line = format!("{name} lands on {cell}, mortgaged by {owner}: no rent");
                self.log.add(line);
            }
            Some(owner) => {
                let rent = self.rent_due(id, property, dice_sum);
                let note = match self.players[id].rent_note {
                    RentNote::None => "",
                    RentNote::DoubleRent => " (double rent)",
                    RentNote::TenTimesDice => " (10x dice)",
                };
                let line = format!(
                    "{name} lands on {cell} owned by {}, rent ${rent}{note}",
                    self.players[owner].name
                );
                self.log.add(line);
                self.pay_money(id, rent, Payee::Player(owner));
            }
        }
    }

    /// Rent owed for landing, including any pending card annotation.
    #[must_use]
    pub fn rent_due(&self, id: PlayerId, property: &Property, dice_sum: u32) -> Money {
        match self.players[id].rent_note {
            RentNote::None => property.rent(dice_sum),
            RentNote::DoubleRent => property.rent(dice_sum) * 2,
            RentNote::TenTimesDice => 10 * Money::from(dice_sum),
        }
    }

    fn offer_purchase(&mut self, id: PlayerId, position: usize, property: &Property) {
        let player = &self.players[id];
        let cost = property.cost_base;
        let willing = cost <= player.money
            && player.money - cost >= player.policy.unspendable_cash
            && !player.policy.ignore_property_groups.contains(&property.group);
        let cell = self.board.cell(position).name.clone();
        if !willing {
            let line = format!("{} does not buy {cell} (${cost})", player.name);
            self.log.add(line);
            return;
        }

        if let Some(slot) = self.board.property_mut(position) {
            slot.owner = Some(id);
        }
        let player = &mut self.players[id];
        player.money -= cost;
        player.owned.push(position);
        let line = format!("{} buys {cell} for ${cost}", player.name);
        self.log.add(line);
        self.board.recalculate_monopoly_multipliers(position);
        self.refresh_trade_lists();
    }

    fn income_tax(&self, id: PlayerId) -> Money {
        let share = truncated_share(self.net_worth(id, true), self.mechanics.income_tax_percentage);
        self.mechanics.income_tax.min(share)
    }

    fn collect_free_parking(&mut self, id: PlayerId) {
        if !self.mechanics.free_parking_money {
            return;
        }
        let pot = std::mem::take(&mut self.board.free_parking_money);
        let player = &mut self.players[id];
        player.money += pot;
        let line = format!("{} collects ${pot} from Free Parking", player.name);
        self.log.add(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Group, standard_cells};
    use crate::cards::CardEffect;
    use crate::config::GameMechanics;
    use crate::events::EventLog;
    use crate::game::test_support::{game, settings};

    fn roll(a: u8, b: u8) -> Roll {
        Roll::new(vec![a, b])
    }

    #[test]
    fn test_wrap_pays_salary_once() {
        let mut game = game(&["A", "B"]);
        game.players[0].position = 35;
        assert_eq!(game.play_roll(0, &roll(5, 3)), Some(MoveResult::EndMove));
        assert_eq!(game.players[0].position, 3);
        // Baltic costs $60 and is bought after the $200 salary
        assert_eq!(game.players[0].money, 1500 + 200 - 60);
        let salaries = game.log.lines().iter().filter(|l| l.contains("passes Go")).count();
        assert_eq!(salaries, 1);
    }

    #[test]
    fn test_double_rolls_again() {
        let mut game = game(&["A", "B"]);
        assert_eq!(game.play_roll(0, &roll(3, 3)), None);
        assert_eq!(game.players[0].had_doubles, 1);
        assert_eq!(game.players[0].position, 6);
    }

    #[test]
    fn test_third_double_goes_to_jail() {
        let mut game = game(&["A", "B"]);
        game.players[0].had_doubles = 2;
        game.players[0].position = 3;
        assert_eq!(game.play_roll(0, &roll(2, 2)), Some(MoveResult::EndMove));
        assert_eq!(game.players[0].position, JAIL_POSITION);
        assert!(game.players[0].in_jail);
        assert_eq!(game.players[0].had_doubles, 0);
        assert_eq!(game.players[0].money, 1500);
    }

    #[test]
    fn test_go_to_jail_cell() {
        let mut game = game(&["A", "B"]);
        game.players[0].position = 26;
        assert_eq!(game.play_roll(0, &roll(2, 2)), Some(MoveResult::EndMove));
        assert!(game.players[0].in_jail);
        assert_eq!(game.players[0].position, JAIL_POSITION);
        assert_eq!(game.players[0].had_doubles, 0);
    }

    #[test]
    fn test_jail_stay_then_fine() {
        let mut game = game(&["A", "B"]);
        game.send_to_jail(0, "test");

        assert_eq!(game.play_roll(0, &roll(1, 2)), Some(MoveResult::EndMove));
        assert_eq!(game.players[0].days_in_jail, 1);
        assert_eq!(game.play_roll(0, &roll(1, 2)), Some(MoveResult::EndMove));
        assert_eq!(game.players[0].days_in_jail, 2);
        assert_eq!(game.players[0].position, JAIL_POSITION);

        // third attempt: pay $50, leave and move 3 to States Avenue ($140)
        assert_eq!(game.play_roll(0, &roll(1, 2)), Some(MoveResult::EndMove));
        assert!(!game.players[0].in_jail);
        assert_eq!(game.players[0].position, 13);
        assert_eq!(game.players[0].money, 1500 - 50 - 140);
    }

    #[test]
    fn test_double_leaves_jail_and_rolls_again() {
        let mut game = game(&["A", "B"]);
        game.send_to_jail(0, "test");
        assert_eq!(game.play_roll(0, &roll(4, 4)), None);
        assert!(!game.players[0].in_jail);
        assert_eq!(game.players[0].position, 18);
    }

    #[test]
    fn test_jail_card_used_and_returned() {
        let mut game = game(&["A", "B"]);
        game.send_to_jail(0, "test");
        let chest = game.board.chest.len();
        game.players[0].jail_card_chest = true;
        assert_eq!(game.play_roll(0, &roll(1, 2)), Some(MoveResult::EndMove));
        assert!(!game.players[0].in_jail);
        assert!(!game.players[0].jail_card_chest);
        assert_eq!(game.board.chest.len(), chest + 1);
    }

    #[test]
    fn test_rent_paid_to_owner() {
        let mut game = game(&["A", "B"]);
        game.assign_property(1, 1);
        game.assign_property(1, 3);
        // brown monopoly doubles Baltic's $4 base rent
        game.players[0].position = 0;
        game.play_roll(0, &roll(1, 2));
        assert_eq!(game.players[0].money, 1492);
        assert_eq!(game.players[1].money, 1508);
    }

    #[test]
    fn test_mortgaged_property_charges_nothing() {
        let mut game = game(&["A", "B"]);
        game.assign_property(1, 3);
        game.board.property_mut(3).unwrap().mortgaged = true;
        game.play_roll(0, &roll(1, 2));
        assert_eq!(game.players[0].money, 1500);
    }

    #[test]
    fn test_ignored_group_not_bought() {
        let mut settings = settings(&["A", "B"]);
        settings.players[0]
            .policy
            .ignore_property_groups
            .insert(Group::Brown);
        let mut game = Game::new(1, 0, &settings).unwrap();
        game.play_roll(0, &roll(1, 2));
        assert_eq!(game.board.property(3).unwrap().owner, None);
        assert!(game.log.lines().iter().any(|l| l.contains("does not buy")));
    }

    #[test]
    fn test_purchase_keeps_floor() {
        let mut game = game(&["A", "B"]);
        game.players[0].money = 259;
        game.players[0].position = 34;
        // Boardwalk at 39 is not reached; Park Place ($350) is unaffordable
        game.play_roll(0, &roll(1, 2));
        assert_eq!(game.players[0].position, 37);
        assert_eq!(game.board.property(37).unwrap().owner, None);
    }

    #[test]
    fn test_income_tax_is_capped_share() {
        let mut game = game(&["A", "B"]);
        game.players[0].money = 1000;
        game.players[0].position = 1;
        game.play_roll(0, &roll(1, 2));
        assert_eq!(game.players[0].position, 4);
        assert_eq!(game.players[0].money, 900);

        game.players[1].money = 5000;
        game.players[1].position = 1;
        game.play_roll(1, &roll(1, 2));
        assert_eq!(game.players[1].money, 4800);
    }

    #[test]
    fn test_luxury_tax_and_free_parking_pot() {
        let mut settings = settings(&["A", "B"]);
        settings.mechanics.free_parking_money = true;
        let mut game = Game::new(1, 0, &settings).unwrap();
        game.players[0].position = 35;
        game.play_roll(0, &roll(1, 2));
        assert_eq!(game.players[0].money, 1400);
        assert_eq!(game.board.free_parking_money, 100);

        game.players[1].position = 17;
        game.play_roll(1, &roll(1, 2));
        assert_eq!(game.players[1].money, 1600);
        assert_eq!(game.board.free_parking_money, 0);
    }

    #[test]
    fn test_utility_card_charges_ten_times_dice() {
        let settings = settings(&["A", "B"]);
        let card = Card::new("nearest utility", CardEffect::AdvanceToNearest(Group::Utilities));
        let board = Board::with_layout(
            standard_cells(),
            vec![card],
            Vec::new(),
            &GameMechanics::default(),
        )
        .unwrap();
        let mut game = Game::with_board(1, 0, &settings, board, EventLog::new()).unwrap();
        game.assign_property(1, 12);

        game.play_roll(0, &roll(3, 4));
        assert_eq!(game.players[0].position, 12);
        assert_eq!(game.players[0].money, 1430);
        assert_eq!(game.players[1].money, 1570);
        assert_eq!(game.players[0].rent_note, RentNote::None);
    }

    #[test]
    fn test_make_a_move_ends() {
        let mut game = game(&["A", "B"]);
        for _ in 0..50 {
            let result = game.make_a_move(0);
            assert_ne!(result, MoveResult::Continue);
            assert!(game.players[0].had_doubles < DOUBLES_TO_JAIL);
        }
    }
}
