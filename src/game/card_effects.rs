//! Drawing cards and applying their effects.

use log::warn;

use super::{Game, MoveResult, Payee, PlayerId, RentNote};
use crate::Money;
use crate::board::Group;
use crate::cards::{CardEffect, DeckKind};

impl Game {
    /// Draw the next card from a deck and apply it.
    ///
    /// A drawn jail card leaves the deck until it is used or forfeited.
    pub fn draw_card(&mut self, id: PlayerId, kind: DeckKind) -> MoveResult {
        let Some(card) = self.board.deck_mut(kind).draw().cloned() else {
            return MoveResult::Continue;
        };
        let line = format!("{} draws \"{}\"", self.players[id].name, card.text);
        self.log.add(line);

        let result = self.apply_card(id, card.effect, kind);
        if card.effect == CardEffect::GetOutOfJailFree {
            let removed = self.board.deck_mut(kind).remove_card(&card.text);
            if removed.is_none() {
                warn!("game {}: drawn jail card missing from its deck", self.number);
            }
            debug_assert!(removed.is_some(), "drawn jail card must be in its deck");
        }
        if self.players[id].is_bankrupt {
            MoveResult::Bankrupt
        } else {
            result
        }
    }

    /// Apply a card effect to the player who drew it.
    ///
    /// Only going to jail ends the move.
    pub fn apply_card(&mut self, id: PlayerId, effect: CardEffect, source: DeckKind) -> MoveResult {
        let name = self.players[id].name.clone();
        match effect {
            CardEffect::AdvanceTo { target } => self.advance_to(id, target),
            CardEffect::AdvanceToNearest(group) => {
                if let Some(target) = self.board.nearest(self.players[id].position, group) {
                    self.advance_to(id, target);
                    self.players[id].rent_note = match group {
                        Group::Utilities => RentNote::TenTimesDice,
                        Group::Railroads => RentNote::DoubleRent,
                        _ => RentNote::None,
                    };
                }
            }
            CardEffect::GoBack(spaces) => {
                let size = self.board.size();
                let position = (self.players[id].position + size - spaces % size) % size;
                self.players[id].position = position;
                let line = format!("{name} goes back to {}", self.board.cell(position));
                self.log.add(line);
            }
            CardEffect::GetOutOfJailFree => {
                self.players[id].set_jail_card(source, true);
                self.log.add(format!("{name} keeps the Get Out of Jail Free card"));
            }
            CardEffect::GoToJail => {
                self.send_to_jail(id, "card");
                return MoveResult::EndMove;
            }
            CardEffect::BankPays(amount) => {
                self.players[id].money += amount;
                self.log.add(format!("{name} receives ${amount} from the bank"));
            }
            CardEffect::PayBank(amount) => self.pay_money(id, amount, Payee::Bank),
            CardEffect::Repairs { per_house, per_hotel } => {
                let cost = self.repair_cost(id, per_house, per_hotel);
                if cost > 0 {
                    self.pay_money(id, cost, Payee::Bank);
                } else {
                    self.log.add(format!("{name} has no buildings to repair"));
                }
            }
            CardEffect::CollectFromEachPlayer(amount) => {
                for other in 0..self.players.len() {
                    if other != id && !self.players[other].is_bankrupt {
                        self.pay_money(other, amount, Payee::Player(id));
                    }
                }
            }
            CardEffect::PayEachPlayer(amount) => {
                for other in 0..self.players.len() {
                    if self.players[id].is_bankrupt {
                        break;
                    }
                    if other != id && !self.players[other].is_bankrupt {
                        self.pay_money(id, amount, Payee::Player(other));
                    }
                }
            }
        }
        MoveResult::Continue
    }

    /// Move straight to a cell, collecting salary if that passes Go.
    fn advance_to(&mut self, id: PlayerId, target: usize) {
        if self.players[id].position > target {
            self.collect_salary(id);
        }
        self.players[id].position = target;
        let line = format!("{} advances to {}", self.players[id].name, self.board.cell(target));
        self.log.add(line);
    }

    fn repair_cost(&self, id: PlayerId, per_house: Money, per_hotel: Money) -> Money {
        self.players[id]
            .owned
            .iter()
            .filter_map(|&index| self.board.property(index))
            .map(|p| {
                if p.hotel {
                    per_hotel
                } else {
                    per_house * Money::from(p.houses)
                }
            })
            .sum()
    }
}
