//! Two-way property trades.
//!
//! Players advertise properties that would complete someone's colour set.
//! A trade swaps such properties in both directions, trimmed until both
//! sides accept the value gap, with cash making up the difference.

#![allow(clippy::cast_precision_loss)]

use std::collections::BTreeSet;

use super::{Game, PlayerId};
use crate::Money;
use crate::board::Group;

impl Game {
    /// Recompute one player's want-to-sell and want-to-buy sets.
    ///
    /// Only groups with every member owned are considered. A lone property
    /// the player holds in a group goes on the sell list. A lone property
    /// held by someone else goes on the buy list.
    pub fn update_lists_of_properties_to_trade(&mut self, id: PlayerId) {
        let player = &self.players[id];
        if player.is_bankrupt || !player.policy.is_willing_to_make_trades {
            self.players[id].wants_to_sell.clear();
            self.players[id].wants_to_buy.clear();
            return;
        }

        let mut sell = BTreeSet::new();
        let mut buy = BTreeSet::new();
        for members in self.board.groups().values() {
            let mut mine = Vec::new();
            let mut others = Vec::new();
            let mut fully_owned = true;
            for &index in members {
                match self.board.property(index).and_then(|p| p.owner) {
                    Some(owner) if owner == id => mine.push(index),
                    Some(_) => others.push(index),
                    None => fully_owned = false,
                }
            }
            if !fully_owned {
                continue;
            }
            if let [single] = mine.as_slice() {
                sell.insert(*single);
            }
            if let [single] = others.as_slice() {
                buy.insert(*single);
            }
        }
        self.players[id].wants_to_sell = sell;
        self.players[id].wants_to_buy = buy;
    }

    /// Recompute every player's trade lists.
    pub fn refresh_trade_lists(&mut self) {
        for id in 0..self.players.len() {
            self.update_lists_of_properties_to_trade(id);
        }
    }

    /// Look for one acceptable trade with another player and execute it.
    ///
    /// Returns `true` if a trade happened. An unaffordable deal stops the
    /// search for this attempt.
    pub fn do_a_two_way_trade(&mut self, id: PlayerId) -> bool {
        for other in 0..self.players.len() {
            if other == id || self.players[other].is_bankrupt {
                continue;
            }
            let me = &self.players[id];
            let them = &self.players[other];
            let gives: Vec<usize> = me.wants_to_sell.intersection(&them.wants_to_buy).copied().collect();
            let receives: Vec<usize> = me.wants_to_buy.intersection(&them.wants_to_sell).copied().collect();
            if gives.is_empty() || receives.is_empty() {
                continue;
            }

            let (gives, receives) = self.fair_deal(id, other, gives, receives);
            if gives.is_empty() || receives.is_empty() {
                continue;
            }

            let diff = self.total_cost(&gives) - self.total_cost(&receives);
            if diff != 0 {
                let payer = &self.players[if diff > 0 { other } else { id }];
                if payer.money - diff.abs() < payer.policy.unspendable_cash {
                    return false;
                }
            }
            self.make_trade(id, other, &gives, &receives, diff);
            return true;
        }
        false
    }

    fn total_cost(&self, cells: &[usize]) -> Money {
        cells
            .iter()
            .filter_map(|&index| self.board.property(index))
            .map(|p| p.cost_base)
            .sum()
    }

    /// Trim a proposed swap until both players' tolerances accept it.
    ///
    /// Deals made only of two-member groups are dropped: they can complete
    /// a set for one side only by breaking it for the other. A two-member
    /// group offered both ways is withdrawn from the longer side.
    fn fair_deal(
        &self,
        id: PlayerId,
        other: PlayerId,
        mut gives: Vec<usize>,
        mut receives: Vec<usize>,
    ) -> (Vec<usize>, Vec<usize>) {
        let group_of = |index: usize| self.board.property(index).map(|p| p.group);
        let pair_groups: BTreeSet<Group> = self
            .board
            .groups()
            .iter()
            .filter(|(_, members)| members.len() == 2)
            .map(|(group, _)| *group)
            .collect();

        let only_pairs = gives
            .iter()
            .chain(&receives)
            .all(|&index| group_of(index).is_some_and(|g| pair_groups.contains(&g)));
        if only_pairs {
            return (Vec::new(), Vec::new());
        }

        for group in &pair_groups {
            let in_gives = gives.iter().any(|&i| group_of(i) == Some(*group));
            let in_receives = receives.iter().any(|&i| group_of(i) == Some(*group));
            if !(in_gives && in_receives) {
                continue;
            }
            let drop_from_gives = gives.len() >= receives.len();
            let drop_from_receives = receives.len() >= gives.len();
            if drop_from_gives {
                gives.retain(|&i| group_of(i) != Some(*group));
            }
            if drop_from_receives {
                receives.retain(|&i| group_of(i) != Some(*group));
            }
        }

        let cost = |index: usize| self.board.property(index).map_or(0, |p| p.cost_base);
        gives.sort_by_key(|&i| std::cmp::Reverse(cost(i)));
        receives.sort_by_key(|&i| std::cmp::Reverse(cost(i)));

        let mine = &self.players[id].policy;
        let theirs = &self.players[other].policy;
        while !gives.is_empty() && !receives.is_empty() {
            let given = self.total_cost(&gives);
            let received = self.total_cost(&receives);
            let diff = given - received;
            let giver_ratio = given as f64 / received as f64;
            let receiver_ratio = received as f64 / given as f64;

            if diff > mine.trade_max_diff_absolute || giver_ratio > mine.trade_max_diff_relative {
                gives.pop();
            } else if -diff > theirs.trade_max_diff_absolute || receiver_ratio > theirs.trade_max_diff_relative {
                receives.pop();
            } else {
                break;
            }
        }
        (gives, receives)
    }

    /// Swap properties and settle the value difference in cash.
    ///
    /// A positive `diff` means `id` gives more value and `other` pays it.
    pub fn make_trade(&mut self, id: PlayerId, other: PlayerId, gives: &[usize], receives: &[usize], diff: Money) {
        self.players[other].money -= diff;
        self.players[id].money += diff;

        for &index in receives {
            self.move_ownership(index, other, id);
        }
        for &index in gives {
            self.move_ownership(index, id, other);
        }
        for &index in gives.iter().chain(receives) {
            self.board.recalculate_monopoly_multipliers(index);
        }

        let names = |cells: &[usize]| {
            cells
                .iter()
                .map(|&i| self.board.cell(i).name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut line = format!(
            "Trade: {} gives [{}] to {} for [{}]",
            self.players[id].name,
            names(gives),
            self.players[other].name,
            names(receives)
        );
        if diff > 0 {
            line.push_str(&format!(", {} adds ${diff}", self.players[other].name));
        } else if diff < 0 {
            line.push_str(&format!(", {} adds ${}", self.players[id].name, -diff));
        }
        self.log.add(line);
        self.refresh_trade_lists();
    }

    fn move_ownership(&mut self, index: usize, from: PlayerId, to: PlayerId) {
        if let Some(property) = self.board.property_mut(index) {
            property.owner = Some(to);
        }
        self.players[from].owned.retain(|&i| i != index);
        self.players[to].owned.push(index);
    }
}
