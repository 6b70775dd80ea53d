//! Game invariants - consistency checks that detect engine bugs.
//!
//! None of these can be broken by play. A violation means the engine lost
//! track of money, buildings, ownership or cards.

use std::collections::BTreeSet;

use crate::cards::GET_OUT_OF_JAIL_FREE;
use crate::game::Game;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(game: &Game) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mechanics = game.mechanics();
    let board = &game.board;

    // Building supply is conserved
    let houses = board.houses_in_play() + board.available_houses;
    if houses != mechanics.available_houses {
        violations.push(violation(format!(
            "{houses} houses in play and bank, expected {}",
            mechanics.available_houses
        )));
    }
    let hotels = board.hotels_in_play() + board.available_hotels;
    if hotels != mechanics.available_hotels {
        violations.push(violation(format!(
            "{hotels} hotels in play and bank, expected {}",
            mechanics.available_hotels
        )));
    }

    // Property state
    for (index, cell) in board.cells().iter().enumerate() {
        let Some(property) = cell.property() else {
            continue;
        };
        if property.houses > 4 {
            violations.push(violation(format!("{cell} has {} houses", property.houses)));
        }
        if property.hotel && property.houses > 0 {
            violations.push(violation(format!("{cell} has a hotel and houses")));
        }
        if property.mortgaged && property.is_improved() {
            violations.push(violation(format!("{cell} is mortgaged with buildings")));
        }
        match property.owner {
            None if property.is_improved() || property.mortgaged => {
                violations.push(violation(format!("unowned {cell} is built on or mortgaged")));
            }
            Some(owner) if !game.players.get(owner).is_some_and(|p| p.owned.contains(&index)) => {
                violations.push(violation(format!("{cell} names owner {owner} who does not list it")));
            }
            _ => {}
        }
    }

    // Player state
    for (id, player) in game.players.iter().enumerate() {
        if player.money < 0 {
            violations.push(violation(format!("{} has negative cash {}", player.name, player.money)));
        }
        let mut seen = BTreeSet::new();
        for &index in &player.owned {
            if !seen.insert(index) {
                violations.push(violation(format!("{} lists cell {index} twice", player.name)));
            }
            if board.property(index).and_then(|p| p.owner) != Some(id) {
                violations.push(violation(format!(
                    "{} lists cell {index} without owning it",
                    player.name
                )));
            }
        }
        if player.is_bankrupt && (!player.owned.is_empty() || player.money != 0) {
            violations.push(violation(format!("bankrupt {} still holds assets", player.name)));
        }
        if player.days_in_jail > 2 || player.had_doubles > 2 {
            violations.push(violation(format!("{} has out-of-range jail or doubles counters", player.name)));
        }
    }

    // A jail card is either in its deck or held, never both
    for (deck, held) in [
        (&board.chance, game.players.iter().filter(|p| p.jail_card_chance).count()),
        (&board.chest, game.players.iter().filter(|p| p.jail_card_chest).count()),
    ] {
        let in_deck = deck.cards().iter().filter(|c| c.text == GET_OUT_OF_JAIL_FREE).count();
        if in_deck + held > 1 {
            violations.push(violation(format!(
                "{in_deck} jail cards in deck and {held} held"
            )));
        }
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(game: &Game) {
    let violations = check_invariants(game);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_game: &Game) {}
