//! Circular deck with a draw cursor.

use super::Card;

/// Ordered cards and a cursor; drawing cycles through the cards forever.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
    pointer: usize,
}

impl Deck {
    /// Deck in the given order, cursor at the first card.
    #[must_use]
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards, pointer: 0 }
    }

    /// Number of cards currently in the deck.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the deck is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in deck order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Cursor position: index of the next card drawn.
    #[must_use]
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Reorder the cards in place (for shuffling). The cursor is unchanged.
    pub fn cards_mut(&mut self) -> &mut [Card] {
        &mut self.cards
    }

    /// Card at the cursor; the cursor then advances, wrapping to the start.
    pub fn draw(&mut self) -> Option<&Card> {
        if self.cards.is_empty() {
            return None;
        }
        let index = self.pointer;
        self.pointer = (self.pointer + 1) % self.cards.len();
        self.cards.get(index)
    }

    /// Remove the first card with this text, keeping the next draw unchanged.
    ///
    /// Returns `None` and leaves the deck untouched if no card matches.
    pub fn remove_card(&mut self, text: &str) -> Option<Card> {
        let index = self.cards.iter().position(|card| card.text == text)?;
        let card = self.cards.remove(index);
        if self.pointer > index {
            self.pointer -= 1;
        } else if self.pointer >= self.cards.len() {
            self.pointer = 0;
        }
        Some(card)
    }

    /// Put a card at the bottom of the deck.
    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }
}
