//! Read-only frame snapshot for the presenter
//!
//! Built after `tick` each frame and handed to whatever draws the board.
//! Nothing here mutates the game.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{Card, CardId, GameState, Owner};

/// Drawing-relevant slice of a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    pub id: CardId,
    pub owner: Owner,
    pub in_hand: bool,
    pub pos: Vec2,
    pub size: Vec2,
    pub attack_left: u32,
    pub attack_right: u32,
    pub has_acted: bool,
    pub dragging: bool,
    pub shaking: bool,
    pub flashing: bool,
    pub crossed: bool,
    /// Fade/shrink progress (0..1) while pending removal
    pub destroy_progress: Option<f32>,
}

impl CardView {
    fn from_card(card: &Card, size: Vec2, now_ms: f64) -> Self {
        let visual = &card.visual;
        Self {
            id: card.id,
            owner: card.owner,
            in_hand: card.zone.is_hand(),
            pos: card.pos,
            size,
            attack_left: card.combat.attack_left,
            attack_right: card.combat.attack_right,
            has_acted: card.combat.has_acted,
            dragging: visual.dragging,
            shaking: visual.shake.is_active(now_ms),
            flashing: visual.hit_flash.is_active(now_ms),
            crossed: visual.cross.is_active(now_ms),
            destroy_progress: visual.removal.map(|r| r.progress(now_ms)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotView {
    pub index: usize,
    pub center: Vec2,
    pub size: Vec2,
    pub occupied: bool,
}

/// Everything the presenter needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub now_ms: f64,
    pub locked: bool,
    /// Draw order: by id, dragged card last
    pub cards: Vec<CardView>,
    pub slots: Vec<SlotView>,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let now = state.now_ms;
        let card_size = state.settings.geometry.card_size;

        // `cards` is already id-sorted; a stable sort keeps that order
        let mut cards: Vec<CardView> = state
            .cards
            .iter()
            .map(|c| CardView::from_card(c, card_size, now))
            .collect();
        cards.sort_by_key(|c| c.dragging);

        let slots = state
            .board
            .slots
            .iter()
            .map(|s| SlotView {
                index: s.index,
                center: s.center,
                size: state.board.slot_size,
                occupied: state.card_at_slot(s.index).is_some(),
            })
            .collect();

        Self {
            now_ms: now,
            locked: state.lock.is_held(),
            cards,
            slots,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
