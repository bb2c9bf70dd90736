//! Interaction lock and the staged destruction pipeline
//!
//! Destruction is visually staged rather than instant:
//! 1. hit flash (`AwaitingFlash`)
//! 2. doomed cards flagged for removal, slots freed, fade-out (`AwaitingRemoval`)
//! 3. purge and lock release
//!
//! Deadlines are checked against the sim clock on every tick, so tests drive
//! the whole sequence by advancing time.

use serde::{Deserialize, Serialize};

use super::anim::{AnimationDone, MoveCompletion};
use super::state::{CardId, GameEvent, GameState, Removal, Zone};

/// Advisory mutual exclusion for state-changing sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionLock {
    #[default]
    Free,
    /// A dropped card is animating to a slot or back to the hand
    Placement { card: CardId },
    /// An attack is flashing/fading its casualties
    Combat,
}

impl InteractionLock {
    pub fn is_free(&self) -> bool {
        matches!(self, InteractionLock::Free)
    }

    pub fn is_held(&self) -> bool {
        !self.is_free()
    }

    /// Take the lock; fails if anyone holds it
    pub fn try_acquire(&mut self, holder: InteractionLock) -> bool {
        if self.is_held() {
            return false;
        }
        log::debug!("Lock acquired: {:?}", holder);
        *self = holder;
        true
    }

    /// Release only if `holder` is the current owner
    pub fn release(&mut self, holder: InteractionLock) {
        if *self == holder {
            log::debug!("Lock released: {:?}", holder);
            *self = InteractionLock::Free;
        }
    }
}

/// Destruction sequence stage
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Sequencer {
    #[default]
    Idle,
    /// Combatants flashing; `doomed` start fading at `fire_at_ms`
    AwaitingFlash { fire_at_ms: f64, doomed: Vec<CardId> },
    /// Doomed cards fading; purge and unlock at `fire_at_ms`
    AwaitingRemoval { fire_at_ms: f64 },
}

impl Sequencer {
    pub fn is_idle(&self) -> bool {
        matches!(self, Sequencer::Idle)
    }

    /// Queue a destruction sequence. The caller must already hold
    /// `InteractionLock::Combat`.
    pub fn begin(&mut self, doomed: Vec<CardId>, fire_at_ms: f64) {
        log::debug!("Sequencer: awaiting flash for {:?}", doomed);
        *self = Sequencer::AwaitingFlash { fire_at_ms, doomed };
    }
}

/// Fire whichever stage deadline has elapsed
pub fn advance(state: &mut GameState) {
    let now = state.now_ms;
    match std::mem::take(&mut state.sequencer) {
        Sequencer::AwaitingFlash { fire_at_ms, doomed } if now >= fire_at_ms => {
            // Stages chain off the scheduled deadline, not the tick that noticed it
            let remove_at_ms = fire_at_ms + state.settings.timings.destroy_ms;
            mark_for_removal(state, &doomed, fire_at_ms, remove_at_ms);
            log::debug!("Sequencer: awaiting removal");
            state.sequencer = Sequencer::AwaitingRemoval {
                fire_at_ms: remove_at_ms,
            };
        }
        Sequencer::AwaitingRemoval { fire_at_ms } if now >= fire_at_ms => {
            purge_expired(state);
            state.lock.release(InteractionLock::Combat);
            state.push_event(GameEvent::SequenceFinished);
            log::info!("Destruction sequence finished");
        }
        pending => state.sequencer = pending,
    }
}

/// Stage 1: flag doomed cards and free their slots in the same step
fn mark_for_removal(state: &mut GameState, doomed: &[CardId], started_ms: f64, deadline_ms: f64) {
    for &id in doomed {
        let Some(card) = state.find_card_mut(id) else {
            continue;
        };
        card.visual.removal = Some(Removal {
            started_ms,
            deadline_ms,
        });
        card.visual.dragging = false;
        card.visual.anim = None;
        if let Zone::Field { slot } = card.zone {
            if let Some(s) = state.board.slots.get_mut(slot) {
                if s.occupant == Some(id) {
                    s.occupant = None;
                }
            }
        }
        state.push_event(GameEvent::CardDestroyed { card: id });
    }
}

/// Drop every card whose removal deadline has passed. Runs every tick as a
/// backstop to the staged pipeline. Returns how many cards were purged.
pub fn purge_expired(state: &mut GameState) -> usize {
    let now = state.now_ms;
    let expired: Vec<CardId> = state
        .cards
        .iter()
        .filter(|c| c.visual.removal.is_some_and(|r| now >= r.deadline_ms))
        .map(|c| c.id)
        .collect();
    if expired.is_empty() {
        return 0;
    }

    for &id in &expired {
        state.board.vacate(id);
    }
    state.cards.retain(|c| !expired.contains(&c.id));
    log::debug!("Purged {} card(s)", expired.len());
    expired.len()
}

/// Apply the board change a finished move animation stands for, then release
/// the placement lock
pub fn on_animation_done(state: &mut GameState, done: AnimationDone) {
    let id = done.card;
    let Some(card) = state.find_card_mut(id) else {
        state.lock.release(InteractionLock::Placement { card: id });
        return;
    };

    match done.completion {
        MoveCompletion::PlaceInSlot { slot } => {
            let previous = card.zone.field_slot();
            card.zone = Zone::Field { slot };
            if let Some(prev) = previous.filter(|&p| p != slot) {
                if let Some(s) = state.board.slots.get_mut(prev) {
                    s.occupant = None;
                }
            }
            if let Some(s) = state.board.slots.get_mut(slot) {
                s.occupant = Some(id);
            }
            log::info!("Card {} placed in slot {}", id, slot);
            state.push_event(GameEvent::CardPlaced { card: id, slot });
        }
        MoveCompletion::ReturnToHand => {
            // Zone never changed while the card was dragged
            debug_assert!(card.zone.is_hand());
            log::debug!("Card {} returned to hand", id);
            state.push_event(GameEvent::CardReturned { card: id });
        }
    }

    state.lock.release(InteractionLock::Placement { card: id });
}
