//! Pointer gesture interpretation
//!
//! Turns raw pointer events into moves. At most one session is live: a drag
//! (hand card toward a slot) or a swipe (field card attacking a neighbor).
//! Events from any other pointer are ignored until the session ends.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anim::{MoveCompletion, start_move};
use super::combat::{self, AttackVerdict, Direction};
use super::sequencer::InteractionLock;
use super::state::{Card, CardId, GameEvent, GameState, Owner};

/// Device pointer identity (mouse, pen or one touch contact)
pub type PointerId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// Treated exactly like `Up`
    Cancel,
}

/// A pointer event in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub phase: PointerPhase,
    pub pos: Vec2,
}

impl PointerEvent {
    pub fn new(pointer_id: PointerId, phase: PointerPhase, pos: Vec2) -> Self {
        Self {
            pointer_id,
            phase,
            pos,
        }
    }
}

/// The live pointer interaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InteractionSession {
    Drag {
        pointer_id: PointerId,
        card: CardId,
        /// Pointer position minus card center at grab time
        grab_offset: Vec2,
        /// Card position before the drag started
        origin: Vec2,
    },
    Swipe {
        pointer_id: PointerId,
        card: CardId,
        start: Vec2,
        current: Vec2,
    },
}

impl InteractionSession {
    pub fn pointer_id(&self) -> PointerId {
        match *self {
            InteractionSession::Drag { pointer_id, .. } => pointer_id,
            InteractionSession::Swipe { pointer_id, .. } => pointer_id,
        }
    }

    pub fn card(&self) -> CardId {
        match *self {
            InteractionSession::Drag { card, .. } => card,
            InteractionSession::Swipe { card, .. } => card,
        }
    }
}

/// Which kind of session a pointer-down would start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Drag,
    Swipe,
}

/// What a pointer event did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GestureOutcome {
    /// Rejected: locked, busy, foreign pointer or nothing hit
    Ignored,
    DragStarted { card: CardId },
    SwipeStarted { card: CardId },
    /// Session tracking updated
    Moved,
    /// Drag released; `slot` is None when the card heads back to its origin
    Dropped { card: CardId, slot: Option<usize> },
    /// Swipe released; `attack` is None for short or mostly vertical motion
    Swiped {
        card: CardId,
        attack: Option<(Direction, AttackVerdict)>,
    },
    /// Session ended but its card was already gone
    Abandoned { card: CardId },
}

/// Feed one pointer event through the session state machine
pub fn handle_pointer(state: &mut GameState, event: &PointerEvent) -> GestureOutcome {
    match event.phase {
        PointerPhase::Down => pointer_down(state, event),
        PointerPhase::Move => pointer_move(state, event),
        PointerPhase::Up | PointerPhase::Cancel => pointer_up(state, event),
    }
}

/// Horizontal swipe direction, if the motion qualifies
pub fn classify_swipe(delta: Vec2, threshold: f32) -> Option<Direction> {
    let dx = delta.x.abs();
    if dx < threshold || dx <= delta.y.abs() {
        return None;
    }
    Some(if delta.x < 0.0 {
        Direction::Left
    } else {
        Direction::Right
    })
}

/// Top-most card under `point` that a gesture may start on. Draggable hand
/// cards are considered before swipeable field cards; within each group the
/// newest card (highest id) wins.
pub fn hit_test(state: &GameState, point: Vec2) -> Option<(CardId, SessionKind)> {
    let card_size = state.settings.geometry.card_size;
    let under = |c: &&Card| c.is_live() && c.bounds(card_size).contains_point(point);

    let draggable = state
        .cards
        .iter()
        .rev()
        .filter(under)
        .find(|c| c.zone.is_hand() && !c.is_animating());
    if let Some(card) = draggable {
        return Some((card.id, SessionKind::Drag));
    }

    state
        .cards
        .iter()
        .rev()
        .filter(under)
        .find(|c| c.zone.is_field() && c.owner == Owner::Player)
        .map(|c| (c.id, SessionKind::Swipe))
}

/// First free slot (in lane order) whose hit region contains `point`
pub fn drop_target(state: &GameState, point: Vec2) -> Option<usize> {
    (0..state.board.len()).find(|&i| {
        state
            .board
            .slot_bounds(i)
            .is_some_and(|r| r.contains_point(point))
            && state.card_at_slot(i).is_none()
    })
}

fn pointer_down(state: &mut GameState, event: &PointerEvent) -> GestureOutcome {
    if state.lock.is_held() || state.session.is_some() {
        return GestureOutcome::Ignored;
    }
    let Some((id, kind)) = hit_test(state, event.pos) else {
        return GestureOutcome::Ignored;
    };
    let Some(card) = state.find_card_mut(id) else {
        return GestureOutcome::Ignored;
    };

    match kind {
        SessionKind::Drag => {
            card.visual.dragging = true;
            let session = InteractionSession::Drag {
                pointer_id: event.pointer_id,
                card: id,
                grab_offset: event.pos - card.pos,
                origin: card.pos,
            };
            state.session = Some(session);
            state.push_event(GameEvent::CardPicked { card: id });
            log::debug!("Drag started on card {}", id);
            GestureOutcome::DragStarted { card: id }
        }
        SessionKind::Swipe => {
            state.session = Some(InteractionSession::Swipe {
                pointer_id: event.pointer_id,
                card: id,
                start: event.pos,
                current: event.pos,
            });
            log::debug!("Swipe started on card {}", id);
            GestureOutcome::SwipeStarted { card: id }
        }
    }
}

fn pointer_move(state: &mut GameState, event: &PointerEvent) -> GestureOutcome {
    let Some(session) = state.session.as_mut() else {
        return GestureOutcome::Ignored;
    };
    if session.pointer_id() != event.pointer_id {
        return GestureOutcome::Ignored;
    }

    match session {
        InteractionSession::Drag {
            card, grab_offset, ..
        } => {
            let (id, offset) = (*card, *grab_offset);
            if let Some(card) = state.find_card_mut(id) {
                card.pos = event.pos - offset;
            }
        }
        InteractionSession::Swipe { current, .. } => {
            *current = event.pos;
        }
    }
    GestureOutcome::Moved
}

fn pointer_up(state: &mut GameState, event: &PointerEvent) -> GestureOutcome {
    match state.session {
        Some(session) if session.pointer_id() == event.pointer_id => {}
        _ => return GestureOutcome::Ignored,
    }
    let Some(session) = state.session.take() else {
        return GestureOutcome::Ignored;
    };

    match session {
        InteractionSession::Drag { card, origin, .. } => finish_drag(state, card, origin),
        InteractionSession::Swipe {
            card,
            start,
            current,
            ..
        } => finish_swipe(state, card, current - start),
    }
}

fn finish_drag(state: &mut GameState, id: CardId, origin: Vec2) -> GestureOutcome {
    let Some(pos) = state.find_card(id).map(|c| c.pos) else {
        log::debug!("Drag ended on vanished card {}", id);
        return GestureOutcome::Abandoned { card: id };
    };

    let holder = InteractionLock::Placement { card: id };
    let slot = if state.lock.try_acquire(holder) {
        drop_target(state, pos)
    } else {
        None
    };

    let now = state.now_ms;
    let timings = state.settings.timings;
    let destination = slot.and_then(|s| state.board.slot(s)).map(|s| s.center);
    let Some(card) = state.find_card_mut(id) else {
        return GestureOutcome::Abandoned { card: id };
    };
    card.visual.dragging = false;
    match (slot, destination) {
        (Some(slot), Some(center)) => {
            start_move(card, center, now, timings.place_ms, MoveCompletion::PlaceInSlot { slot });
            log::debug!("Card {} dropped on slot {}", id, slot);
        }
        _ => {
            start_move(card, origin, now, timings.return_ms, MoveCompletion::ReturnToHand);
            log::debug!("Card {} returning to hand", id);
        }
    }

    GestureOutcome::Dropped { card: id, slot }
}

fn finish_swipe(state: &mut GameState, id: CardId, delta: Vec2) -> GestureOutcome {
    if state.find_card(id).is_none() {
        log::debug!("Swipe ended on vanished card {}", id);
        return GestureOutcome::Abandoned { card: id };
    }

    let attack = classify_swipe(delta, state.settings.swipe_threshold).map(|direction| {
        log::debug!("Swipe on card {} classified {:?}", id, direction);
        (direction, combat::attack(state, id, direction))
    });
    GestureOutcome::Swiped { card: id, attack }
}
