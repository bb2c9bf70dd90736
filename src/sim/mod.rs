//! Deterministic interaction core
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Time only moves through `tick`
//! - Stable iteration order (cards sorted by ID)
//! - No rendering or platform dependencies

pub mod anim;
pub mod combat;
pub mod gesture;
pub mod rect;
pub mod sequencer;
pub mod state;
pub mod tick;

pub use anim::{AnimationDone, MoveAnimation, MoveCompletion, TimedFlag, ease_out_cubic};
pub use combat::{AttackVerdict, ClashResult, CombatOutcome, Direction, attack, resolve_attack};
pub use gesture::{
    GestureOutcome, InteractionSession, PointerEvent, PointerId, PointerPhase, classify_swipe,
    handle_pointer,
};
pub use rect::Rect;
pub use sequencer::{InteractionLock, Sequencer};
pub use state::{
    Board, Card, CardId, CombatStats, GameEvent, GameState, Owner, Removal, Slot, VisualState,
    Zone,
};
pub use tick::tick;
