//! Per-frame simulation update
//!
//! Advances the sim clock and applies everything time-driven, in order:
//! move animations, their completions, the destruction sequencer, then the
//! deadline purge. The presenter reads state only after `tick` returns.

use super::anim::step_animations;
use super::sequencer::{advance, on_animation_done, purge_expired};
use super::state::GameState;

/// Advance the game state by `dt_ms` milliseconds
pub fn tick(state: &mut GameState, dt_ms: f64) {
    state.now_ms += dt_ms.max(0.0);
    let now = state.now_ms;

    for done in step_animations(&mut state.cards, now) {
        on_animation_done(state, done);
    }

    advance(state);

    // Backstop: nothing outlives its removal deadline even if stage timing drifts
    purge_expired(state);
}
