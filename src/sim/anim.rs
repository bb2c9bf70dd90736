//! Time-based interpolation and expiry windows
//!
//! Every visual transition in the sim goes through here. Move animations
//! report completion as `AnimationDone` values returned from
//! `step_animations`; the caller decides what happens next.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Card, CardId};

/// Ease-out cubic: fast start, gentle settle
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// What a finished move animation means for the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCompletion {
    /// Card lands in a field slot
    PlaceInSlot { slot: usize },
    /// Card goes back to where the drag started
    ReturnToHand,
}

/// A single per-card move from one coordinate to another
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveAnimation {
    pub from: Vec2,
    pub to: Vec2,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub on_complete: MoveCompletion,
}

impl MoveAnimation {
    /// Linear progress in [0, 1]
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    /// Interpolated position; exactly `to` once finished
    pub fn sample(&self, now_ms: f64) -> Vec2 {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            self.to
        } else {
            self.from.lerp(self.to, ease_out_cubic(t))
        }
    }
}

/// Completion event for a move animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationDone {
    pub card: CardId,
    pub completion: MoveCompletion,
}

/// A "visible while now < deadline" window (shake, flash, cross mark)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedFlag {
    pub until_ms: f64,
}

impl TimedFlag {
    pub fn arm(&mut self, now_ms: f64, duration_ms: f64) {
        self.until_ms = now_ms + duration_ms;
    }

    pub fn is_active(&self, now_ms: f64) -> bool {
        now_ms < self.until_ms
    }

    pub fn clear(&mut self) {
        self.until_ms = 0.0;
    }
}

/// Start moving a card from its current position. Replaces any move already
/// in flight on that card.
pub fn start_move(
    card: &mut Card,
    to: Vec2,
    now_ms: f64,
    duration_ms: f64,
    on_complete: MoveCompletion,
) {
    card.visual.anim = Some(MoveAnimation {
        from: card.pos,
        to,
        start_ms: now_ms,
        duration_ms,
        on_complete,
    });
}

/// Advance every move animation to `now_ms`.
///
/// Finished animations snap their card onto the destination, are removed from
/// the card, and are reported once in the returned list (stable id order).
pub fn step_animations(cards: &mut [Card], now_ms: f64) -> Vec<AnimationDone> {
    let mut done = Vec::new();
    for card in cards.iter_mut() {
        let Some(anim) = card.visual.anim else {
            continue;
        };
        card.pos = anim.sample(now_ms);
        if anim.is_finished(now_ms) {
            card.visual.anim = None;
            done.push(AnimationDone {
                card: card.id,
                completion: anim.on_complete,
            });
        }
    }
    done
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{CombatStats, Owner, Zone};

    fn test_card() -> Card {
        Card::new(
            7,
            Owner::Player,
            Zone::Hand { index: 0 },
            Vec2::ZERO,
            CombatStats::new(1, 1),
        )
    }

    #[test]
    fn test_ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
        // Clamped outside [0, 1]
        assert_eq!(ease_out_cubic(-1.0), 0.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
    }

    #[test]
    fn test_sample_midway_and_snap() {
        let anim = MoveAnimation {
            from: Vec2::ZERO,
            to: Vec2::new(100.0, 0.0),
            start_ms: 0.0,
            duration_ms: 100.0,
            on_complete: MoveCompletion::ReturnToHand,
        };
        assert!((anim.sample(50.0).x - 87.5).abs() < 1e-3);
        assert_eq!(anim.sample(100.0), Vec2::new(100.0, 0.0));
        assert_eq!(anim.sample(500.0), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let anim = MoveAnimation {
            from: Vec2::ZERO,
            to: Vec2::ONE,
            start_ms: 10.0,
            duration_ms: 0.0,
            on_complete: MoveCompletion::ReturnToHand,
        };
        assert!(anim.is_finished(10.0));
        assert_eq!(anim.sample(10.0), Vec2::ONE);
    }

    #[test]
    fn test_completion_fires_once() {
        let mut cards = vec![test_card()];
        start_move(
            &mut cards[0],
            Vec2::new(10.0, 0.0),
            0.0,
            50.0,
            MoveCompletion::PlaceInSlot { slot: 2 },
        );

        assert!(step_animations(&mut cards, 25.0).is_empty());
        let done = step_animations(&mut cards, 50.0);
        assert_eq!(
            done,
            vec![AnimationDone {
                card: 7,
                completion: MoveCompletion::PlaceInSlot { slot: 2 },
            }]
        );
        assert_eq!(cards[0].pos, Vec2::new(10.0, 0.0));
        assert!(step_animations(&mut cards, 75.0).is_empty());
    }

    #[test]
    fn test_new_move_replaces_old() {
        let mut card = test_card();
        start_move(&mut card, Vec2::new(10.0, 0.0), 0.0, 100.0, MoveCompletion::ReturnToHand);
        start_move(
            &mut card,
            Vec2::new(0.0, 10.0),
            0.0,
            100.0,
            MoveCompletion::PlaceInSlot { slot: 0 },
        );
        let anim = card.visual.anim.expect("animation");
        assert_eq!(anim.to, Vec2::new(0.0, 10.0));
        assert_eq!(anim.on_complete, MoveCompletion::PlaceInSlot { slot: 0 });
    }

    #[test]
    fn test_timed_flag_window() {
        let mut flag = TimedFlag::default();
        assert!(!flag.is_active(0.0));
        flag.arm(100.0, 50.0);
        assert!(flag.is_active(100.0));
        assert!(flag.is_active(149.9));
        assert!(!flag.is_active(150.0));
        flag.clear();
        assert!(!flag.is_active(100.0));
    }
}
