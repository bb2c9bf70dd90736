//! Game settings: timings, board geometry and the initial layout
//!
//! Persisted in LocalStorage on the web; native builds use the defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors from parsing or validating user-supplied settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Board needs at least one slot")]
    NoSlots,
    #[error("Enemy card placed in slot {slot} but the board has {slot_count} slots")]
    SlotOutOfRange { slot: usize, slot_count: usize },
    #[error("Slot {0} holds more than one enemy card")]
    SlotTaken(usize),
    #[error("Duration `{0}` must be positive")]
    ZeroDuration(&'static str),
    #[error("Swipe threshold must be a finite, non-negative distance")]
    BadSwipeThreshold,
}

/// Effect and animation durations (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Hand to slot move
    pub place_ms: f64,
    /// Failed drop sliding back to its origin
    pub return_ms: f64,
    /// Hit flash; doomed cards start fading when it ends
    pub flash_ms: f64,
    /// Fade window before doomed cards are purged
    pub destroy_ms: f64,
    /// "Already acted" shake
    pub shake_ms: f64,
    /// "Already acted" cross mark
    pub cross_ms: f64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            place_ms: PLACE_MS,
            return_ms: RETURN_MS,
            flash_ms: FLASH_MS,
            destroy_ms: DESTROY_MS,
            shake_ms: SHAKE_MS,
            cross_ms: CROSS_MS,
        }
    }
}

/// Where slots and hand cards sit on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardGeometry {
    pub slot_count: usize,
    pub slot_size: Vec2,
    pub slot_spacing: f32,
    pub card_size: Vec2,
    pub center_x: f32,
    pub field_row_y: f32,
    pub hand_row_y: f32,
    pub hand_spacing: f32,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self {
            slot_count: SLOT_COUNT,
            slot_size: Vec2::new(SLOT_WIDTH, SLOT_HEIGHT),
            slot_spacing: SLOT_SPACING,
            card_size: Vec2::new(CARD_WIDTH, CARD_HEIGHT),
            center_x: BOARD_CENTER_X,
            field_row_y: FIELD_ROW_Y,
            hand_row_y: HAND_ROW_Y,
            hand_spacing: HAND_SPACING,
        }
    }
}

impl BoardGeometry {
    /// Center of a slot; the lane is centered on `center_x`
    pub fn slot_center(&self, index: usize) -> Vec2 {
        let offset = index as f32 - (self.slot_count as f32 - 1.0) / 2.0;
        Vec2::new(self.center_x + offset * self.slot_spacing, self.field_row_y)
    }

    /// Resting position of hand card `index` out of `count`
    pub fn hand_position(&self, index: usize, count: usize) -> Vec2 {
        let offset = index as f32 - (count.max(1) as f32 - 1.0) / 2.0;
        Vec2::new(self.center_x + offset * self.hand_spacing, self.hand_row_y)
    }
}

/// Left-face / right-face strength of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackPair {
    pub left: u32,
    pub right: u32,
}

impl AttackPair {
    pub const fn new(left: u32, right: u32) -> Self {
        Self { left, right }
    }
}

/// An enemy card pre-placed on the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyPlacement {
    pub slot: usize,
    pub attack: AttackPair,
}

/// Cards dealt on every reset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialSetup {
    /// Player hand, left to right
    pub hand: Vec<AttackPair>,
    /// Enemy field cards
    pub enemy_field: Vec<EnemyPlacement>,
}

impl Default for InitialSetup {
    fn default() -> Self {
        Self {
            hand: vec![
                AttackPair::new(3, 5),
                AttackPair::new(4, 2),
                AttackPair::new(2, 4),
                AttackPair::new(5, 1),
            ],
            enemy_field: vec![
                EnemyPlacement {
                    slot: 1,
                    attack: AttackPair::new(3, 3),
                },
                EnemyPlacement {
                    slot: 3,
                    attack: AttackPair::new(4, 4),
                },
            ],
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub timings: Timings,
    /// Horizontal travel (pixels) before a swipe counts as an attack
    pub swipe_threshold: f32,
    pub geometry: BoardGeometry,
    pub setup: InitialSetup,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            swipe_threshold: SWIPE_THRESHOLD,
            geometry: BoardGeometry::default(),
            setup: InitialSetup::default(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "lane_duel_settings";

    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the layout and durations make sense together
    pub fn validate(&self) -> Result<(), SettingsError> {
        let slot_count = self.geometry.slot_count;
        if slot_count == 0 {
            return Err(SettingsError::NoSlots);
        }

        let mut taken = vec![false; slot_count];
        for placement in &self.setup.enemy_field {
            let slot = placement.slot;
            if slot >= slot_count {
                return Err(SettingsError::SlotOutOfRange { slot, slot_count });
            }
            if taken[slot] {
                return Err(SettingsError::SlotTaken(slot));
            }
            taken[slot] = true;
        }

        let t = &self.timings;
        let durations = [
            ("place_ms", t.place_ms),
            ("return_ms", t.return_ms),
            ("flash_ms", t.flash_ms),
            ("destroy_ms", t.destroy_ms),
            ("shake_ms", t.shake_ms),
            ("cross_ms", t.cross_ms),
        ];
        for (name, value) in durations {
            if value.is_nan() || value <= 0.0 {
                return Err(SettingsError::ZeroDuration(name));
            }
        }

        if !self.swipe_threshold.is_finite() || self.swipe_threshold < 0.0 {
            return Err(SettingsError::BadSwipeThreshold);
        }

        Ok(())
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native builds have no storage
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.swipe_threshold, SWIPE_THRESHOLD);
        assert_eq!(settings.setup.hand.len(), 4);
        assert_eq!(settings.setup.enemy_field.len(), 2);
    }

    #[test]
    fn test_slot_centers_are_evenly_spaced() {
        let geometry = BoardGeometry::default();
        let middle = geometry.slot_center(SLOT_COUNT / 2);
        assert_eq!(middle, Vec2::new(BOARD_CENTER_X, FIELD_ROW_Y));
        let step = geometry.slot_center(1) - geometry.slot_center(0);
        assert_eq!(step, Vec2::new(SLOT_SPACING, 0.0));
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let settings = Settings::from_json(r#"{ "timings": { "flash_ms": 100.0 } }"#)
            .expect("valid settings");
        assert_eq!(settings.timings.flash_ms, 100.0);
        assert_eq!(settings.timings.destroy_ms, DESTROY_MS);
        assert_eq!(settings.swipe_threshold, SWIPE_THRESHOLD);
        assert_eq!(settings.setup, InitialSetup::default());
    }

    #[test]
    fn test_from_json_rejects_bad_layout() {
        let out_of_range = r#"{ "setup": { "enemy_field": [
            { "slot": 9, "attack": { "left": 1, "right": 1 } }
        ] } }"#;
        assert!(matches!(
            Settings::from_json(out_of_range),
            Err(SettingsError::SlotOutOfRange { slot: 9, slot_count: 5 })
        ));

        let doubled = r#"{ "setup": { "enemy_field": [
            { "slot": 2, "attack": { "left": 1, "right": 1 } },
            { "slot": 2, "attack": { "left": 2, "right": 2 } }
        ] } }"#;
        assert!(matches!(
            Settings::from_json(doubled),
            Err(SettingsError::SlotTaken(2))
        ));

        let no_slots = r#"{ "geometry": { "slot_count": 0 } }"#;
        assert!(matches!(Settings::from_json(no_slots), Err(SettingsError::NoSlots)));
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{ "timings": { "destroy_ms": 0.0 } }"#),
            Err(SettingsError::ZeroDuration("destroy_ms"))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "swipe_threshold": -1.0 }"#),
            Err(SettingsError::BadSwipeThreshold)
        ));
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SettingsError::Parse(_))
        ));
    }
}
