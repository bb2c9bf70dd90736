//! Lane Duel - a two-lane swipe card battler
//!
//! Core modules:
//! - `sim`: Deterministic interaction core (entities, gestures, combat, sequencing)
//! - `view`: Read-only per-frame snapshot for an external presenter
//! - `settings`: Data-driven timings, geometry and initial layout

pub mod settings;
pub mod sim;
pub mod view;

pub use settings::{Settings, SettingsError};
pub use view::FrameSnapshot;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (120 Hz)
    pub const SIM_DT_MS: f64 = 1000.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Card footprint (pixels)
    pub const CARD_WIDTH: f32 = 80.0;
    pub const CARD_HEIGHT: f32 = 110.0;

    /// Slot hit region and lane spacing (center to center)
    pub const SLOT_WIDTH: f32 = 96.0;
    pub const SLOT_HEIGHT: f32 = 126.0;
    pub const SLOT_SPACING: f32 = 110.0;
    pub const SLOT_COUNT: usize = 5;

    /// Row placement
    pub const BOARD_CENTER_X: f32 = 320.0;
    pub const FIELD_ROW_Y: f32 = 240.0;
    pub const HAND_ROW_Y: f32 = 470.0;
    pub const HAND_SPACING: f32 = 92.0;

    /// Horizontal travel before a swipe counts as an attack
    pub const SWIPE_THRESHOLD: f32 = 40.0;

    /// Move animation durations
    pub const PLACE_MS: f64 = 180.0;
    pub const RETURN_MS: f64 = 220.0;
    /// Hit flash, also the delay before doomed cards start fading
    pub const FLASH_MS: f64 = 260.0;
    /// Shrink/fade window before a doomed card is purged
    pub const DESTROY_MS: f64 = 360.0;
    /// "Already acted" feedback windows
    pub const SHAKE_MS: f64 = 320.0;
    pub const CROSS_MS: f64 = 600.0;
}
