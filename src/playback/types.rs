//! Playback-facing type definitions.

use crate::model::NoteEvent;
use serde::Serialize;

/// Direction for discrete navigation (fine steps and whole measures).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    pub fn signum(self) -> f64 {
        match self {
            Direction::Backward => -1.0,
            Direction::Forward => 1.0,
        }
    }
}

/// Bounds and granularity of the hi-speed scroll multiplier.
///
/// These are a product choice, not an invariant, so they are plain values
/// handed to the engine at construction. `set` calls clamp into
/// `[min, max]` and snap to the nearest `step` from `min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HiSpeedConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Value applied at load and after reset.
    pub initial: f64,
}

impl Default for HiSpeedConfig {
    fn default() -> Self {
        Self {
            min: 3.0,
            max: 9.0,
            step: 0.25,
            initial: 6.0,
        }
    }
}

impl HiSpeedConfig {
    /// Clamp into range and snap to the nearest allowed step.
    pub fn snap(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }
}

/// Read-only view of the transport, taken once per frame by a renderer.
///
/// `notes` borrows the active chart's note sequence; while unloaded it is
/// empty and the scalar fields hold their defaults.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    /// Seconds from chart start, in `[0, total_duration]`.
    pub position: f64,
    pub hi_speed: f64,
    pub is_playing: bool,
    pub is_fullscreen: bool,
    /// Id of the loaded difficulty, if any.
    pub difficulty: Option<u8>,
    pub notes: &'a [NoteEvent],
}
