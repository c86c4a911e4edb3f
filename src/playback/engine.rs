//! The transport state machine.
//!
//! States: `Unloaded -> Loaded(paused) <-> Playing`, with `reset` dropping
//! back to `Unloaded` from anywhere. The engine is a plain owned value;
//! the caller injects it wherever it is needed, which keeps the
//! single-writer invariant visible in the ownership graph instead of
//! hiding it behind a global store.
//!
//! All timing math is pure: the host passes a monotonic `now` (seconds)
//! into [`PlaybackEngine::tick`] and [`PlaybackEngine::toggle_playback`],
//! so tests drive the engine with a fake clock.

use crate::model::{ChartData, NoteEvent};

use super::types::{Direction, HiSpeedConfig, Snapshot};

/// Fine-step granularity: 1/480 of the current measure.
const FINE_STEPS_PER_MEASURE: f64 = 480.0;

/// Wall-clock anchor recorded when playback starts or the position is
/// moved while playing. While playing,
/// `position = anchor.position + (now - anchor.wall)`.
#[derive(Debug, Clone, Copy)]
struct PlayAnchor {
    wall: f64,
    position: f64,
}

/// Owns the mutable transport state for one loaded chart.
///
/// Every operation is synchronous and non-blocking; there is no I/O here.
/// Operations other than [`load`](Self::load) are silent no-ops while no
/// chart is loaded — transport buttons may race with asynchronous chart
/// loading, and that must never surface an error to the user.
#[derive(Debug)]
pub struct PlaybackEngine {
    chart: Option<ChartData>,
    position: f64,
    hi_speed: f64,
    fullscreen: bool,
    config: HiSpeedConfig,
    /// `Some` exactly while playing.
    anchor: Option<PlayAnchor>,
    /// Most recent `now` seen, used to re-anchor after seeking mid-play.
    last_now: f64,
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackEngine {
    pub fn new() -> Self {
        Self::with_config(HiSpeedConfig::default())
    }

    pub fn with_config(config: HiSpeedConfig) -> Self {
        Self {
            chart: None,
            position: 0.0,
            hi_speed: config.initial,
            fullscreen: false,
            config,
            anchor: None,
            last_now: 0.0,
        }
    }

    /// Attach a chart, replacing any existing one outright. Position
    /// returns to zero, paused.
    pub fn load(&mut self, chart: ChartData) {
        self.chart = Some(chart);
        self.position = 0.0;
        self.anchor = None;
    }

    /// Drop the chart and all transport state. Idempotent.
    pub fn reset(&mut self) {
        self.chart = None;
        self.position = 0.0;
        self.hi_speed = self.config.initial;
        self.fullscreen = false;
        self.anchor = None;
    }

    /// Advance the virtual timeline to `now`. Called by the host render
    /// loop once per frame; a no-op while paused or unloaded.
    pub fn tick(&mut self, now: f64) {
        self.last_now = now;
        let Some(chart) = &self.chart else { return };
        if let Some(anchor) = self.anchor {
            self.position =
                (anchor.position + (now - anchor.wall)).clamp(0.0, chart.total_duration);
        }
    }

    /// `Paused -> Playing` or `Playing -> Paused`.
    ///
    /// Entering `Playing` records the instant corresponding to the current
    /// position; from then on time advances at real-time rate regardless
    /// of hi-speed.
    pub fn toggle_playback(&mut self, now: f64) {
        if self.chart.is_none() {
            return;
        }
        self.tick(now);
        self.anchor = match self.anchor {
            Some(_) => None,
            None => Some(PlayAnchor {
                wall: now,
                position: self.position,
            }),
        };
    }

    /// Floor the position to the start of the current measure, keeping
    /// the play/pause state. Practice-mode "retry this measure", distinct
    /// from `load`'s full reset to zero.
    pub fn restart(&mut self) {
        let Some(chart) = &self.chart else { return };
        let floored = chart.timeline.floor(self.position);
        self.seek(floored);
    }

    /// Nudge the position by a fine fixed increment (1/480 of the current
    /// measure), clamped to the chart bounds. Play state is unchanged.
    pub fn step_position(&mut self, direction: Direction) {
        let Some(chart) = &self.chart else { return };
        let fine = chart.timeline.measure_duration_at(self.position) / FINE_STEPS_PER_MEASURE;
        let target = self.position + direction.signum() * fine;
        self.seek(target);
    }

    /// Jump to the previous/next measure boundary, clamped at chart edges.
    pub fn step_measure(&mut self, direction: Direction) {
        let Some(chart) = &self.chart else { return };
        let target = match direction {
            Direction::Backward => chart.timeline.prev_boundary(self.position),
            Direction::Forward => chart.timeline.next_boundary(self.position),
        };
        self.seek(target);
    }

    /// Set the visual scroll multiplier, clamped and snapped to the
    /// configured steps. Pure state mutation: position is untouched even
    /// mid-play.
    pub fn set_hi_speed(&mut self, value: f64) {
        if self.chart.is_none() {
            return;
        }
        self.hi_speed = self.config.snap(value);
    }

    /// Move hi-speed one configured step up or down.
    pub fn nudge_hi_speed(&mut self, direction: Direction) {
        let current = self.hi_speed;
        self.set_hi_speed(current + direction.signum() * self.config.step);
    }

    pub fn toggle_fullscreen(&mut self) {
        if self.chart.is_none() {
            return;
        }
        self.fullscreen = !self.fullscreen;
    }

    /// Read-only view of the transport; never mutates state.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            position: self.position,
            hi_speed: self.hi_speed,
            is_playing: self.anchor.is_some(),
            is_fullscreen: self.fullscreen,
            difficulty: self.chart.as_ref().map(|c| c.difficulty.id),
            notes: self.chart.as_ref().map(|c| c.notes.as_slice()).unwrap_or(&[]),
        }
    }

    /// Notes whose span overlaps the render window
    /// `[position, position + base_lookahead / hi_speed]` — higher
    /// hi-speed scrolls faster, so fewer notes fit on screen at once.
    pub fn visible_notes(&self, base_lookahead: f64) -> impl Iterator<Item = &NoteEvent> {
        let window_start = self.position;
        let window_end = self.position + base_lookahead / self.hi_speed;
        self.chart
            .iter()
            .flat_map(|c| c.notes.iter())
            .filter(move |n| n.end_time() >= window_start && n.time <= window_end)
    }

    /// Move to `target`, clamped, re-anchoring so an in-flight play
    /// session continues from the new position.
    fn seek(&mut self, target: f64) {
        let Some(chart) = &self.chart else { return };
        self.position = target.clamp(0.0, chart.total_duration);
        if self.anchor.is_some() {
            self.anchor = Some(PlayAnchor {
                wall: self.last_now,
                position: self.position,
            });
        }
    }
}
