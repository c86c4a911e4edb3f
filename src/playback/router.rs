//! Intent router: the transport's public control surface.
//!
//! The host input layer turns key presses and control clicks into named
//! [`Intent`] values; the router maps each onto the corresponding engine
//! call. Its single policy concern is dropping intents while a text-input
//! control has focus, so transport shortcuts never hijack normal typing.

use serde::Serialize;

use super::engine::PlaybackEngine;
use super::types::Direction;

/// The closed set of transport intents a host may dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    PlayPause,
    Restart,
    StepPosition(Direction),
    StepMeasure(Direction),
    SpeedUp,
    SpeedDown,
    ToggleFullscreen,
}

/// Stateless policy filter in front of the engine; the only thing it
/// carries is whether input focus is currently elsewhere.
#[derive(Debug, Default)]
pub struct IntentRouter {
    text_input_focused: bool,
}

impl IntentRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host notification that a text-input-like control gained or lost
    /// focus. While focused, all intents are dropped.
    pub fn set_text_input_focused(&mut self, focused: bool) {
        self.text_input_focused = focused;
    }

    /// Forward an intent to the engine. Returns whether the intent was
    /// applied, so the host can decide whether to swallow the originating
    /// event. `now` is the host's monotonic clock in seconds.
    pub fn dispatch(&self, engine: &mut PlaybackEngine, intent: Intent, now: f64) -> bool {
        if self.text_input_focused {
            return false;
        }
        match intent {
            Intent::PlayPause => engine.toggle_playback(now),
            Intent::Restart => engine.restart(),
            Intent::StepPosition(direction) => engine.step_position(direction),
            Intent::StepMeasure(direction) => engine.step_measure(direction),
            Intent::SpeedUp => engine.nudge_hi_speed(Direction::Forward),
            Intent::SpeedDown => engine.nudge_hi_speed(Direction::Backward),
            Intent::ToggleFullscreen => engine.toggle_fullscreen(),
        }
        true
    }
}
