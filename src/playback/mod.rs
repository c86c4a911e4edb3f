//! # Playback Module
//!
//! The transport side of the core: an owned [`PlaybackEngine`] value that
//! holds a built chart and advances a virtual timeline in lock-step with
//! the host's clock.
//!
//! ## Sub-modules
//! - `types` - Snapshot, hi-speed configuration, direction
//! - `engine` - The transport state machine
//! - `router` - Named intents mapped onto engine calls
//!
//! ## Model
//! The engine never reads a clock itself. The host render loop calls
//! [`PlaybackEngine::tick`] with a monotonic `now` (seconds) once per
//! frame, then reads [`PlaybackEngine::snapshot`] to draw. Transport
//! controls arrive as [`Intent`] values through the [`IntentRouter`].
//!
//! Hi-speed is a *visual* scroll multiplier only: it changes how far ahead
//! of the current position a renderer draws notes, never how fast the
//! position itself advances.
//!
//! ## Example
//! ```rust
//! use notechart::{load_chart, DifficultyDescriptor};
//! use notechart::playback::{Intent, IntentRouter, PlaybackEngine};
//!
//! let text = "&inote_0=(120){4}1,2,3,4,";
//! let (chart, _warnings) = load_chart(text, &DifficultyDescriptor::new(0)).unwrap();
//!
//! let mut engine = PlaybackEngine::new();
//! let router = IntentRouter::new();
//! engine.load(chart);
//!
//! router.dispatch(&mut engine, Intent::PlayPause, 0.0);
//! engine.tick(1.5);
//! assert_eq!(engine.snapshot().position, 1.5);
//! ```

mod engine;
mod router;
mod types;


pub use engine::PlaybackEngine;
pub use router::{Intent, IntentRouter};
pub use types::{Direction, HiSpeedConfig, Snapshot};
