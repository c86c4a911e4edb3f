//! Chart data model.
//!
//! Two coordinate systems live here:
//!
//! - The parser works in *notation coordinates*: measure index plus a
//!   fraction of that measure ([`NoteCommand`], [`BpmCommand`]).
//! - The builder resolves those into *absolute seconds* from chart start
//!   ([`NoteEvent`], [`ChartData`]), so playback never has to re-resolve
//!   tempo changes at render time.

use crate::error::ParseWarning;
use serde::Serialize;

/// Number of lanes around the play field. Lanes are 1-indexed in notation.
pub const LANE_COUNT: u8 = 8;

/// One of the difficulty variants embedded in a chart text blob.
///
/// The id is a stable ordinal: 0 is the easiest variant, higher ids are
/// harder. Labels are fixed by ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DifficultyDescriptor {
    pub id: u8,
    pub label: String,
    pub present: bool,
}

impl DifficultyDescriptor {
    pub fn new(id: u8) -> Self {
        let label = match id {
            0 => "BASIC".to_string(),
            1 => "ADVANCED".to_string(),
            2 => "EXPERT".to_string(),
            3 => "MASTER".to_string(),
            4 => "RE:MASTER".to_string(),
            n => format!("EXTRA {}", n),
        };
        Self {
            id,
            label,
            present: true,
        }
    }
}

/// Shape of a slide's path between its origin and destination lane.
///
/// The shape parameterizes how a renderer draws the path; the core only
/// carries it through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideShape {
    /// `-` straight line
    Straight,
    /// `<` arc counter-clockwise around the ring
    ArcLeft,
    /// `>` arc clockwise around the ring
    ArcRight,
    /// `^` shorter of the two arcs
    ArcShort,
    /// `v` fold through the center
    Fold,
    /// `p` loop counter-clockwise around the center
    LoopLeft,
    /// `q` loop clockwise around the center
    LoopRight,
    /// `s` S-shaped curve through the center
    CurveS,
    /// `z` Z-shaped curve through the center
    CurveZ,
    /// `w` fan spreading to three adjacent lanes
    Fan,
}

impl SlideShape {
    /// Map a notation symbol to its shape. Returns `None` for anything
    /// outside the closed vocabulary.
    pub fn from_symbol(c: char) -> Option<Self> {
        Some(match c {
            '-' => SlideShape::Straight,
            '<' => SlideShape::ArcLeft,
            '>' => SlideShape::ArcRight,
            '^' => SlideShape::ArcShort,
            'v' => SlideShape::Fold,
            'p' => SlideShape::LoopLeft,
            'q' => SlideShape::LoopRight,
            's' => SlideShape::CurveS,
            'z' => SlideShape::CurveZ,
            'w' => SlideShape::Fan,
            _ => return None,
        })
    }
}

/// A slide's path parameters: the shape plus the destination lane.
/// The origin lane lives in the note's [`NotePosition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlidePath {
    pub shape: SlideShape,
    pub destination: u8,
}

/// Touch sensor regions, from the outer ring inward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TouchRegion {
    A,
    B,
    C,
    D,
    E,
}

impl TouchRegion {
    pub fn from_symbol(c: char) -> Option<Self> {
        Some(match c {
            'A' => TouchRegion::A,
            'B' => TouchRegion::B,
            'C' => TouchRegion::C,
            'D' => TouchRegion::D,
            'E' => TouchRegion::E,
            _ => return None,
        })
    }
}

/// A discrete touch coordinate: region plus index within the region.
/// The single center sensor `C` uses index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TouchPoint {
    pub region: TouchRegion,
    pub index: u8,
}

/// The closed set of note kinds.
///
/// Modelled as a tagged enum so every consumer handles all kinds
/// exhaustively at compile time; kind-specific parameters ride along as
/// variant payloads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    Tap,
    Hold,
    Slide(SlidePath),
    Touch,
    Break,
}

/// Where a note sits on the play field: a lane index for ring notes, a
/// sensor coordinate for touch notes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotePosition {
    Lane(u8),
    Sensor(TouchPoint),
}

/// The atomic unit of a built chart, in absolute time.
///
/// `duration` is non-zero only for holds and slides. Storage order is
/// monotonically non-decreasing in `time`; stacked simultaneous notes are
/// preserved in input order, never deduplicated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoteEvent {
    pub kind: NoteKind,
    pub position: NotePosition,
    /// Seconds from chart start.
    pub time: f64,
    /// Seconds; zero for tap/touch/break.
    pub duration: f64,
}

impl NoteEvent {
    /// When the note stops occupying the timeline.
    pub fn end_time(&self) -> f64 {
        self.time + self.duration
    }
}

/// A note in notation coordinates, before tempo resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteCommand {
    pub measure: u32,
    /// Fraction of the measure, in `[0, 1)`.
    pub offset: f64,
    /// Length in measures; zero for tap/touch/break.
    pub duration: f64,
    pub kind: NoteKind,
    pub position: NotePosition,
}

/// A tempo directive, taking effect at the start of its measure.
#[derive(Debug, Clone, PartialEq)]
pub struct BpmCommand {
    pub measure: u32,
    pub bpm: f64,
    /// Beats per measure; `None` keeps the signature currently in effect.
    pub beats: Option<u32>,
}

/// Parser output for one difficulty section: the timed note commands,
/// the tempo directives, and any recoverable warnings hit along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModelInput {
    pub difficulty: DifficultyDescriptor,
    pub title: Option<String>,
    pub notes: Vec<NoteCommand>,
    pub bpm_changes: Vec<BpmCommand>,
    pub warnings: Vec<ParseWarning>,
}

/// Absolute start time of every measure, kept after the tempo timeline
/// itself is discarded. The table always extends one boundary past the
/// playable range so stepping forward from the last measure stays defined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureTimeline {
    starts: Vec<f64>,
}

impl MeasureTimeline {
    /// `starts` must be strictly increasing and contain at least two
    /// entries (measure 0 plus one boundary past the end).
    pub(crate) fn new(starts: Vec<f64>) -> Self {
        debug_assert!(starts.len() >= 2);
        Self { starts }
    }

    /// Index of the measure containing `position`.
    pub fn index_at(&self, position: f64) -> usize {
        let after = self.starts.partition_point(|s| *s <= position);
        after.saturating_sub(1).min(self.starts.len() - 2)
    }

    /// Start time of the measure containing `position`. A position exactly
    /// on a boundary floors to that boundary.
    pub fn floor(&self, position: f64) -> f64 {
        self.starts[self.index_at(position)]
    }

    /// Duration of the measure containing `position`.
    pub fn measure_duration_at(&self, position: f64) -> f64 {
        let i = self.index_at(position);
        self.starts[i + 1] - self.starts[i]
    }

    /// Nearest boundary strictly before `position`, or 0 at the chart edge.
    pub fn prev_boundary(&self, position: f64) -> f64 {
        match self.starts.iter().rposition(|s| *s < position) {
            Some(i) => self.starts[i],
            None => 0.0,
        }
    }

    /// Nearest boundary strictly after `position`, or the last known
    /// boundary at the chart edge.
    pub fn next_boundary(&self, position: f64) -> f64 {
        let after = self.starts.partition_point(|s| *s <= position);
        self.starts[after.min(self.starts.len() - 1)]
    }
}

/// An immutable built chart for one difficulty: ordered notes, the measure
/// timeline, and the total playable duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub title: Option<String>,
    pub difficulty: DifficultyDescriptor,
    pub notes: Vec<NoteEvent>,
    pub timeline: MeasureTimeline,
    /// `max(note end time)` across all notes, in seconds.
    pub total_duration: f64,
}
