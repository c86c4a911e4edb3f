//! Chart model builder: resolves parsed note commands from notation
//! coordinates into absolute seconds using the piecewise-constant tempo
//! timeline, then fixes the result into an immutable [`ChartData`].
//!
//! Tempo segments exist only during the build; what playback keeps is the
//! resolved note times plus the measure-start table.

use crate::error::BuildError;
use crate::model::{ChartData, ChartModelInput, MeasureTimeline, NoteEvent};

/// Tempo in effect from `start_measure` until the next segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpmSegment {
    pub start_measure: u32,
    /// Absolute start time of `start_measure`, in seconds.
    pub start_time: f64,
    pub bpm: f64,
    pub beats_per_measure: f64,
}

impl BpmSegment {
    /// Seconds per measure under this segment's tempo and signature.
    fn measure_seconds(&self) -> f64 {
        60.0 / self.bpm * self.beats_per_measure
    }
}

/// Fallback tempo for charts that declare none before their first note.
const DEFAULT_BPM: f64 = 120.0;
const DEFAULT_BEATS: f64 = 4.0;

/// Resolve a parsed section into an immutable chart.
///
/// Fails with [`BuildError::EmptyChart`] when the section yields zero
/// notes; an empty chart is a distinct condition from a missing section
/// and is reported differently so the caller can tell them apart.
pub fn build_chart(input: ChartModelInput) -> Result<ChartData, BuildError> {
    if input.notes.is_empty() {
        return Err(BuildError::EmptyChart);
    }

    let segments = build_segments(&input);

    let mut notes: Vec<NoteEvent> = input
        .notes
        .iter()
        .map(|cmd| {
            let seg = active_segment(&segments, cmd.measure);
            let measure_len = seg.measure_seconds();
            let delta = (cmd.measure - seg.start_measure) as f64;
            NoteEvent {
                kind: cmd.kind,
                position: cmd.position,
                time: seg.start_time + delta * measure_len + cmd.offset * measure_len,
                duration: cmd.duration * measure_len,
            }
        })
        .collect();

    // Stable sort: stacked simultaneous notes keep their input order.
    notes.sort_by(|a, b| a.time.total_cmp(&b.time));

    let total_duration = notes
        .iter()
        .map(NoteEvent::end_time)
        .fold(0.0, f64::max);

    let timeline = build_timeline(&segments, total_duration);

    Ok(ChartData {
        title: input.title,
        difficulty: input.difficulty,
        notes,
        timeline,
        total_duration,
    })
}

/// Walk the tempo directives in order into segments with precomputed
/// absolute start times. Directives in the same measure coalesce to the
/// last one; a missing directive at measure 0 gets the default tempo.
fn build_segments(input: &ChartModelInput) -> Vec<BpmSegment> {
    let mut segments = vec![BpmSegment {
        start_measure: 0,
        start_time: 0.0,
        bpm: DEFAULT_BPM,
        beats_per_measure: DEFAULT_BEATS,
    }];

    for change in &input.bpm_changes {
        let last = *segments.last().unwrap();
        let beats = change
            .beats
            .map(|b| b as f64)
            .unwrap_or(last.beats_per_measure);

        if change.measure == last.start_measure {
            let seg = segments.last_mut().unwrap();
            seg.bpm = change.bpm;
            seg.beats_per_measure = beats;
        } else {
            let elapsed = (change.measure - last.start_measure) as f64 * last.measure_seconds();
            segments.push(BpmSegment {
                start_measure: change.measure,
                start_time: last.start_time + elapsed,
                bpm: change.bpm,
                beats_per_measure: beats,
            });
        }
    }

    segments
}

/// Binary search for the segment active at `measure`. Segments are few,
/// so O(log n) per note is plenty.
fn active_segment(segments: &[BpmSegment], measure: u32) -> &BpmSegment {
    let idx = segments.partition_point(|s| s.start_measure <= measure);
    &segments[idx - 1]
}

/// Absolute start time of every measure from 0 until one boundary past
/// `total_duration`, so playback stepping stays defined at the chart edge.
fn build_timeline(segments: &[BpmSegment], total_duration: f64) -> MeasureTimeline {
    let mut starts = Vec::new();
    let mut measure = 0u32;
    loop {
        let seg = active_segment(segments, measure);
        let start = seg.start_time
            + (measure - seg.start_measure) as f64 * seg.measure_seconds();
        starts.push(start);
        if start > total_duration && starts.len() >= 2 {
            break;
        }
        measure += 1;
    }
    MeasureTimeline::new(starts)
}
