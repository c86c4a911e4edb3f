//! Integration tests for the chart core
//!
//! Exercises the full pipeline from raw chart text through difficulty
//! scanning, parsing, building, and playback.

use notechart::playback::{Direction, Intent, IntentRouter, PlaybackEngine};
use notechart::{
    default_difficulty, load_chart, scan_difficulties, ChartError, DifficultyDescriptor,
    NoteKind, ParseError,
};

const CHART: &str = "\
&title=Integration Song
&inote_0=(120){4}
1,2,3,4,
5,6,7,8,
&inote_2=(120){8}
1,5,1,5,1/5,,3h[4:1],,
&inote_4=(150){8}
1,2b,3-7[8:3],A4,C,,,,
(75)5,6,7h[2:1],8,
";

#[test]
fn test_scan_then_load_default_difficulty() {
    let found = scan_difficulties(CHART);
    let ids: Vec<u8> = found.keys().copied().collect();
    assert_eq!(ids, vec![0, 2, 4]);

    let pick = default_difficulty(&found).unwrap();
    assert_eq!(pick.id, 4);
    assert_eq!(pick.label, "RE:MASTER");

    let (chart, warnings) = load_chart(CHART, pick).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(chart.title.as_deref(), Some("Integration Song"));
    assert_eq!(chart.notes.len(), 9);
}

#[test]
fn test_each_present_section_loads() {
    let found = scan_difficulties(CHART);
    for descriptor in found.values() {
        let (chart, _) = load_chart(CHART, descriptor).unwrap();
        assert!(!chart.notes.is_empty(), "difficulty {}", descriptor.id);
        for pair in chart.notes.windows(2) {
            assert!(pair[0].time <= pair[1].time);
        }
    }
}

#[test]
fn test_note_kinds_survive_the_pipeline() {
    let found = scan_difficulties(CHART);
    let (chart, _) = load_chart(CHART, &found[&4]).unwrap();

    let has = |pred: fn(&NoteKind) -> bool| chart.notes.iter().any(|n| pred(&n.kind));
    assert!(has(|k| matches!(k, NoteKind::Tap)));
    assert!(has(|k| matches!(k, NoteKind::Break)));
    assert!(has(|k| matches!(k, NoteKind::Slide(_))));
    assert!(has(|k| matches!(k, NoteKind::Touch)));
    assert!(has(|k| matches!(k, NoteKind::Hold)));
}

#[test]
fn test_tempo_change_slows_second_measure() {
    let found = scan_difficulties(CHART);
    let (chart, _) = load_chart(CHART, &found[&4]).unwrap();

    // Measure 0 at 150 BPM is 1.6s; measure 1 runs at 75 BPM, so its
    // slots are twice as far apart.
    let measure_len = 60.0 / 150.0 * 4.0;
    assert_eq!(chart.notes[0].time, 0.0);
    assert_eq!(chart.timeline.next_boundary(0.0), measure_len);
    let slow_gap = chart.notes[6].time - chart.notes[5].time;
    let fast_gap = chart.notes[1].time - chart.notes[0].time;
    assert!((slow_gap - 2.0 * fast_gap).abs() < 1e-9);
}

#[test]
fn test_missing_difficulty_is_a_typed_error() {
    let err = load_chart(CHART, &DifficultyDescriptor::new(1)).unwrap_err();
    assert_eq!(
        err,
        ChartError::Parse(ParseError::DifficultySectionMissing { id: 1 })
    );
}

#[test]
fn test_warnings_ride_along_with_a_usable_chart() {
    let text = "&inote_0=(120){4}1h[bogus],2,3,4,";
    let (chart, warnings) = load_chart(text, &DifficultyDescriptor::new(0)).unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(chart.notes.len(), 4);
    assert_eq!(chart.notes[0].duration, 0.0);
}

#[test]
fn test_full_transport_session() {
    let found = scan_difficulties(CHART);
    let (chart, _) = load_chart(CHART, &found[&0]).unwrap();
    let total = chart.total_duration;

    let mut engine = PlaybackEngine::new();
    let router = IntentRouter::new();
    engine.load(chart);

    router.dispatch(&mut engine, Intent::PlayPause, 0.0);
    engine.tick(2.5);
    assert_eq!(engine.snapshot().position, 2.5);

    router.dispatch(&mut engine, Intent::Restart, 2.5);
    assert_eq!(engine.snapshot().position, 2.0);

    // Restart re-anchored at the restart instant, so no time has elapsed.
    router.dispatch(&mut engine, Intent::SpeedUp, 2.5);
    engine.tick(2.5);
    assert_eq!(engine.snapshot().position, 2.0);

    router.dispatch(&mut engine, Intent::PlayPause, 2.5);
    // Next boundary is 4.0 but the chart ends at 3.5; clamped.
    router.dispatch(&mut engine, Intent::StepMeasure(Direction::Forward), 2.5);
    assert_eq!(engine.snapshot().position, 3.5);

    engine.tick(500.0);
    assert_eq!(engine.snapshot().position, 3.5);

    engine.reset();
    engine.reset();
    assert!(engine.snapshot().notes.is_empty());
    assert_eq!(engine.snapshot().position, 0.0);

    // total_duration stays within the last measure's boundary table.
    assert!(total > 0.0);
}
