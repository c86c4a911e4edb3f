//! Section parser: turns one difficulty's note body into timed note
//! commands in notation coordinates (measure + fraction of measure).
//!
//! Timing inside a body works off two directives:
//! - `{n}` declares the subdivision: every subsequent `,` advances the
//!   cursor by `1/n` of a measure.
//! - `(bpm)` / `(bpm:beats)` records a tempo change, resolved to seconds
//!   later by the builder.
//!
//! Notes written between two commas share the cursor position exactly;
//! `/` joins additional simultaneous notes. The cursor is tracked as an
//! exact rational fraction of a measure so simultaneity survives mixed
//! subdivisions without float drift.

use crate::error::{ParseError, ParseWarning};
use crate::lexer::{Lexer, LocatedToken, Token};
use crate::model::{
    BpmCommand, ChartModelInput, DifficultyDescriptor, NoteCommand, NoteKind, NotePosition,
    SlidePath, TouchPoint, TouchRegion,
};
use crate::scanner::{chart_title, section_body};

/// Default subdivision when a body declares none: four slots per measure.
const DEFAULT_DIVIDE: u32 = 4;

/// Parse the section matching `difficulty.id` out of the raw chart text.
///
/// Fails with [`ParseError::DifficultySectionMissing`] when the section is
/// absent and [`ParseError::UnrecognizedToken`] on symbols outside the
/// closed vocabulary. Malformed hold/slide length suffixes degrade to a
/// duration of zero and are reported in the returned `warnings`.
///
/// Pure function over its inputs; performs no I/O.
pub fn parse_chart(
    text: &str,
    difficulty: &DifficultyDescriptor,
) -> Result<ChartModelInput, ParseError> {
    let body = section_body(text, difficulty.id)?;
    let tokens = Lexer::new(body).tokenize()?;

    let mut parser = SectionParser::new(tokens);
    parser.run();

    Ok(ChartModelInput {
        difficulty: difficulty.clone(),
        title: chart_title(text),
        notes: parser.notes,
        bpm_changes: parser.bpm_changes,
        warnings: parser.warnings,
    })
}

/// Cursor position as an exact fraction of a measure.
struct Cursor {
    measure: u32,
    num: u64,
    den: u64,
}

impl Cursor {
    fn new() -> Self {
        Self {
            measure: 0,
            num: 0,
            den: 1,
        }
    }

    /// Advance by `1/divide` of a measure, carrying into the next measure
    /// when the fraction reaches 1.
    fn advance(&mut self, divide: u32) {
        let d = divide as u64;
        let g = gcd(self.den, d);
        let den = self.den / g * d;
        self.num = self.num * (den / self.den) + den / d;
        self.den = den;
        while self.num >= self.den {
            self.num -= self.den;
            self.measure += 1;
        }
        let g = gcd(self.num, self.den);
        if self.num == 0 {
            self.den = 1;
        } else {
            self.num /= g;
            self.den /= g;
        }
    }

    fn offset(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

struct SectionParser {
    tokens: std::iter::Peekable<std::vec::IntoIter<LocatedToken>>,
    cursor: Cursor,
    divide: u32,
    notes: Vec<NoteCommand>,
    bpm_changes: Vec<BpmCommand>,
    warnings: Vec<ParseWarning>,
}

impl SectionParser {
    fn new(tokens: Vec<LocatedToken>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
            cursor: Cursor::new(),
            divide: DEFAULT_DIVIDE,
            notes: Vec::new(),
            bpm_changes: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn run(&mut self) {
        while let Some(located) = self.tokens.next() {
            let (line, column) = (located.line, located.column);
            match located.token {
                Token::Comma => self.cursor.advance(self.divide),
                Token::Divide(n) => self.divide = n,
                Token::Bpm { bpm, beats } => {
                    // Takes effect at the start of the measure it appears in.
                    self.bpm_changes.push(BpmCommand {
                        measure: self.cursor.measure,
                        bpm,
                        beats,
                    });
                }
                Token::Lane(lane) => self.parse_lane_note(lane, line, column),
                Token::Region(region) => self.parse_touch_note(region, line, column),
                // Slashes between notes carry no information of their own;
                // joined notes already share the cursor position.
                Token::Slash => {}
                Token::Hold | Token::Break | Token::Shape(_) | Token::Bracket(_) => {
                    self.warn(
                        line,
                        column,
                        format!("modifier '{:?}' without a preceding note", located.token),
                    );
                }
            }
        }
    }

    /// A lane note: tap by default, with `b`, `h[x:y]`, or a slide
    /// shape+destination suffix selecting the other kinds.
    fn parse_lane_note(&mut self, lane: u8, line: usize, column: usize) {
        let (kind, duration) = match self.tokens.peek().map(|t| t.token.clone()) {
            Some(Token::Break) => {
                self.tokens.next();
                (NoteKind::Break, 0.0)
            }
            Some(Token::Hold) => {
                self.tokens.next();
                let duration = self.parse_length_suffix("hold", line, column);
                (NoteKind::Hold, duration)
            }
            Some(Token::Shape(shape)) => {
                self.tokens.next();
                let destination = match self.tokens.peek().map(|t| &t.token) {
                    Some(Token::Lane(dest)) => {
                        let dest = *dest;
                        self.tokens.next();
                        dest
                    }
                    _ => {
                        self.warn(line, column, "slide without a destination lane".to_string());
                        lane
                    }
                };
                let duration = self.parse_length_suffix("slide", line, column);
                (NoteKind::Slide(SlidePath { shape, destination }), duration)
            }
            _ => (NoteKind::Tap, 0.0),
        };

        self.push_note(kind, NotePosition::Lane(lane), duration);
    }

    /// A touch note: region letter plus sensor index. The center sensor
    /// `C` stands alone.
    fn parse_touch_note(&mut self, region: TouchRegion, line: usize, column: usize) {
        let index = if region == TouchRegion::C {
            0
        } else {
            match self.tokens.peek().map(|t| &t.token) {
                Some(Token::Lane(idx)) => {
                    let idx = *idx;
                    self.tokens.next();
                    idx
                }
                _ => {
                    self.warn(line, column, "touch region without a sensor index".to_string());
                    1
                }
            }
        };

        self.push_note(
            NoteKind::Touch,
            NotePosition::Sensor(TouchPoint { region, index }),
            0.0,
        );
    }

    /// Interpret an optional `[x:y]` length suffix as `y/x` measures.
    /// Missing or malformed suffixes degrade to zero with a warning so the
    /// rest of the section keeps parsing.
    fn parse_length_suffix(&mut self, what: &str, line: usize, column: usize) -> f64 {
        let raw = match self.tokens.peek().map(|t| &t.token) {
            Some(Token::Bracket(raw)) => {
                let raw = raw.clone();
                self.tokens.next();
                raw
            }
            _ => {
                self.warn(line, column, format!("{} without a length suffix", what));
                return 0.0;
            }
        };

        match parse_length(&raw) {
            Some(duration) => duration,
            None => {
                self.warn(
                    line,
                    column,
                    format!("{} length suffix '[{}]' is malformed", what, raw),
                );
                0.0
            }
        }
    }

    fn push_note(&mut self, kind: NoteKind, position: NotePosition, duration: f64) {
        self.notes.push(NoteCommand {
            measure: self.cursor.measure,
            offset: self.cursor.offset(),
            duration,
            kind,
            position,
        });
    }

    fn warn(&mut self, line: usize, column: usize, detail: String) {
        self.warnings.push(ParseWarning::MalformedModifier {
            line,
            column,
            detail,
        });
    }
}

/// `x:y` means y slots of `1/x` measure each.
fn parse_length(raw: &str) -> Option<f64> {
    let (x, y) = raw.split_once(':')?;
    let x: u32 = x.trim().parse().ok()?;
    let y: u32 = y.trim().parse().ok()?;
    if x == 0 {
        return None;
    }
    Some(y as f64 / x as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(body: &str) -> ChartModelInput {
        let text = format!("&inote_0={}", body);
        parse_chart(&text, &DifficultyDescriptor::new(0)).unwrap()
    }

    #[test]
    fn test_missing_section() {
        let text = "&inote_3=1,2,3,4,";
        let err = parse_chart(text, &DifficultyDescriptor::new(1)).unwrap_err();
        assert_eq!(err, ParseError::DifficultySectionMissing { id: 1 });
    }

    #[test]
    fn test_taps_advance_by_subdivision() {
        let input = parse("{4}1,2,,3,");
        assert_eq!(input.notes.len(), 3);
        assert_eq!((input.notes[0].measure, input.notes[0].offset), (0, 0.0));
        assert_eq!((input.notes[1].measure, input.notes[1].offset), (0, 0.25));
        assert_eq!((input.notes[2].measure, input.notes[2].offset), (0, 0.75));
        assert!(input.warnings.is_empty());
    }

    #[test]
    fn test_measure_carry() {
        let input = parse("{2}1,2,3,");
        assert_eq!((input.notes[2].measure, input.notes[2].offset), (1, 0.0));
    }

    #[test]
    fn test_subdivision_change_mid_body() {
        let input = parse("{4}1,{8}2,3,");
        assert_eq!(input.notes[1].offset, 0.25);
        assert_eq!(input.notes[2].offset, 0.375);
    }

    #[test]
    fn test_simultaneous_group_shares_position() {
        let input = parse("{4}1/5/A3,2,");
        assert_eq!(input.notes.len(), 4);
        let first_three: Vec<(u32, f64)> = input.notes[..3]
            .iter()
            .map(|n| (n.measure, n.offset))
            .collect();
        assert_eq!(first_three, vec![(0, 0.0), (0, 0.0), (0, 0.0)]);
        // Input order preserved: lane 1, lane 5, touch A3.
        assert_eq!(input.notes[0].position, NotePosition::Lane(1));
        assert_eq!(input.notes[1].position, NotePosition::Lane(5));
        assert_eq!(
            input.notes[2].position,
            NotePosition::Sensor(TouchPoint {
                region: TouchRegion::A,
                index: 3
            })
        );
    }

    #[test]
    fn test_stacked_duplicates_are_preserved() {
        let input = parse("{4}1/1,");
        assert_eq!(input.notes.len(), 2);
        assert_eq!(input.notes[0].position, input.notes[1].position);
    }

    #[test]
    fn test_hold_duration_in_measures() {
        let input = parse("{4}3h[4:1],");
        assert_eq!(input.notes[0].kind, NoteKind::Hold);
        assert_eq!(input.notes[0].duration, 0.25);
    }

    #[test]
    fn test_slide_path() {
        let input = parse("{4}1-5[8:3],");
        assert_eq!(
            input.notes[0].kind,
            NoteKind::Slide(SlidePath {
                shape: crate::model::SlideShape::Straight,
                destination: 5
            })
        );
        assert_eq!(input.notes[0].duration, 3.0 / 8.0);
        assert_eq!(input.notes[0].position, NotePosition::Lane(1));
    }

    #[test]
    fn test_break_note() {
        let input = parse("{4}7b,");
        assert_eq!(input.notes[0].kind, NoteKind::Break);
        assert_eq!(input.notes[0].duration, 0.0);
    }

    #[test]
    fn test_center_touch_stands_alone() {
        let input = parse("{4}C,");
        assert_eq!(
            input.notes[0].position,
            NotePosition::Sensor(TouchPoint {
                region: TouchRegion::C,
                index: 0
            })
        );
    }

    #[test]
    fn test_malformed_hold_suffix_degrades_with_warning() {
        let input = parse("{4}1h[oops],2,");
        assert_eq!(input.notes.len(), 2);
        assert_eq!(input.notes[0].kind, NoteKind::Hold);
        assert_eq!(input.notes[0].duration, 0.0);
        assert_eq!(input.warnings.len(), 1);
        // The note after the malformed suffix still parses at the next slot.
        assert_eq!(input.notes[1].offset, 0.25);
    }

    #[test]
    fn test_hold_without_suffix_warns() {
        let input = parse("{4}1h,");
        assert_eq!(input.notes[0].duration, 0.0);
        assert!(matches!(
            input.warnings[0],
            ParseWarning::MalformedModifier { .. }
        ));
    }

    #[test]
    fn test_zero_subdivision_length_is_malformed() {
        let input = parse("{4}1h[0:1],");
        assert_eq!(input.notes[0].duration, 0.0);
        assert_eq!(input.warnings.len(), 1);
    }

    #[test]
    fn test_bpm_changes_recorded_at_measure() {
        let input = parse("(120){4}1,2,3,4,(150)5,");
        assert_eq!(
            input.bpm_changes,
            vec![
                BpmCommand {
                    measure: 0,
                    bpm: 120.0,
                    beats: None
                },
                BpmCommand {
                    measure: 1,
                    bpm: 150.0,
                    beats: None
                },
            ]
        );
    }

    #[test]
    fn test_unrecognized_token_is_fatal() {
        let text = "&inote_0={4}1,?,";
        let err = parse_chart(text, &DifficultyDescriptor::new(0)).unwrap_err();
        assert!(matches!(err, ParseError::UnrecognizedToken { .. }));
    }

    #[test]
    fn test_title_carried_from_header() {
        let text = "&title=Example\n&inote_0={4}1,";
        let input = parse_chart(text, &DifficultyDescriptor::new(0)).unwrap();
        assert_eq!(input.title, Some("Example".to_string()));
    }

    #[test]
    fn test_empty_section_parses_to_no_notes() {
        let input = parse("{4},,,,");
        assert!(input.notes.is_empty());
        assert!(input.warnings.is_empty());
    }
}
