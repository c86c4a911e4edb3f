//! notechart — parsing and playback-simulation core for a rhythm-game
//! chart viewer.
//!
//! A chart text blob embeds one note body per difficulty. The pipeline is:
//! scan the blob for difficulty sections, parse one section into timed
//! note commands, resolve those against the tempo timeline into an
//! immutable [`ChartData`], then hand it to a [`playback::PlaybackEngine`]
//! driven by the host's render loop.
//!
//! # Example
//! ```
//! use notechart::{load_chart, scan_difficulties, default_difficulty};
//!
//! let text = "&title=Demo\n&inote_0=(120){4}1,2,3,4,\n&inote_3=(120){8}1,1,1,1,";
//! let found = scan_difficulties(text);
//! let pick = default_difficulty(&found).unwrap(); // highest id present
//! let (chart, warnings) = load_chart(text, pick).unwrap();
//! assert_eq!(chart.difficulty.label, "MASTER");
//! assert!(warnings.is_empty());
//! ```

pub mod builder;
pub mod error;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod playback;
pub mod scanner;

pub use builder::build_chart;
pub use error::{BuildError, ChartError, ParseError, ParseWarning};
pub use model::*;
pub use parser::parse_chart;
pub use scanner::{chart_title, default_difficulty, scan_difficulties};

/// Parse and build one difficulty in a single call.
/// This is the main entry point for the library.
///
/// Warnings from the parse ride along with the built chart; they are
/// diagnostics, never failures.
pub fn load_chart(
    text: &str,
    difficulty: &DifficultyDescriptor,
) -> Result<(ChartData, Vec<ParseWarning>), ChartError> {
    let mut input = parse_chart(text, difficulty)?;
    let warnings = std::mem::take(&mut input.warnings);
    let chart = build_chart(input)?;
    Ok((chart, warnings))
}
