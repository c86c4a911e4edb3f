use crate::error::ParseError;
use crate::model::{SlideShape, TouchRegion};

/// Token types for the chart notation
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Timing
    Comma,              // , advance by one subdivision
    Bpm {
        bpm: f64,
        beats: Option<u32>,
    },                  // (120) or (120:3)
    Divide(u32),        // {8}

    // Notes
    Lane(u8),           // 1-8
    Hold,               // h
    Break,              // b
    Shape(SlideShape),  // - < > ^ v p q s z w
    Region(TouchRegion),// A B C D E

    // Grouping / modifiers
    Slash,              // / joins simultaneous notes
    Bracket(String),    // raw [x:y] payload, interpreted by the parser
}

/// A token with its position in the section body
#[derive(Debug, Clone)]
pub struct LocatedToken {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

/// Lexer for tokenizing one difficulty section body
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
            position: 0,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    /// Consume up to (and including) `close`, returning the raw content
    /// between the delimiters. The opening delimiter has already been
    /// consumed. Fails if the section ends before `close` is found.
    fn scan_delimited(
        &mut self,
        open: char,
        close: char,
        line: usize,
        column: usize,
    ) -> Result<String, ParseError> {
        let start = self.position;
        while let Some(&c) = self.peek() {
            if c == close {
                let content = self.input[start..self.position].to_string();
                self.advance();
                return Ok(content);
            }
            self.advance();
        }
        Err(ParseError::UnrecognizedToken {
            line,
            column,
            symbol: open.to_string(),
        })
    }

    pub fn tokenize(&mut self) -> Result<Vec<LocatedToken>, ParseError> {
        let mut tokens = Vec::new();

        while let Some(&c) = self.peek() {
            let line = self.line;
            let column = self.column;

            let token = match c {
                ',' => {
                    self.advance();
                    Token::Comma
                }
                '/' => {
                    self.advance();
                    Token::Slash
                }
                '1'..='8' => {
                    self.advance();
                    Token::Lane(c.to_digit(10).unwrap() as u8)
                }
                'h' => {
                    self.advance();
                    Token::Hold
                }
                'b' => {
                    self.advance();
                    Token::Break
                }
                '-' | '<' | '>' | '^' | 'v' | 'p' | 'q' | 's' | 'z' | 'w' => {
                    self.advance();
                    Token::Shape(SlideShape::from_symbol(c).unwrap())
                }
                'A' | 'B' | 'C' | 'D' | 'E' => {
                    self.advance();
                    Token::Region(TouchRegion::from_symbol(c).unwrap())
                }
                '(' => {
                    self.advance();
                    let content = self.scan_delimited('(', ')', line, column)?;
                    parse_bpm_directive(&content, line, column)?
                }
                '{' => {
                    self.advance();
                    let content = self.scan_delimited('{', '}', line, column)?;
                    match content.trim().parse::<u32>() {
                        Ok(n) if n >= 1 => Token::Divide(n),
                        _ => {
                            return Err(ParseError::UnrecognizedToken {
                                line,
                                column,
                                symbol: format!("{{{}}}", content),
                            });
                        }
                    }
                }
                '[' => {
                    self.advance();
                    // Content is interpreted by the parser so a malformed
                    // length suffix can degrade to a warning instead of
                    // aborting the whole parse.
                    let content = self.scan_delimited('[', ']', line, column)?;
                    Token::Bracket(content)
                }
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                    continue;
                }
                _ => {
                    return Err(ParseError::UnrecognizedToken {
                        line,
                        column,
                        symbol: c.to_string(),
                    });
                }
            };

            tokens.push(LocatedToken {
                token,
                line,
                column,
            });
        }

        Ok(tokens)
    }
}

/// Parse the content of a `(...)` tempo directive: a BPM value, optionally
/// followed by `:beats` to change the measure signature.
fn parse_bpm_directive(content: &str, line: usize, column: usize) -> Result<Token, ParseError> {
    let malformed = || ParseError::UnrecognizedToken {
        line,
        column,
        symbol: format!("({})", content),
    };

    let (bpm_part, beats_part) = match content.split_once(':') {
        Some((b, s)) => (b, Some(s)),
        None => (content, None),
    };

    let bpm: f64 = bpm_part.trim().parse().map_err(|_| malformed())?;
    if !(bpm > 0.0) || !bpm.is_finite() {
        return Err(malformed());
    }

    let beats = match beats_part {
        Some(s) => match s.trim().parse::<u32>() {
            Ok(n) if n >= 1 => Some(n),
            _ => return Err(malformed()),
        },
        None => None,
    };

    Ok(Token::Bpm { bpm, beats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens_of(input: &str) -> Vec<Token> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_simple_taps() {
        assert_eq!(
            tokens_of("1,5,"),
            vec![
                Token::Lane(1),
                Token::Comma,
                Token::Lane(5),
                Token::Comma,
            ]
        );
    }

    #[test]
    fn test_whitespace_insignificant() {
        assert_eq!(
            tokens_of("1 ,\n\t5 ,"),
            vec![
                Token::Lane(1),
                Token::Comma,
                Token::Lane(5),
                Token::Comma,
            ]
        );
    }

    #[test]
    fn test_bpm_directive() {
        assert_eq!(
            tokens_of("(174.5)"),
            vec![Token::Bpm {
                bpm: 174.5,
                beats: None
            }]
        );
    }

    #[test]
    fn test_bpm_directive_with_signature() {
        assert_eq!(
            tokens_of("(90:3)"),
            vec![Token::Bpm {
                bpm: 90.0,
                beats: Some(3)
            }]
        );
    }

    #[test]
    fn test_divide_directive() {
        assert_eq!(tokens_of("{16}"), vec![Token::Divide(16)]);
    }

    #[test]
    fn test_hold_with_bracket() {
        assert_eq!(
            tokens_of("3h[4:1]"),
            vec![
                Token::Lane(3),
                Token::Hold,
                Token::Bracket("4:1".to_string()),
            ]
        );
    }

    #[test]
    fn test_slide() {
        assert_eq!(
            tokens_of("1-5[8:3]"),
            vec![
                Token::Lane(1),
                Token::Shape(SlideShape::Straight),
                Token::Lane(5),
                Token::Bracket("8:3".to_string()),
            ]
        );
    }

    #[test]
    fn test_touch_and_break() {
        assert_eq!(
            tokens_of("A1/C/2b"),
            vec![
                Token::Region(TouchRegion::A),
                Token::Lane(1),
                Token::Slash,
                Token::Region(TouchRegion::C),
                Token::Slash,
                Token::Lane(2),
                Token::Break,
            ]
        );
    }

    #[test]
    fn test_unrecognized_symbol_is_fatal() {
        let err = Lexer::new("1,X,").tokenize().unwrap_err();
        assert_eq!(
            err,
            ParseError::UnrecognizedToken {
                line: 1,
                column: 3,
                symbol: "X".to_string(),
            }
        );
    }

    #[test]
    fn test_unrecognized_symbol_location_tracks_lines() {
        let err = Lexer::new("1,\n2,!").tokenize().unwrap_err();
        assert_eq!(
            err,
            ParseError::UnrecognizedToken {
                line: 2,
                column: 3,
                symbol: "!".to_string(),
            }
        );
    }

    #[test]
    fn test_lane_zero_rejected() {
        assert!(Lexer::new("0,").tokenize().is_err());
    }

    #[test]
    fn test_unterminated_bpm_directive() {
        assert!(Lexer::new("(120").tokenize().is_err());
    }

    #[test]
    fn test_malformed_bpm_directive() {
        assert!(Lexer::new("(fast)").tokenize().is_err());
        assert!(Lexer::new("(0)").tokenize().is_err());
        assert!(Lexer::new("(120:0)").tokenize().is_err());
    }

    #[test]
    fn test_malformed_bracket_still_lexes() {
        // Bracket payloads are interpreted later; the lexer passes them raw.
        assert_eq!(
            tokens_of("1h[oops]"),
            vec![
                Token::Lane(1),
                Token::Hold,
                Token::Bracket("oops".to_string()),
            ]
        );
    }
}
