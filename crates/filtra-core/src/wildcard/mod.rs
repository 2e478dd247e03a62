//! Glob-style wildcard patterns.
//!
//! A pattern compiles once into a flat list of [`Placeholder`]s. The list is
//! public so the canonicalizer can recognise patterns that are really an
//! equality test or a plain non-null check.


use std::fmt;
use thiserror::Error as ThisError;

///
/// PatternError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PatternError {
    #[error("unterminated character set starting at offset {offset}")]
    UnterminatedSet { offset: usize },

    #[error("empty character set at offset {offset}")]
    EmptySet { offset: usize },

    #[error("pattern ends with a dangling escape character")]
    TrailingEscape,

    #[error("inverted character range '{start}-{end}'")]
    InvertedRange { start: char, end: char },
}

///
/// WildcardFormat
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct WildcardFormat {
    pub case_sensitive: bool,
}

impl WildcardFormat {
    pub const CASE_SENSITIVE: Self = Self {
        case_sensitive: true,
    };

    pub const CASE_INSENSITIVE: Self = Self {
        case_sensitive: false,
    };
}

impl Default for WildcardFormat {
    fn default() -> Self {
        Self::CASE_SENSITIVE
    }
}

///
/// CharacterSet
///
/// Inclusive character ranges from a `[...]` group. A single character is
/// stored as a one-element range.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CharacterSet {
    ranges: Vec<(char, char)>,
}

impl CharacterSet {
    #[must_use]
    pub fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }

    fn contains(&self, ch: char, case_sensitive: bool) -> bool {
        let hit = |c: char| self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi);
        if hit(ch) {
            return true;
        }
        if case_sensitive {
            return false;
        }

        ch.to_lowercase().any(hit) || ch.to_uppercase().any(hit)
    }
}

///
/// Placeholder
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Placeholder {
    /// Matches exactly one literal character.
    FixedCharacter(char),
    /// Matches any run of zero or more characters.
    StarWildcard,
    /// Matches exactly one arbitrary character.
    QuestionMarkWildcard,
    /// Matches exactly one character from the set.
    CharacterSet(CharacterSet),
}

impl Placeholder {
    // Single-character match; never called for `StarWildcard`.
    fn matches_one(&self, ch: char, case_sensitive: bool) -> bool {
        match self {
            Self::FixedCharacter(expected) => {
                *expected == ch || (!case_sensitive && chars_eq_ignore_case(*expected, ch))
            }
            Self::QuestionMarkWildcard => true,
            Self::CharacterSet(set) => set.contains(ch, case_sensitive),
            Self::StarWildcard => false,
        }
    }
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a.to_lowercase().eq(b.to_lowercase())
}

///
/// WildcardPattern
///
/// Syntax:
/// - `*`      any run of characters (consecutive stars collapse)
/// - `?`      any single character
/// - `[a-z]`  one character from the listed characters and ranges
/// - `\x`     the literal character `x`
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct WildcardPattern {
    text: String,
    format: WildcardFormat,
    placeholders: Vec<Placeholder>,
}

impl WildcardPattern {
    pub fn new(text: impl Into<String>, format: WildcardFormat) -> Result<Self, PatternError> {
        let text = text.into();
        let placeholders = compile(&text)?;

        Ok(Self {
            text,
            format,
            placeholders,
        })
    }

    pub fn case_sensitive(text: impl Into<String>) -> Result<Self, PatternError> {
        Self::new(text, WildcardFormat::CASE_SENSITIVE)
    }

    pub fn case_insensitive(text: impl Into<String>) -> Result<Self, PatternError> {
        Self::new(text, WildcardFormat::CASE_INSENSITIVE)
    }

    #[must_use]
    pub fn pattern_text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn format(&self) -> WildcardFormat {
        self.format
    }

    #[must_use]
    pub const fn is_case_sensitive(&self) -> bool {
        self.format.case_sensitive
    }

    #[must_use]
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    #[must_use]
    pub const fn placeholder_count(&self) -> usize {
        self.placeholders.len()
    }

    /// The literal this pattern spells out when it holds no wildcard spans.
    ///
    /// Returns `None` for the empty pattern.
    #[must_use]
    pub fn fixed_literal(&self) -> Option<String> {
        if self.placeholders.is_empty() {
            return None;
        }

        self.placeholders
            .iter()
            .map(|placeholder| match placeholder {
                Placeholder::FixedCharacter(ch) => Some(*ch),
                _ => None,
            })
            .collect()
    }

    /// True when the pattern is a single star and matches every string.
    #[must_use]
    pub fn is_match_all(&self) -> bool {
        matches!(self.placeholders.as_slice(), [Placeholder::StarWildcard])
    }

    /// Match `input` against the whole pattern.
    #[must_use]
    pub fn matches(&self, input: &str) -> bool {
        let input: Vec<char> = input.chars().collect();
        let placeholders = &self.placeholders;
        let case_sensitive = self.format.case_sensitive;

        let (mut p, mut s) = (0, 0);
        // last star seen: (placeholder index, input index it currently covers up to)
        let mut backtrack: Option<(usize, usize)> = None;

        while s < input.len() {
            if let Some(placeholder) = placeholders.get(p) {
                if *placeholder == Placeholder::StarWildcard {
                    backtrack = Some((p, s));
                    p += 1;
                    continue;
                }
                if placeholder.matches_one(input[s], case_sensitive) {
                    p += 1;
                    s += 1;
                    continue;
                }
            }

            let Some((star, covered)) = backtrack else {
                return false;
            };
            p = star + 1;
            s = covered + 1;
            backtrack = Some((star, covered + 1));
        }

        placeholders[p..]
            .iter()
            .all(|placeholder| *placeholder == Placeholder::StarWildcard)
    }
}

impl fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// Compile pattern text into placeholders.
fn compile(text: &str) -> Result<Vec<Placeholder>, PatternError> {
    let mut out = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        match ch {
            '*' => {
                if out.last() != Some(&Placeholder::StarWildcard) {
                    out.push(Placeholder::StarWildcard);
                }
            }
            '?' => out.push(Placeholder::QuestionMarkWildcard),
            '\\' => {
                let (_, escaped) = chars.next().ok_or(PatternError::TrailingEscape)?;
                out.push(Placeholder::FixedCharacter(escaped));
            }
            '[' => out.push(Placeholder::CharacterSet(compile_set(offset, &mut chars)?)),
            other => out.push(Placeholder::FixedCharacter(other)),
        }
    }

    Ok(out)
}

// Compile the body of a `[...]` group; the opening bracket is already consumed.
fn compile_set(
    offset: usize,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Result<CharacterSet, PatternError> {
    let mut ranges = Vec::new();

    loop {
        let (_, ch) = chars
            .next()
            .ok_or(PatternError::UnterminatedSet { offset })?;

        let start = match ch {
            ']' => break,
            '\\' => {
                chars
                    .next()
                    .ok_or(PatternError::UnterminatedSet { offset })?
                    .1
            }
            other => other,
        };

        // `a-z` is a range unless the dash is the last character of the set
        let mut lookahead = chars.clone();
        let is_range = matches!(lookahead.next(), Some((_, '-')))
            && matches!(lookahead.peek(), Some((_, c)) if *c != ']');

        if is_range {
            chars.next();
            let (_, end) = chars
                .next()
                .ok_or(PatternError::UnterminatedSet { offset })?;
            let end = if end == '\\' {
                chars
                    .next()
                    .ok_or(PatternError::UnterminatedSet { offset })?
                    .1
            } else {
                end
            };
            if end < start {
                return Err(PatternError::InvertedRange { start, end });
            }
            ranges.push((start, end));
        } else {
            ranges.push((start, start));
        }
    }

    if ranges.is_empty() {
        return Err(PatternError::EmptySet { offset });
    }

    Ok(CharacterSet { ranges })
}
