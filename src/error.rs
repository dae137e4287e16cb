//! Error taxonomy for parsing, resolution, base loading and composition.

use crate::{SizeClass, Slot};
use std::fmt;
use thiserror::Error;

/// A cluster name that breaks its slot alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlphabetViolation {
    #[error("invalid {slot} name contains an unknown character '{highlighted}'")]
    UnknownSymbol { slot: Slot, symbol: char, highlighted: String },

    #[error("invalid {slot} order '{highlighted}' symbols must follow the order {order}")]
    OutOfOrder { slot: Slot, symbol: char, highlighted: String, order: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("missing | separator for line")]
    MissingSeparator,

    #[error("missing cluster name before the | separator")]
    MissingName,

    #[error("cluster '{name}' has no expressions to derive it from")]
    EmptyDerivation { name: String },

    #[error("malformed expression '{expr}', expected name or name.commands")]
    MalformedExpression { expr: String },

    #[error("unknown command '{command}' for cluster '{cluster}'")]
    UnknownCommand { cluster: String, command: char },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionOrderError {
    #[error("found the VOWEL section but it was not the first section in the file")]
    VowelNotFirst,

    #[error("found the INITIAL section but it was not preceded by the VOWEL section")]
    InitialWithoutVowel,

    #[error("found the FINAL section but it was not preceded by the INITIAL section")]
    FinalWithoutInitial,

    #[error("no section was set, a section must be specified before providing cluster derivations")]
    NoSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineErrorKind {
    #[error(transparent)]
    Alphabet(#[from] AlphabetViolation),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    SectionOrder(#[from] SectionOrderError),
}

/// One diagnostic tied to a 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line} {kind}")]
pub struct LineError {
    pub line: usize,
    pub kind: LineErrorKind,
}

impl LineError {
    pub fn new(line: usize, kind: impl Into<LineErrorKind>) -> Self {
        LineError { line, kind: kind.into() }
    }
}

/// Every problem found while parsing one derivation source.
///
/// Displays as `label:line message`, one per line, capped at
/// `max_reported` entries followed by a count of the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationError {
    pub source: String,
    pub errors: Vec<LineError>,
    pub max_reported: usize,
}

impl DerivationError {
    pub const DEFAULT_MAX_REPORTED: usize = 10;

    pub fn new(source: impl Into<String>, errors: Vec<LineError>) -> Self {
        DerivationError { source: source.into(), errors, max_reported: Self::DEFAULT_MAX_REPORTED }
    }

    pub fn with_max_reported(mut self, max_reported: usize) -> Self {
        self.max_reported = max_reported;
        self
    }

    /// The entries that make it into the report.
    pub fn reported(&self) -> &[LineError] {
        &self.errors[..self.errors.len().min(self.max_reported)]
    }

    /// How many entries were left out of the report.
    pub fn overflow(&self) -> usize {
        self.errors.len().saturating_sub(self.max_reported)
    }
}

impl fmt::Display for DerivationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.reported().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}:{} {}", self.source, e.line, e.kind)?;
        }
        let overflow = self.overflow();
        if overflow > 0 {
            write!(f, "\nmax errors reached, there were {} more errors", overflow)?;
        }
        Ok(())
    }
}

impl std::error::Error for DerivationError {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(
        "line {line}: cannot derive {slot} cluster '{target}' ({size}): source cluster '{source_name}' is not defined"
    )]
    MissingCluster { target: String, source_name: String, slot: Slot, size: SizeClass, line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlyphError {
    #[error("failed to find {slot} glyph at '{}'", .path.join("/"))]
    MissingGlyph { slot: Slot, path: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("invalid {part} cluster '{cluster}' in syllable '{syllable}'")]
    InvalidCluster { part: Slot, cluster: String, syllable: String },

    #[error("no {part} cluster '{cluster}' for syllable '{syllable}'")]
    MissingCluster { part: Slot, cluster: String, syllable: String },
}

/// Umbrella error for a complete font build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FontError {
    #[error(transparent)]
    Glyph(#[from] GlyphError),

    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
