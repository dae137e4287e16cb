//! Derivation-source parser and validator.
//!
//! A derivation source describes how clusters that were never drawn by hand
//! are built out of ones that were:
//!
//! ```text
//! # comments and blank lines are ignored
//! VOWEL
//! O     | E.d
//! AE    | A E
//! INITIAL
//! H     | T.y
//! KR    | TH.x
//! FINAL
//! BP    | B P.u
//! ```
//!
//! ## Grammar
//!
//! - Three sections, `VOWEL`, `INITIAL`, `FINAL`, each keyword alone on its
//!   line and only valid right after its predecessor.
//! - Statement lines are `name | expr expr ...` with exactly one `|`.
//! - An `expr` is `cluster` or `cluster.cmds`; `cmds` is a run of
//!   `d`/`u`/`l`/`r` (move) and `x`/`y` (mirror) codes.
//! - Every name is checked against the alphabet of the current section.
//!
//! ## Diagnostics
//!
//! The parser never stops at the first bad line. Each malformed line
//! contributes one [`LineError`]; the run only succeeds when none were
//! collected, otherwise all of them come back in a [`DerivationError`].

use super::metrics::ParseMetrics;
use crate::alphabet::Alphabets;
use crate::error::{DerivationError, LineError, LineErrorKind, SectionOrderError, SyntaxError};
use crate::{Cluster, Slot};
use std::fmt;
use std::time::Instant;

/// A single transform command of the derivation language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformOp {
    MoveDown,
    MoveUp,
    MoveLeft,
    MoveRight,
    MirrorX,
    MirrorY,
}

impl TransformOp {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'd' => Some(TransformOp::MoveDown),
            'u' => Some(TransformOp::MoveUp),
            'l' => Some(TransformOp::MoveLeft),
            'r' => Some(TransformOp::MoveRight),
            'x' => Some(TransformOp::MirrorX),
            'y' => Some(TransformOp::MirrorY),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            TransformOp::MoveDown => 'd',
            TransformOp::MoveUp => 'u',
            TransformOp::MoveLeft => 'l',
            TransformOp::MoveRight => 'r',
            TransformOp::MirrorX => 'x',
            TransformOp::MirrorY => 'y',
        }
    }

    /// Apply the command to every stroke of `cluster`. Move distances depend
    /// on the cluster's slot.
    pub fn apply(self, cluster: &mut Cluster) {
        let v = cluster.slot.vertical_step();
        let h = cluster.slot.horizontal_step();
        match self {
            TransformOp::MoveDown => cluster.translate(0.0, v),
            TransformOp::MoveUp => cluster.translate(0.0, -v),
            TransformOp::MoveLeft => cluster.translate(-h, 0.0),
            TransformOp::MoveRight => cluster.translate(h, 0.0),
            TransformOp::MirrorX => cluster.mirror_x(),
            TransformOp::MirrorY => cluster.mirror_y(),
        };
    }
}

/// `source[.cmds]`: copy a known cluster and transform the copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub source: String,
    pub ops: Vec<TransformOp>,
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)?;
        if !self.ops.is_empty() {
            let cmds: String = self.ops.iter().map(|op| op.code()).collect();
            write!(f, ".{}", cmds)?;
        }
        Ok(())
    }
}

/// `target | expr expr ...` as declared on `line`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub target: String,
    pub slot: Slot,
    pub expressions: Vec<Expression>,
    pub line: usize,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} |", self.target)?;
        for expr in &self.expressions {
            write!(f, " {}", expr)?;
        }
        Ok(())
    }
}

/// Parsed statements of one source, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Derivation {
    pub source: String,
    pub statements: Vec<Statement>,
}

impl Derivation {
    pub fn for_slot(&self, slot: Slot) -> impl Iterator<Item = &Statement> {
        self.statements.iter().filter(move |s| s.slot == slot)
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Vowel,
    Initial,
    Final,
}

impl Section {
    fn slot(self) -> Option<Slot> {
        match self {
            Section::None => None,
            Section::Vowel => Some(Slot::Vowel),
            Section::Initial => Some(Slot::Initial),
            Section::Final => Some(Slot::Final),
        }
    }
}

/// Parser over one derivation source.
///
/// Usage: `Parser::new(label, text).run()`. `label` only shows up in
/// diagnostics (usually the file name).
#[derive(Debug)]
pub struct Parser<'a> {
    label: &'a str,
    text: &'a str,
    alphabets: Alphabets,
    max_reported: usize,
}

impl<'a> Parser<'a> {
    pub fn new(label: &'a str, text: &'a str) -> Self {
        Parser { label, text, alphabets: Alphabets::default(), max_reported: DerivationError::DEFAULT_MAX_REPORTED }
    }

    pub fn with_alphabets(mut self, alphabets: Alphabets) -> Self {
        self.alphabets = alphabets;
        self
    }

    pub fn with_max_reported(mut self, max_reported: usize) -> Self {
        self.max_reported = max_reported;
        self
    }

    pub fn run(self) -> Result<Derivation, DerivationError> {
        self.run_with_metrics().0
    }

    /// Parse the whole source, collecting one error per bad line.
    pub fn run_with_metrics(self) -> (Result<Derivation, DerivationError>, ParseMetrics) {
        let start = Instant::now();
        let mut metrics = ParseMetrics::default();
        let mut errors: Vec<LineError> = Vec::new();
        let mut statements: Vec<Statement> = Vec::new();
        let mut section = Section::None;

        for (idx, raw) in self.text.lines().enumerate() {
            let line = idx + 1;
            metrics.lines += 1;
            let content = raw.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }

            let next = match content {
                "VOWEL" => Some((Section::Vowel, Section::None, SectionOrderError::VowelNotFirst)),
                "INITIAL" => Some((Section::Initial, Section::Vowel, SectionOrderError::InitialWithoutVowel)),
                "FINAL" => Some((Section::Final, Section::Initial, SectionOrderError::FinalWithoutInitial)),
                _ => None,
            };

            if let Some((entered, required, violation)) = next {
                trace!("[parse:section] line={} section={:?}", line, entered);
                if section != required {
                    errors.push(LineError::new(line, violation));
                }
                // Keep going in the section that was named so later lines
                // are still checked against the right alphabet.
                section = entered;
                continue;
            }

            match self.parse_statement(section, line, content) {
                Ok(statement) => statements.push(statement),
                Err(kind) => errors.push(LineError::new(line, kind)),
            }
        }

        for statement in &statements {
            match statement.slot {
                Slot::Vowel => metrics.vowel += 1,
                Slot::Initial | Slot::Solo => metrics.initial += 1,
                Slot::Final => metrics.final_ += 1,
            }
        }
        metrics.errors = errors.len();
        metrics.duration = start.elapsed();

        if !errors.is_empty() {
            for e in &errors {
                trace!("[parse:error] {}:{} {}", self.label, e.line, e.kind);
            }
            let err = DerivationError::new(self.label, errors).with_max_reported(self.max_reported);
            return (Err(err), metrics);
        }

        (Ok(Derivation { source: self.label.to_string(), statements }), metrics)
    }

    fn parse_statement(&self, section: Section, line: usize, content: &str) -> Result<Statement, LineErrorKind> {
        let slot = section.slot().ok_or(SectionOrderError::NoSection)?;
        let alphabet = self.alphabets.for_slot(slot);

        let (name, body) = content.split_once('|').ok_or(SyntaxError::MissingSeparator)?;
        if body.contains('|') {
            return Err(SyntaxError::MissingSeparator.into());
        }

        let target = name.trim();
        if target.is_empty() {
            return Err(SyntaxError::MissingName.into());
        }
        alphabet.validate(target)?;

        let mut expressions = Vec::new();
        for token in body.split_whitespace() {
            let caps = regex!(r"^(?P<name>[^.]+)(?:\.(?P<cmds>[^.]*))?$")
                .captures(token)
                .ok_or_else(|| SyntaxError::MalformedExpression { expr: token.to_string() })?;
            let source = &caps["name"];
            alphabet.validate(source)?;

            let cmds = caps.name("cmds").map(|m| m.as_str()).unwrap_or("");
            let ops = cmds
                .chars()
                .map(|c| {
                    TransformOp::from_code(c)
                        .ok_or_else(|| SyntaxError::UnknownCommand { cluster: source.to_string(), command: c })
                })
                .collect::<Result<Vec<_>, _>>()?;

            expressions.push(Expression { source: source.to_string(), ops });
        }

        if expressions.is_empty() {
            return Err(SyntaxError::EmptyDerivation { name: target.to_string() }.into());
        }

        Ok(Statement { target: target.to_string(), slot, expressions, line })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlphabetViolation;

    fn errors_of(text: &str) -> Vec<LineError> {
        Parser::new("derived", text).run().unwrap_err().errors
    }

    #[test]
    fn parses_sections_in_order() {
        let text = "# header\nVOWEL\nO | E.d\n\nAE | A E\nINITIAL\nH | T.y\nFINAL\nBP | B P.u\n";
        let derivation = Parser::new("derived", text).run().unwrap();

        let summary: Vec<(usize, Slot, String)> =
            derivation.statements.iter().map(|s| (s.line, s.slot, s.to_string())).collect();
        assert_eq!(
            summary,
            vec![
                (3, Slot::Vowel, "O | E.d".to_string()),
                (5, Slot::Vowel, "AE | A E".to_string()),
                (7, Slot::Initial, "H | T.y".to_string()),
                (9, Slot::Final, "BP | B P.u".to_string()),
            ]
        );
        assert_eq!(derivation.for_slot(Slot::Vowel).count(), 2);
    }

    #[test]
    fn expression_commands_parse_in_order() {
        let derivation = Parser::new("derived", "INITIAL\nKW | TP.xdu T").run();
        // INITIAL before VOWEL is rejected, but the statement itself is fine.
        let err = derivation.unwrap_err();
        assert_eq!(err.errors.len(), 1);

        let derivation = Parser::new("derived", "VOWEL\nINITIAL\nKW | TP.xdu T").run().unwrap();
        let stmt = &derivation.statements[0];
        assert_eq!(stmt.expressions[0].ops, vec![TransformOp::MirrorX, TransformOp::MoveDown, TransformOp::MoveUp]);
        assert!(stmt.expressions[1].ops.is_empty());
    }

    #[test]
    fn line_errors() {
        // (source, line, expected error kind)
        let cases: Vec<(&str, usize, LineErrorKind)> = vec![
            ("VOWEL\nO E.d", 2, SyntaxError::MissingSeparator.into()),
            ("VOWEL\nO | E | A", 2, SyntaxError::MissingSeparator.into()),
            ("VOWEL\n | E", 2, SyntaxError::MissingName.into()),
            ("VOWEL\nO |", 2, SyntaxError::EmptyDerivation { name: "O".into() }.into()),
            ("VOWEL\nO | E.d.d", 2, SyntaxError::MalformedExpression { expr: "E.d.d".into() }.into()),
            ("VOWEL\nO | .d", 2, SyntaxError::MalformedExpression { expr: ".d".into() }.into()),
            ("VOWEL\n\nO | E.dq", 3, SyntaxError::UnknownCommand { cluster: "E".into(), command: 'q' }.into()),
            ("O | E", 1, SectionOrderError::NoSection.into()),
            ("INITIAL\nVOWEL", 1, SectionOrderError::InitialWithoutVowel.into()),
            ("VOWEL\nFINAL", 2, SectionOrderError::FinalWithoutInitial.into()),
            ("VOWEL\nVOWEL", 2, SectionOrderError::VowelNotFirst.into()),
            (
                "VOWEL\nINITIAL\nH | T.y\nHX | T",
                4,
                AlphabetViolation::UnknownSymbol { slot: Slot::Initial, symbol: 'X', highlighted: "H[X]".into() }
                    .into(),
            ),
        ];

        for (text, line, kind) in cases {
            let errors = errors_of(text);
            assert!(
                errors.contains(&LineError { line, kind: kind.clone() }),
                "expected {:?} at line {} for {:?}, got {:?}",
                kind,
                line,
                text,
                errors
            );
        }
    }

    #[test]
    fn initial_before_vowel_is_reported_at_the_initial_line() {
        let errors = errors_of("# fonts\n\nINITIAL\nH | T.y\nVOWEL\nO | E.d\n");

        assert_eq!(errors[0], LineError::new(3, SectionOrderError::InitialWithoutVowel));
        assert_eq!(errors[1], LineError::new(5, SectionOrderError::VowelNotFirst));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn every_bad_line_is_collected() {
        let text = "VOWEL\nAX | A\nO | E.d\nAZ | A\nOA | O\nINITIAL\nS | T\nH | T.y\nTS | T\nFINAL\nR | B\n";
        let errors = errors_of(text);

        let lines: Vec<usize> = errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![2, 4, 5, 7, 9, 11]);
        assert!(errors.iter().all(|e| matches!(e.kind, LineErrorKind::Alphabet(_))), "got {:?}", errors);
    }

    #[test]
    fn source_names_are_validated_too() {
        let errors = errors_of("VOWEL\nINITIAL\nH | T.y HT");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0].kind, LineErrorKind::Alphabet(AlphabetViolation::OutOfOrder { symbol: 'T', .. })));
    }

    #[test]
    fn metrics_count_statements_per_slot() {
        let text = "VOWEL\nO | E.d\nINITIAL\nH | T.y\nR | T.xy\n";
        let (result, metrics) = Parser::new("derived", text).run_with_metrics();
        assert!(result.is_ok());
        assert_eq!((metrics.lines, metrics.vowel, metrics.initial, metrics.final_, metrics.errors), (5, 1, 2, 0, 0));
    }
}
