extern crate self as silabex;

use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

#[macro_use]
mod macros;
mod alphabet;
mod api;
mod combinations;
mod compose;
mod engine;
mod error;
mod glyphs;
mod join;
mod linalg;

pub use alphabet::{Alphabet, Alphabets};
pub use api::{
    BuildDetails, FontBuild, Options, StrokeBuild, build_font, build_strokes, parse_derivation, resolve,
};
pub use combinations::{combinations, combinations_ordered, subsets};
pub use compose::{Glyph, split_syllable};
pub use engine::{
    ClusterMap, Derivation, Expression, FontTable, ParseMetrics, Parser, ResolveMetrics, Resolver, SizedClusters,
    Statement, TransformOp,
};
pub use error::{
    AlphabetViolation, ComposeError, DerivationError, FontError, GlyphError, LineError, LineErrorKind, ResolveError,
    SectionOrderError, SyntaxError,
};
pub use glyphs::{
    BaseLayout, GlyphSource, GroupLayout, MemoryGlyphs, SegmentLayout, SizeLayout, StrokeGroupLayout, StrokeLayout,
    load_base_table, load_stroke_pool,
};
pub use join::{
    COMPLEX_VOWELS, CONSONANT_HEADS_AND_FEET, Combinator, Element, Filter, MIRRORED_INITIALS, NamedStroke,
    SIMPLE_VOWELS, Segment, SegmentSet, SlotSet, Stage, StageMetrics, StrokeOps, StrokePool, join,
};
pub use linalg::{Mat3, Point2};

/// Environment switch for stderr traces (`SILABEX_DEBUG_DERIVE=1`).
pub(crate) static DEBUG: Lazy<bool> = Lazy::new(|| std::env::var_os("SILABEX_DEBUG_DERIVE").is_some());

// --- Core types --------------------------------------------------------------

/// Phonological role of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    /// An initial consonant cluster drawn without a final (it owns the full width).
    Solo,
    Initial,
    Vowel,
    Final,
}

impl Slot {
    pub fn name(self) -> &'static str {
        match self {
            Slot::Solo => "solo",
            Slot::Initial => "initial",
            Slot::Vowel => "vowel",
            Slot::Final => "final",
        }
    }

    /// Reference point strokes of this slot are mirrored about.
    pub fn pivot(self) -> Point2 {
        match self {
            Slot::Initial => Point2::new(300.0, 500.0),
            Slot::Final => Point2::new(700.0, 500.0),
            Slot::Solo | Slot::Vowel => Point2::new(500.0, 500.0),
        }
    }

    /// Vertical distance covered by a single up/down move. Final clusters
    /// stay where they were drawn.
    pub(crate) fn vertical_step(self) -> f64 {
        match self {
            Slot::Vowel => VOWEL_STEP,
            Slot::Solo | Slot::Initial => CONSONANT_STEP,
            Slot::Final => 0.0,
        }
    }

    /// Horizontal distance covered by a single left/right move. Consonant
    /// clusters never move sideways.
    pub(crate) fn horizontal_step(self) -> f64 {
        match self {
            Slot::Vowel => VOWEL_STEP,
            Slot::Solo | Slot::Initial | Slot::Final => 0.0,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) const VOWEL_STEP: f64 = 880.0;
pub(crate) const CONSONANT_STEP: f64 = 140.0;

/// Scaled variant of a consonant cluster set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SizeClass {
    Full,
    TwoThirds,
    Half,
}

impl SizeClass {
    pub const ALL: [SizeClass; 3] = [SizeClass::Full, SizeClass::TwoThirds, SizeClass::Half];

    pub fn name(self) -> &'static str {
        match self {
            SizeClass::Full => "full",
            SizeClass::TwoThirds => "two-thirds",
            SizeClass::Half => "half",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable path geometry shared between every copy of a stroke.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Geometry(Arc<str>);

impl Geometry {
    pub fn new(path: impl Into<Arc<str>>) -> Self {
        Geometry(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Geometry {
    fn from(path: &str) -> Self {
        Geometry::new(path)
    }
}

/// Mutable transform state carried by each stroke copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub dx: f64,
    pub dy: f64,
    pub sx: f64,
    pub sy: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Placement { dx: 0.0, dy: 0.0, sx: 1.0, sy: 1.0 }
    }
}

impl Placement {
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.dx += dx;
        self.dy += dy;
    }

    pub fn mirror_x(&mut self) {
        self.sx = -self.sx;
    }

    pub fn mirror_y(&mut self) {
        self.sy = -self.sy;
    }

    pub fn is_identity(&self) -> bool {
        *self == Placement::default()
    }

    /// Mirror about `pivot`, then apply the translation.
    ///
    /// ```text
    /// translate(dx, dy) · translate(pivot) · scale(sx, sy) · translate(-pivot)
    ///                                                        ^ applied first
    /// ```
    pub fn matrix(&self, pivot: Point2) -> Mat3 {
        Mat3::compose(&[
            Mat3::translate(self.dx, self.dy),
            Mat3::translate(pivot.x, pivot.y),
            Mat3::scale(self.sx, self.sy),
            Mat3::translate(-pivot.x, -pivot.y),
        ])
    }
}

/// A single drawable shape plus its transform state.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub slot: Slot,
    pub geometry: Geometry,
    pub placement: Placement,
}

impl Stroke {
    pub fn new(slot: Slot, geometry: Geometry) -> Self {
        Stroke { slot, geometry, placement: Placement::default() }
    }

    /// Resolved transform for rendering, pivoting on the stroke's slot.
    pub fn matrix(&self) -> Mat3 {
        self.placement.matrix(self.slot.pivot())
    }
}

/// An ordered list of strokes that together draw one symbol for a slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub slot: Slot,
    pub strokes: Vec<Stroke>,
}

impl Cluster {
    pub fn new(slot: Slot, strokes: Vec<Stroke>) -> Self {
        Cluster { slot, strokes }
    }

    /// A base cluster made of one stroke.
    pub fn single(slot: Slot, geometry: Geometry) -> Self {
        Cluster { slot, strokes: vec![Stroke::new(slot, geometry)] }
    }

    /// Concatenate stroke lists; the slot comes from the first operand.
    pub fn merge(clusters: impl IntoIterator<Item = Cluster>) -> Option<Cluster> {
        let mut iter = clusters.into_iter();
        let mut merged = iter.next()?;
        for cluster in iter {
            merged.strokes.extend(cluster.strokes);
        }
        Some(merged)
    }

    pub fn translate(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.strokes.iter_mut().for_each(|s| s.placement.translate(dx, dy));
        self
    }

    pub fn mirror_x(&mut self) -> &mut Self {
        self.strokes.iter_mut().for_each(|s| s.placement.mirror_x());
        self
    }

    pub fn mirror_y(&mut self) -> &mut Self {
        self.strokes.iter_mut().for_each(|s| s.placement.mirror_y());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_first_slot_and_stroke_order() {
        let a = Cluster::single(Slot::Initial, Geometry::from("M0 0"));
        let b = Cluster::single(Slot::Solo, Geometry::from("M1 1"));
        let merged = Cluster::merge([a, b]).unwrap();

        assert_eq!(merged.slot, Slot::Initial);
        let paths: Vec<&str> = merged.strokes.iter().map(|s| s.geometry.as_str()).collect();
        assert_eq!(paths, vec!["M0 0", "M1 1"]);
        assert!(Cluster::merge(Vec::new()).is_none());
    }

    #[test]
    fn mirror_twice_is_identity() {
        let mut c = Cluster::single(Slot::Initial, Geometry::from("M0 0"));
        c.mirror_x().mirror_y().mirror_x().mirror_y();
        assert!(c.strokes[0].placement.is_identity());
    }

    #[test]
    fn mirrored_stroke_pivots_on_its_slot() {
        let mut stroke = Stroke::new(Slot::Initial, Geometry::from("M0 0"));
        stroke.placement.mirror_x();

        // The pivot itself is a fixed point of the mirror.
        let pivot = stroke.matrix().apply(Slot::Initial.pivot());
        assert!((pivot.x - 300.0).abs() < 1e-9 && (pivot.y - 500.0).abs() < 1e-9);

        let p = stroke.matrix().apply(Point2::new(310.0, 520.0));
        assert!((p.x - 290.0).abs() < 1e-9 && (p.y - 520.0).abs() < 1e-9);
    }

    #[test]
    fn translation_is_applied_after_mirroring() {
        let mut stroke = Stroke::new(Slot::Final, Geometry::from("M0 0"));
        stroke.placement.mirror_y();
        stroke.placement.translate(0.0, -140.0);

        let p = stroke.matrix().apply(Point2::new(700.0, 510.0));
        assert!((p.x - 700.0).abs() < 1e-9);
        assert!((p.y - (490.0 - 140.0)).abs() < 1e-9, "got {:?}", p);
    }
}
