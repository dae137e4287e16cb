//! Stroke join/filter combinator.
//!
//! An alternate way of building composite clusters: instead of statements,
//! every stroke carries a *segment role* (head, stand, foot, ...) and a fixed
//! pipeline of stages finds strokes by name and role, moves them, and joins
//! them pairwise into new named strokes.
//!
//! ```text
//! pool ──stage 1──> +derived ──stage 2──> +derived ── ... ──> pool
//!         find(name, filters) -> move/flip -> join(name, a, b, ...)
//! ```
//!
//! Each stage sees everything earlier stages produced.

#[path = "join/builders.rs"]
mod builders;

pub use builders::{COMPLEX_VOWELS, CONSONANT_HEADS_AND_FEET, MIRRORED_INITIALS, SIMPLE_VOWELS};

use crate::engine::ClusterMap;
use crate::{CONSONANT_STEP, Cluster, Geometry, Placement, Slot, Stroke, VOWEL_STEP};
use std::time::{Duration, Instant};

/// Horizontal distance between the initial and final consonant positions.
const FINAL_SHIFT: f64 = 390.0;
/// Vertical distance between a head and a foot.
const HEAD_FOOT_SHIFT: f64 = 620.0;

/// Role of an element inside a consonant stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Border,
    Head,
    Hang,
    Core,
    Stand,
    Foot,
    Tall,
}

impl Segment {
    /// Label of the glyph-document node holding strokes of this role.
    pub fn label(self) -> &'static str {
        match self {
            Segment::Border => "border",
            Segment::Head => "head",
            Segment::Hang => "hang",
            Segment::Core => "core",
            Segment::Stand => "stand",
            Segment::Foot => "foot",
            Segment::Tall => "tall",
        }
    }

    fn bit(self) -> SegmentSet {
        match self {
            Segment::Border => SegmentSet::BORDER,
            Segment::Head => SegmentSet::HEAD,
            Segment::Hang => SegmentSet::HANG,
            Segment::Core => SegmentSet::CORE,
            Segment::Stand => SegmentSet::STAND,
            Segment::Foot => SegmentSet::FOOT,
            Segment::Tall => SegmentSet::TALL,
        }
    }
}

bitflags::bitflags! {
    /// Segments present in a stroke.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SegmentSet: u8 {
        const BORDER = 1 << 0;
        const HEAD   = 1 << 1;
        const HANG   = 1 << 2;
        const CORE   = 1 << 3;
        const STAND  = 1 << 4;
        const FOOT   = 1 << 5;
        const TALL   = 1 << 6;
    }
}

bitflags::bitflags! {
    /// Slot membership used by [`Filter::InSlots`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SlotSet: u8 {
        const SOLO    = 1 << 0;
        const INITIAL = 1 << 1;
        const VOWEL   = 1 << 2;
        const FINAL   = 1 << 3;
        const CONSONANT = Self::SOLO.bits() | Self::INITIAL.bits();
    }
}

impl SlotSet {
    pub fn of(slot: Slot) -> Self {
        match slot {
            Slot::Solo => SlotSet::SOLO,
            Slot::Initial => SlotSet::INITIAL,
            Slot::Vowel => SlotSet::VOWEL,
            Slot::Final => SlotSet::FINAL,
        }
    }
}

/// One piece of a stroke: geometry, its role and its own placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub segment: Segment,
    pub geometry: Geometry,
    pub placement: Placement,
}

/// A named stroke made of one or more elements.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedStroke {
    pub name: String,
    pub slot: Slot,
    pub elements: Vec<Element>,
}

impl NamedStroke {
    pub fn new(name: impl Into<String>, slot: Slot, segment: Segment, geometry: impl Into<Geometry>) -> Self {
        NamedStroke {
            name: name.into(),
            slot,
            elements: vec![Element { segment, geometry: geometry.into(), placement: Placement::default() }],
        }
    }

    pub fn segments(&self) -> SegmentSet {
        self.elements.iter().fold(SegmentSet::empty(), |acc, e| acc | e.segment.bit())
    }

    /// Vowels move a full cell; a consonant stand turns into a hang and a
    /// foot into a head.
    pub fn up(&mut self) -> &mut Self {
        for e in &mut self.elements {
            if self.slot == Slot::Vowel {
                e.placement.translate(0.0, -VOWEL_STEP);
                continue;
            }
            match e.segment {
                Segment::Stand => {
                    e.placement.translate(0.0, -CONSONANT_STEP);
                    e.segment = Segment::Hang;
                }
                Segment::Foot => {
                    e.placement.translate(0.0, -HEAD_FOOT_SHIFT);
                    e.segment = Segment::Head;
                }
                _ => {}
            }
        }
        self
    }

    /// Inverse of [`NamedStroke::up`].
    pub fn down(&mut self) -> &mut Self {
        for e in &mut self.elements {
            if self.slot == Slot::Vowel {
                e.placement.translate(0.0, VOWEL_STEP);
                continue;
            }
            match e.segment {
                Segment::Hang => {
                    e.placement.translate(0.0, CONSONANT_STEP);
                    e.segment = Segment::Stand;
                }
                Segment::Head => {
                    e.placement.translate(0.0, HEAD_FOOT_SHIFT);
                    e.segment = Segment::Foot;
                }
                _ => {}
            }
        }
        self
    }

    /// Vowels move a full cell; a final consonant moves into the initial
    /// position.
    pub fn left(&mut self) -> &mut Self {
        let shift = match self.slot {
            Slot::Vowel => VOWEL_STEP,
            Slot::Final => FINAL_SHIFT,
            Slot::Solo | Slot::Initial => 0.0,
        };
        self.elements.iter_mut().for_each(|e| e.placement.translate(-shift, 0.0));
        if self.slot == Slot::Final {
            self.slot = Slot::Initial;
        }
        self
    }

    /// Vowels move a full cell; an initial consonant moves into the final
    /// position.
    pub fn right(&mut self) -> &mut Self {
        let shift = match self.slot {
            Slot::Vowel => VOWEL_STEP,
            Slot::Initial => FINAL_SHIFT,
            Slot::Solo | Slot::Final => 0.0,
        };
        self.elements.iter_mut().for_each(|e| e.placement.translate(shift, 0.0));
        if self.slot == Slot::Initial {
            self.slot = Slot::Final;
        }
        self
    }

    pub fn flip_x(&mut self) -> &mut Self {
        self.elements.iter_mut().for_each(|e| e.placement.mirror_x());
        self
    }

    pub fn flip_y(&mut self) -> &mut Self {
        self.elements.iter_mut().for_each(|e| e.placement.mirror_y());
        self
    }

    /// Strokes can only be joined within the same slot.
    pub fn matches(&self, other: &NamedStroke) -> bool {
        self.slot == other.slot
    }

    /// A new stroke holding copies of both element lists.
    pub fn joined(name: &str, a: &NamedStroke, b: &NamedStroke) -> NamedStroke {
        let mut elements = a.elements.clone();
        elements.extend(b.elements.iter().cloned());
        NamedStroke { name: name.to_string(), slot: a.slot, elements }
    }

    pub fn to_cluster(&self) -> Cluster {
        let strokes = self
            .elements
            .iter()
            .map(|e| Stroke { slot: self.slot, geometry: e.geometry.clone(), placement: e.placement })
            .collect();
        Cluster::new(self.slot, strokes)
    }
}

/// Chained bulk operations over found strokes, e.g.
/// `pool.find("1", &filters).up().renamed("2")`.
pub trait StrokeOps: Sized {
    fn up(self) -> Self;
    fn down(self) -> Self;
    fn left(self) -> Self;
    fn right(self) -> Self;
    fn flip_x(self) -> Self;
    fn flip_y(self) -> Self;
    fn renamed(self, name: &str) -> Self;
}

impl StrokeOps for Vec<NamedStroke> {
    fn up(mut self) -> Self {
        self.iter_mut().for_each(|s| {
            s.up();
        });
        self
    }

    fn down(mut self) -> Self {
        self.iter_mut().for_each(|s| {
            s.down();
        });
        self
    }

    fn left(mut self) -> Self {
        self.iter_mut().for_each(|s| {
            s.left();
        });
        self
    }

    fn right(mut self) -> Self {
        self.iter_mut().for_each(|s| {
            s.right();
        });
        self
    }

    fn flip_x(mut self) -> Self {
        self.iter_mut().for_each(|s| {
            s.flip_x();
        });
        self
    }

    fn flip_y(mut self) -> Self {
        self.iter_mut().for_each(|s| {
            s.flip_y();
        });
        self
    }

    fn renamed(mut self, name: &str) -> Self {
        self.iter_mut().for_each(|s| s.name = name.to_string());
        self
    }
}

/// Predicate applied by [`StrokePool::find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// The stroke's slot is one of the set.
    InSlots(SlotSet),
    /// Every element of the stroke has exactly this segment.
    OnlyInSegment(Segment),
}

impl Filter {
    pub fn accepts(&self, stroke: &NamedStroke) -> bool {
        match self {
            Filter::InSlots(slots) => slots.contains(SlotSet::of(stroke.slot)),
            Filter::OnlyInSegment(segment) => stroke.segments() == segment.bit(),
        }
    }
}

/// Join slices pairwise, left to right, under `name`.
///
/// For each pair every left stroke is matched against the right slice and
/// joined with the first stroke of the same slot; unmatched left strokes are
/// dropped. With a single slice nothing is joined and it comes back as is.
pub fn join(name: &str, slices: Vec<Vec<NamedStroke>>) -> Vec<NamedStroke> {
    let mut iter = slices.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };
    iter.fold(first, |acc, next| join_two(name, &acc, &next))
}

fn join_two(name: &str, a: &[NamedStroke], b: &[NamedStroke]) -> Vec<NamedStroke> {
    a.iter()
        .filter_map(|outer| {
            b.iter().find(|inner| outer.matches(inner)).map(|inner| NamedStroke::joined(name, outer, inner))
        })
        .collect()
}

/// The working set of strokes a pipeline reads from and appends to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokePool {
    strokes: Vec<NamedStroke>,
}

impl StrokePool {
    pub fn new(strokes: Vec<NamedStroke>) -> Self {
        StrokePool { strokes }
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedStroke> {
        self.strokes.iter()
    }

    pub fn extend(&mut self, strokes: impl IntoIterator<Item = NamedStroke>) {
        self.strokes.extend(strokes);
    }

    /// Copies of every stroke named exactly `name` that passes all filters.
    pub fn find(&self, name: &str, filters: &[Filter]) -> Vec<NamedStroke> {
        self.strokes.iter().filter(|s| s.name == name && filters.iter().all(|f| f.accepts(s))).cloned().collect()
    }

    /// Clusters of one slot keyed by stroke name. The first stroke with a
    /// given name wins.
    pub fn clusters(&self, slot: Slot) -> ClusterMap {
        self.strokes.iter().filter(|s| s.slot == slot).map(|s| (s.name.clone(), s.to_cluster())).collect()
    }
}

/// A named pipeline step producing new strokes from the current pool.
#[derive(Debug, Clone, Copy)]
pub struct Stage {
    pub name: &'static str,
    pub build: fn(&StrokePool) -> Vec<NamedStroke>,
}

/// What one stage added to the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageMetrics {
    pub name: &'static str,
    pub produced: usize,
    pub duration: Duration,
}

/// Runs a fixed sequence of stages over a pool.
#[derive(Debug, Clone)]
pub struct Combinator {
    stages: Vec<Stage>,
}

impl Default for Combinator {
    /// Simple vowels, combined vowels, then consonant heads and feet.
    fn default() -> Self {
        Combinator { stages: vec![SIMPLE_VOWELS, COMPLEX_VOWELS, CONSONANT_HEADS_AND_FEET] }
    }
}

impl Combinator {
    pub fn new(stages: Vec<Stage>) -> Self {
        Combinator { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn run(&self, pool: StrokePool) -> StrokePool {
        self.run_with_metrics(pool).0
    }

    /// Run every stage in order, appending its output to the pool.
    pub fn run_with_metrics(&self, mut pool: StrokePool) -> (StrokePool, Vec<StageMetrics>) {
        let mut metrics = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            let start = Instant::now();
            let produced = (stage.build)(&pool);
            let count = produced.len();
            pool.extend(produced);
            trace!("[join:stage] name={} produced={} pool={}", stage.name, count, pool.len());
            metrics.push(StageMetrics { name: stage.name, produced: count, duration: start.elapsed() });
        }
        (pool, metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consonant(name: &str, segment: Segment) -> NamedStroke {
        NamedStroke::new(name, Slot::Initial, segment, name)
    }

    #[test]
    fn up_and_down_transition_consonant_segments() {
        let mut stand = consonant("2", Segment::Stand);
        stand.up();
        assert_eq!(stand.elements[0].segment, Segment::Hang);
        assert_eq!(stand.elements[0].placement.dy, -140.0);
        stand.down();
        assert_eq!(stand.elements[0].segment, Segment::Stand);
        assert!(stand.elements[0].placement.is_identity());

        let mut foot = consonant("8", Segment::Foot);
        foot.up();
        assert_eq!((foot.elements[0].segment, foot.elements[0].placement.dy), (Segment::Head, -620.0));

        let mut core = consonant("2", Segment::Core);
        core.up();
        assert_eq!(core.elements[0].segment, Segment::Core);
        assert!(core.elements[0].placement.is_identity());
    }

    #[test]
    fn vowels_move_a_full_cell() {
        let mut v = NamedStroke::new("0", Slot::Vowel, Segment::Border, "v0");
        v.right().down();
        assert_eq!((v.elements[0].placement.dx, v.elements[0].placement.dy), (880.0, 880.0));
        assert_eq!(v.elements[0].segment, Segment::Border);
    }

    #[test]
    fn horizontal_moves_switch_consonant_position() {
        let mut s = consonant("3", Segment::Tall);
        s.right();
        assert_eq!((s.slot, s.elements[0].placement.dx), (Slot::Final, 390.0));
        s.left();
        assert_eq!((s.slot, s.elements[0].placement.dx), (Slot::Initial, 0.0));
    }

    #[test]
    fn find_applies_every_filter() {
        let mut hs = consonant("2", Segment::Head);
        hs.elements.push(Element { segment: Segment::Stand, geometry: "x".into(), placement: Placement::default() });
        let pool = StrokePool::new(vec![
            consonant("2", Segment::Stand),
            NamedStroke::new("2", Slot::Vowel, Segment::Border, "v2"),
            hs,
            consonant("3", Segment::Stand),
        ]);

        assert_eq!(pool.find("2", &[]).len(), 3);
        assert_eq!(pool.find("2", &[Filter::InSlots(SlotSet::CONSONANT)]).len(), 2);
        let only_stand = pool.find("2", &[Filter::InSlots(SlotSet::CONSONANT), Filter::OnlyInSegment(Segment::Stand)]);
        assert_eq!(only_stand, vec![consonant("2", Segment::Stand)]);
    }

    #[test]
    fn join_pairs_by_slot_and_first_match_wins() {
        let left = vec![consonant("0", Segment::Head), NamedStroke::new("0", Slot::Vowel, Segment::Border, "v0")];
        let right = vec![consonant("2", Segment::Stand), consonant("3", Segment::Stand)];

        let joined = join("02", vec![left, right]);
        assert_eq!(joined.len(), 1, "the vowel has no partner: {:?}", joined);
        assert_eq!(joined[0].name, "02");
        assert_eq!(joined[0].slot, Slot::Initial);
        let paths: Vec<&str> = joined[0].elements.iter().map(|e| e.geometry.as_str()).collect();
        assert_eq!(paths, vec!["0", "2"]);
    }

    #[test]
    fn join_of_nothing_is_empty() {
        assert!(join("x", Vec::new()).is_empty());
        assert!(join("x", vec![vec![consonant("0", Segment::Head)], Vec::new()]).is_empty());
    }

    #[test]
    fn pool_clusters_keep_first_stroke_per_name() {
        let pool = StrokePool::new(vec![consonant("2", Segment::Stand), consonant("2", Segment::Core)]);
        let clusters = pool.clusters(Slot::Initial);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters.get("2").unwrap().strokes.len(), 1);
        assert!(pool.clusters(Slot::Vowel).is_empty());
    }
}
