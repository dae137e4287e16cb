//! Glyph-source contract and base-table loading.
//!
//! The hand-authored strokes live in an external, tree-shaped document whose
//! nodes are addressed by label paths, e.g. `initial / 2/3 / TP`. The engine
//! never reads that document; it only asks a [`GlyphSource`] for the geometry
//! at a path. [`load_base_table`] walks a [`BaseLayout`] to turn those
//! answers into the base [`FontTable`].

use crate::engine::{ClusterMap, FontTable, SizedClusters};
use crate::error::GlyphError;
use crate::join::{NamedStroke, Segment, StrokePool};
use crate::{Cluster, Geometry, SizeClass, Slot};
use std::collections::HashMap;

/// Anything that can hand out stroke geometry by slot and label path.
pub trait GlyphSource {
    fn lookup(&self, slot: Slot, path: &[&str]) -> Option<Geometry>;
}

/// In-memory glyph source keyed by `(slot, label path)`.
#[derive(Debug, Clone, Default)]
pub struct MemoryGlyphs {
    glyphs: HashMap<(Slot, Vec<String>), Geometry>,
}

impl MemoryGlyphs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, slot: Slot, path: &[&str], geometry: Geometry) {
        self.glyphs.insert((slot, path.iter().map(|s| s.to_string()).collect()), geometry);
    }

    pub fn with(mut self, slot: Slot, path: &[&str], geometry: impl Into<Geometry>) -> Self {
        self.insert(slot, path, geometry.into());
        self
    }

    /// A source answering every path `layout` asks for with a placeholder
    /// geometry naming that path. Useful to dry-run a derivation.
    pub fn placeholder(layout: &BaseLayout) -> Self {
        let mut glyphs = MemoryGlyphs::new();
        for (slot, group) in layout.groups() {
            for size in &group.sizes {
                for name in &size.names {
                    let path = layout.path(group, size, name);
                    let refs: Vec<&str> = path.iter().map(String::as_str).collect();
                    glyphs.insert(slot, &refs, Geometry::new(path.join("/")));
                }
            }
        }
        glyphs
    }

    /// Like [`MemoryGlyphs::placeholder`], for every stroke a
    /// [`StrokeLayout`] asks for.
    pub fn placeholder_strokes(layout: &StrokeLayout) -> Self {
        let mut glyphs = MemoryGlyphs::new();
        for group in &layout.groups {
            for segment in &group.segments {
                for name in &segment.names {
                    let path = layout.path(group, segment, name);
                    let refs: Vec<&str> = path.iter().map(String::as_str).collect();
                    glyphs.insert(group.slot, &refs, Geometry::new(path.join("/")));
                }
            }
        }
        glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl GlyphSource for MemoryGlyphs {
    fn lookup(&self, slot: Slot, path: &[&str]) -> Option<Geometry> {
        let key = (slot, path.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        self.glyphs.get(&key).cloned()
    }
}

/// One size class of a group: an optional label under the group and the base
/// names hand-authored for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeLayout {
    pub size: SizeClass,
    pub label: Option<String>,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLayout {
    pub label: String,
    pub sizes: Vec<SizeLayout>,
}

/// Where base clusters live in the glyph source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseLayout {
    /// Labels leading to the node that holds every group.
    pub root: Vec<String>,
    pub vowel: GroupLayout,
    pub solo: GroupLayout,
    pub initial: GroupLayout,
    pub final_: GroupLayout,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Consonant groups share one shape: full (plus the stand-alone markers),
/// two-thirds and half.
fn consonant_group(label: &str) -> GroupLayout {
    const CLUSTERS: &[&str] = &[
        "T", "W", "P", "TP", "TH", "TR", "TW", "KT", "RH", "WH", "TWP", "TPH", "TPR", "TWH", "KTW", "KTH", "TWPH",
        "KTWPH", "TWPRH", "KTWPRH",
    ];
    let mut full = owned(CLUSTERS);
    full.extend(owned(&["NULL", "S", "*"]));

    GroupLayout {
        label: label.to_string(),
        sizes: vec![
            SizeLayout { size: SizeClass::Full, label: Some("full".into()), names: full },
            SizeLayout { size: SizeClass::TwoThirds, label: Some("2/3".into()), names: owned(CLUSTERS) },
            SizeLayout { size: SizeClass::Half, label: Some("1/2".into()), names: owned(CLUSTERS) },
        ],
    }
}

impl Default for BaseLayout {
    fn default() -> Self {
        BaseLayout {
            root: Vec::new(),
            vowel: GroupLayout {
                label: "vowel".into(),
                sizes: vec![SizeLayout {
                    size: SizeClass::Full,
                    label: None,
                    names: owned(&["A", "AO", "E", "EU", "AOEU"]),
                }],
            },
            solo: consonant_group("solo"),
            initial: consonant_group("initial"),
            final_: GroupLayout {
                label: "final".into(),
                sizes: vec![SizeLayout {
                    size: SizeClass::Full,
                    label: Some("full".into()),
                    names: owned(&["R", "F"]),
                }],
            },
        }
    }
}

impl BaseLayout {
    pub fn groups(&self) -> [(Slot, &GroupLayout); 4] {
        [
            (Slot::Vowel, &self.vowel),
            (Slot::Solo, &self.solo),
            (Slot::Initial, &self.initial),
            (Slot::Final, &self.final_),
        ]
    }

    /// Full label path of `name` inside `group` at `size`.
    pub fn path(&self, group: &GroupLayout, size: &SizeLayout, name: &str) -> Vec<String> {
        let mut path = self.root.clone();
        path.push(group.label.clone());
        path.extend(size.label.clone());
        path.push(name.to_string());
        path
    }
}

/// Pull every base cluster named by `layout` out of `source`.
///
/// Each base cluster is a single stroke at the identity placement.
pub fn load_base_table(source: &impl GlyphSource, layout: &BaseLayout) -> Result<FontTable, GlyphError> {
    let mut table = FontTable::default();

    for (slot, group) in layout.groups() {
        let mut sized = SizedClusters::new();
        for size in &group.sizes {
            let mut clusters = ClusterMap::new();
            for name in &size.names {
                let path = layout.path(group, size, name);
                let refs: Vec<&str> = path.iter().map(String::as_str).collect();
                let geometry =
                    source.lookup(slot, &refs).ok_or_else(|| GlyphError::MissingGlyph { slot, path: path.clone() })?;
                clusters.insert_if_absent(name.clone(), Cluster::single(slot, geometry));
            }
            trace!("[glyphs:load] {} {} clusters={}", size.size, slot, clusters.len());
            sized = sized.with(size.size, clusters);
        }

        match slot {
            Slot::Vowel => table.vowel = sized.full().cloned().unwrap_or_default(),
            Slot::Solo => table.solo = sized,
            Slot::Initial => table.initial = sized,
            Slot::Final => table.final_ = sized,
        }
    }

    Ok(table)
}

/// Strokes of one role inside a stroke group, e.g. every `stand` under
/// `initial`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentLayout {
    pub segment: Segment,
    /// Label under the group; `None` when strokes sit directly in it.
    pub label: Option<String>,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrokeGroupLayout {
    pub slot: Slot,
    pub label: String,
    pub segments: Vec<SegmentLayout>,
}

/// Where the role-tagged base strokes of the join pipeline live in the glyph
/// source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrokeLayout {
    pub root: Vec<String>,
    pub groups: Vec<StrokeGroupLayout>,
}

fn segment(segment: Segment, names: &[&str]) -> SegmentLayout {
    SegmentLayout { segment, label: Some(segment.label().to_string()), names: owned(names) }
}

/// Consonant stroke groups hold tall, stand and core strokes at positions
/// 2 to 7, heads at 0 and 1 and feet at 8 and 9.
fn consonant_strokes(slot: Slot, label: &str) -> StrokeGroupLayout {
    const STANDS: &[&str] = &["2", "3", "4", "5", "6", "7"];
    StrokeGroupLayout {
        slot,
        label: label.to_string(),
        segments: vec![
            segment(Segment::Tall, STANDS),
            segment(Segment::Stand, STANDS),
            segment(Segment::Core, STANDS),
            segment(Segment::Head, &["0", "1"]),
            segment(Segment::Foot, &["8", "9"]),
        ],
    }
}

impl Default for StrokeLayout {
    /// Vowel corners 0 and 1 (the rest are derived) plus the initial and
    /// solo consonant strokes.
    fn default() -> Self {
        StrokeLayout {
            root: Vec::new(),
            groups: vec![
                StrokeGroupLayout {
                    slot: Slot::Vowel,
                    label: "vowels".into(),
                    segments: vec![SegmentLayout { segment: Segment::Border, label: None, names: owned(&["0", "1"]) }],
                },
                consonant_strokes(Slot::Initial, "initial"),
                consonant_strokes(Slot::Solo, "solos"),
            ],
        }
    }
}

impl StrokeLayout {
    pub fn path(&self, group: &StrokeGroupLayout, segment: &SegmentLayout, name: &str) -> Vec<String> {
        let mut path = self.root.clone();
        path.push(group.label.clone());
        path.extend(segment.label.clone());
        path.push(name.to_string());
        path
    }
}

/// Pull every role-tagged stroke named by `layout` out of `source`, ready to
/// feed a [`Combinator`](crate::Combinator).
pub fn load_stroke_pool(source: &impl GlyphSource, layout: &StrokeLayout) -> Result<StrokePool, GlyphError> {
    let mut strokes = Vec::new();
    for group in &layout.groups {
        for seg in &group.segments {
            for name in &seg.names {
                let path = layout.path(group, seg, name);
                let refs: Vec<&str> = path.iter().map(String::as_str).collect();
                let geometry = source
                    .lookup(group.slot, &refs)
                    .ok_or_else(|| GlyphError::MissingGlyph { slot: group.slot, path: path.clone() })?;
                strokes.push(NamedStroke::new(name.clone(), group.slot, seg.segment, geometry));
            }
            trace!("[glyphs:load] {} {} strokes={}", group.slot, seg.segment.label(), seg.names.len());
        }
    }
    Ok(StrokePool::new(strokes))
}
