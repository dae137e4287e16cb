//! Built-in pipeline stages.
//!
//! Stroke names here are positions, not letters: vowels use the four corner
//! positions `0`..`3`, consonants use heads `0 1`, stands `2`..`7` and feet
//! `8 9`. A combined name is the concatenation of its members in position
//! order, so `"03"` is the vowel stroke made of corners 0 and 3.

use super::{Filter, NamedStroke, Segment, SlotSet, Stage, StrokeOps, StrokePool, join};
use crate::combinations::{combinations, subsets};

const VOWEL_POSITIONS: &[&str] = &["0", "1", "2", "3"];
const HEADS: &[&str] = &["0", "1"];
const STANDS: &[&str] = &["2", "3", "4", "5", "6", "7"];
const FEET: &[&str] = &["8", "9"];

const VOWELS: Filter = Filter::InSlots(SlotSet::VOWEL);
const CONSONANTS: Filter = Filter::InSlots(SlotSet::CONSONANT);

/// Corner 2 is corner 1 moved up; corner 3 is corner 0 moved right.
pub const SIMPLE_VOWELS: Stage = Stage { name: "simple-vowels", build: simple_vowels };

/// Every combination of two or more vowel corners.
pub const COMPLEX_VOWELS: Stage = Stage { name: "complex-vowels", build: complex_vowels };

/// Head, foot and head-plus-foot variants of every stand combination.
pub const CONSONANT_HEADS_AND_FEET: Stage =
    Stage { name: "consonant-heads-and-feet", build: consonant_heads_and_feet };

/// Optional: tall stroke 3 reflected into positions 2, 7 and 6.
pub const MIRRORED_INITIALS: Stage = Stage { name: "mirrored-initials", build: mirrored_initials };

fn simple_vowels(pool: &StrokePool) -> Vec<NamedStroke> {
    let mut out = pool.find("1", &[VOWELS]).up().renamed("2");
    out.extend(pool.find("0", &[VOWELS]).right().renamed("3"));
    out
}

fn complex_vowels(pool: &StrokePool) -> Vec<NamedStroke> {
    subsets(VOWEL_POSITIONS, VOWEL_POSITIONS)
        .into_iter()
        .filter(|members| members.len() >= 2)
        .flat_map(|members| {
            let name = members.concat();
            let slices = members.iter().map(|m| pool.find(m, &[VOWELS])).collect();
            join(&name, slices)
        })
        .collect()
}

fn consonant_heads_and_feet(pool: &StrokePool) -> Vec<NamedStroke> {
    let stands = combinations(STANDS);
    let heads = combinations(HEADS);
    let feet = combinations(FEET);

    let find = |name: &str, segment: Segment| pool.find(name, &[CONSONANTS, Filter::OnlyInSegment(segment)]);

    let mut out = Vec::new();
    for stand in &stands {
        for head in &heads {
            let name = format!("{head}{stand}");
            out.extend(join(&name, vec![find(head, Segment::Head), find(stand, Segment::Stand)]));
        }
        for foot in &feet {
            let name = format!("{stand}{foot}");
            out.extend(join(&name, vec![find(stand, Segment::Stand).up(), find(foot, Segment::Foot)]));
        }
        for head in &heads {
            for foot in &feet {
                let name = format!("{head}{stand}{foot}");
                let slices = vec![find(head, Segment::Head), find(stand, Segment::Core), find(foot, Segment::Foot)];
                out.extend(join(&name, slices));
            }
        }
    }
    out
}

fn mirrored_initials(pool: &StrokePool) -> Vec<NamedStroke> {
    let tall = || pool.find("3", &[CONSONANTS]);
    let mut out = tall().flip_x().renamed("2");
    out.extend(tall().flip_y().renamed("7"));
    out.extend(tall().flip_x().flip_y().renamed("6"));
    out
}
