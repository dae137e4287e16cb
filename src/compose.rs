//! Syllable composition.
//!
//! A syllable like `TPHROE` is split into its initial, vowel and final parts
//! and each part is looked up in the completed [`FontTable`]. Without a final
//! the initial cluster comes from the solo table, since it owns the whole
//! width of the glyph.

use crate::engine::FontTable;
use crate::error::ComposeError;
use crate::{Cluster, SizeClass, Slot, Stroke};

const INITIAL_CHARS: &str = "SKTWPRH*";
const VOWEL_CHARS: &str = "AOEU";
const FINAL_CHARS: &str = "RFBPGLSTZD";

/// Split a syllable into `(initial, vowel, final)`.
///
/// The vowel part runs from the first to the last vowel symbol, so anything
/// between two vowels belongs to it. Without a vowel the whole syllable is
/// the initial part.
///
/// ```
/// use silabex::split_syllable;
///
/// assert_eq!(split_syllable("TAOEUPB"), ("T", "AOEU", "PB"));
/// assert_eq!(split_syllable("KT"), ("KT", "", ""));
/// ```
pub fn split_syllable(syllable: &str) -> (&str, &str, &str) {
    let is_vowel = |c: char| VOWEL_CHARS.contains(c);
    let Some(start) = syllable.find(is_vowel) else {
        return (syllable, "", "");
    };
    // Vowel symbols are ASCII, so the last match ends one byte later.
    let end = syllable.rfind(is_vowel).map_or(start, |i| i + 1);
    (&syllable[..start], &syllable[start..end], &syllable[end..])
}

/// One composed syllable.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub name: String,
    pub initial: Option<Cluster>,
    pub vowel: Option<Cluster>,
    pub final_: Option<Cluster>,
}

impl Glyph {
    /// Every stroke of the glyph, initial first.
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        [&self.initial, &self.vowel, &self.final_].into_iter().flatten().flat_map(|c| c.strokes.iter())
    }
}

fn check(part: Slot, cluster: &str, allowed: &str, syllable: &str) -> Result<(), ComposeError> {
    if cluster.chars().all(|c| allowed.contains(c)) {
        return Ok(());
    }
    Err(ComposeError::InvalidCluster { part, cluster: cluster.to_string(), syllable: syllable.to_string() })
}

impl FontTable {
    /// Compose every `/`-separated syllable of `word` into a [`Glyph`].
    pub fn compose(&self, word: &str) -> Result<Vec<Glyph>, ComposeError> {
        word.split('/').filter(|s| !s.is_empty()).map(|syllable| self.compose_syllable(syllable)).collect()
    }

    fn compose_syllable(&self, syllable: &str) -> Result<Glyph, ComposeError> {
        let (initial, vowel, final_) = split_syllable(syllable);
        check(Slot::Initial, initial, INITIAL_CHARS, syllable)?;
        check(Slot::Vowel, vowel, VOWEL_CHARS, syllable)?;
        check(Slot::Final, final_, FINAL_CHARS, syllable)?;

        let initial_slot = if final_.is_empty() { Slot::Solo } else { Slot::Initial };
        Ok(Glyph {
            name: syllable.to_string(),
            initial: self.part(initial_slot, initial, syllable)?,
            vowel: self.part(Slot::Vowel, vowel, syllable)?,
            final_: self.part(Slot::Final, final_, syllable)?,
        })
    }

    fn part(&self, slot: Slot, name: &str, syllable: &str) -> Result<Option<Cluster>, ComposeError> {
        if name.is_empty() {
            return Ok(None);
        }
        match self.cluster(slot, SizeClass::Full, name) {
            Some(cluster) => Ok(Some(cluster.clone())),
            None => Err(ComposeError::MissingCluster {
                part: slot,
                cluster: name.to_string(),
                syllable: syllable.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ClusterMap, SizedClusters};
    use crate::Geometry;

    #[test]
    fn split_matches_known_syllables() {
        let cases = vec![
            ("TAOEUPB", ("T", "AOEU", "PB")),
            ("OULT", ("", "OU", "LT")),
            ("KT", ("KT", "", "")),
            ("TPHROE", ("TPHR", "OE", "")),
            ("TO", ("T", "O", "")),
            ("", ("", "", "")),
        ];
        for (input, want) in cases {
            assert_eq!(split_syllable(input), want, "split of {input:?}");
        }
    }

    fn map(slot: Slot, names: &[&str]) -> ClusterMap {
        names.iter().map(|n| (n.to_string(), Cluster::single(slot, Geometry::new(format!("{slot}/{n}"))))).collect()
    }

    fn table() -> FontTable {
        FontTable {
            vowel: map(Slot::Vowel, &["O", "AOEU"]),
            solo: SizedClusters::new().with(SizeClass::Full, map(Slot::Solo, &["T", "KT"])),
            initial: SizedClusters::new().with(SizeClass::Full, map(Slot::Initial, &["T"])),
            final_: SizedClusters::new().with(SizeClass::Full, map(Slot::Final, &["PB"])),
        }
    }

    #[test]
    fn open_syllables_use_the_solo_initial() {
        let glyphs = table().compose("TO/KT").unwrap();
        assert_eq!(glyphs.len(), 2);

        let paths: Vec<&str> = glyphs[0].strokes().map(|s| s.geometry.as_str()).collect();
        assert_eq!(paths, vec!["solo/T", "vowel/O"]);
        assert!(glyphs[1].vowel.is_none());
        assert_eq!(glyphs[1].initial.as_ref().unwrap().slot, Slot::Solo);
    }

    #[test]
    fn closed_syllables_use_initial_and_final() {
        let glyphs = table().compose("TAOEUPB").unwrap();
        let paths: Vec<&str> = glyphs[0].strokes().map(|s| s.geometry.as_str()).collect();
        assert_eq!(paths, vec!["initial/T", "vowel/AOEU", "final/PB"]);
    }

    #[test]
    fn bad_syllables_are_rejected() {
        let t = table();
        assert_eq!(
            t.compose("XO"),
            Err(ComposeError::InvalidCluster { part: Slot::Initial, cluster: "X".into(), syllable: "XO".into() })
        );
        assert_eq!(
            t.compose("TO/TE"),
            Err(ComposeError::MissingCluster { part: Slot::Vowel, cluster: "E".into(), syllable: "TE".into() })
        );
        assert_eq!(
            t.compose("KTOPB"),
            Err(ComposeError::MissingCluster { part: Slot::Initial, cluster: "KT".into(), syllable: "KTOPB".into() })
        );
    }
}
