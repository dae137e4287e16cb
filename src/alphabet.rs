//! Fixed symbol orders per slot and cluster-name validation.

use crate::Slot;
use crate::error::AlphabetViolation;

/// An ordered, duplicate-free run of symbols for one slot.
///
/// The position of a symbol in the run is its canonical rank: cluster names
/// must list their symbols in non-decreasing rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet {
    slot: Slot,
    symbols: &'static str,
}

impl Alphabet {
    pub const VOWEL: Alphabet = Alphabet { slot: Slot::Vowel, symbols: "AOEU" };
    pub const INITIAL: Alphabet = Alphabet { slot: Slot::Initial, symbols: "KTWPRH" };
    pub const FINAL: Alphabet = Alphabet { slot: Slot::Final, symbols: "BPGLST" };

    pub const fn new(slot: Slot, symbols: &'static str) -> Self {
        Alphabet { slot, symbols }
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn symbols(&self) -> &'static str {
        self.symbols
    }

    /// Canonical rank of `symbol`, if it belongs to this alphabet.
    pub fn rank(&self, symbol: char) -> Option<usize> {
        self.symbols.chars().position(|c| c == symbol)
    }

    /// Check that every symbol of `name` belongs to the alphabet and that
    /// ranks never decrease. Repeats are accepted.
    pub fn validate(&self, name: &str) -> Result<(), AlphabetViolation> {
        let mut last = 0;
        for (at, symbol) in name.char_indices() {
            let Some(rank) = self.rank(symbol) else {
                return Err(AlphabetViolation::UnknownSymbol {
                    slot: self.slot,
                    symbol,
                    highlighted: highlight(name, at, symbol),
                });
            };
            if rank < last {
                return Err(AlphabetViolation::OutOfOrder {
                    slot: self.slot,
                    symbol,
                    highlighted: highlight(name, at, symbol),
                    order: self.symbols,
                });
            }
            last = rank;
        }
        Ok(())
    }

    /// Every symbol as a one-character name, in canonical order.
    pub fn names(&self) -> Vec<String> {
        self.symbols.chars().map(String::from).collect()
    }
}

/// Bracket the offending symbol, e.g. `T[X]P`.
fn highlight(name: &str, at: usize, symbol: char) -> String {
    let end = at + symbol.len_utf8();
    format!("{}[{}]{}", &name[..at], symbol, &name[end..])
}

/// The alphabet used for each section of a derivation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabets {
    pub vowel: Alphabet,
    pub initial: Alphabet,
    pub final_: Alphabet,
}

impl Default for Alphabets {
    fn default() -> Self {
        Alphabets { vowel: Alphabet::VOWEL, initial: Alphabet::INITIAL, final_: Alphabet::FINAL }
    }
}

impl Alphabets {
    /// Alphabet for a slot. Solo clusters share the initial alphabet.
    pub fn for_slot(&self, slot: Slot) -> &Alphabet {
        match slot {
            Slot::Vowel => &self.vowel,
            Slot::Solo | Slot::Initial => &self.initial,
            Slot::Final => &self.final_,
        }
    }
}
