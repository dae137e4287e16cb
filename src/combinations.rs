//! Ordered powerset enumeration.
//!
//! The emission order is fixed and other stages depend on it:
//!
//! ```text
//! combos([])          = []
//! combos([car] + cdr) = [[car]] ++ concat([c, c + [car]] for c in combos(cdr))
//! ```
//!
//! with every subset re-sorted by position in a canonical sequence. For
//! `["0", "1", "2", "3"]` that yields
//! `0 1 01 2 02 12 012 3 03 13 013 23 023 123 0123`.

/// Every non-empty subset of `names`, each subset ordered by position in
/// `canonical`. Members missing from `canonical` sort after every member
/// that is present, keeping their relative order.
pub fn subsets<'a, S: AsRef<str>>(names: &'a [S], canonical: &[S]) -> Vec<Vec<&'a str>> {
    let rank = |name: &str| canonical.iter().position(|c| c.as_ref() == name).unwrap_or(usize::MAX);

    let mut out: Vec<Vec<&'a str>> = Vec::new();
    // Build from the tail: `out` always holds combos(names[i + 1..]).
    for car in names.iter().rev().map(AsRef::as_ref) {
        let inner = std::mem::take(&mut out);
        out.reserve(inner.len() * 2 + 1);
        out.push(vec![car]);
        for combo in inner {
            let mut with_car = combo.clone();
            with_car.push(car);
            with_car.sort_by_key(|n| rank(n));
            out.push(combo);
            out.push(with_car);
        }
    }
    out
}

/// [`subsets`] joined into names, ordered by an explicit canonical sequence.
pub fn combinations_ordered<S: AsRef<str>>(names: &[S], canonical: &[S]) -> Vec<String> {
    subsets(names, canonical).into_iter().map(|subset| subset.concat()).collect()
}

/// Every non-empty combination of `names`, in canonical emission order.
///
/// ```
/// use silabex::combinations;
///
/// assert_eq!(combinations(&["A", "B"]), vec!["A", "B", "AB"]);
/// ```
pub fn combinations<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    combinations_ordered(names, names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_order() {
        let cases: Vec<(Vec<&str>, Vec<&str>)> = vec![
            (
                vec!["0", "1", "2", "3"],
                vec!["0", "1", "01", "2", "02", "12", "012", "3", "03", "13", "013", "23", "023", "123", "0123"],
            ),
            (vec!["AZ", "CD", "BB"], vec!["AZ", "CD", "AZCD", "BB", "AZBB", "CDBB", "AZCDBB"]),
            (vec!["8", "9"], vec!["8", "9", "89"]),
            (vec!["X"], vec!["X"]),
            (vec![], vec![]),
        ];

        for (names, want) in cases {
            assert_eq!(combinations(&names), want, "combinations({:?})", names);
        }
    }

    #[test]
    fn emits_every_subset_once() {
        let names = ["K", "T", "W", "P", "R", "H"];
        let mut got = combinations(&names);
        assert_eq!(got.len(), (1 << names.len()) - 1);
        got.sort();
        got.dedup();
        assert_eq!(got.len(), (1 << names.len()) - 1);
    }

    #[test]
    fn permuted_input_keeps_canonical_member_order() {
        let canonical = ["A", "O", "E", "U"];
        let permuted = ["E", "A", "U", "O"];
        let got = combinations_ordered(&permuted, &canonical);

        assert_eq!(got.len(), 15);
        for name in &got {
            let ranks: Vec<usize> =
                name.chars().map(|c| canonical.iter().position(|s| s.starts_with(c)).unwrap()).collect();
            assert!(ranks.windows(2).all(|w| w[0] < w[1]), "{} is not in canonical order", name);
        }

        // Emission order follows the input sequence, members follow the canonical one.
        assert_eq!(&got[..3], &["E", "A", "AE"]);
    }

    #[test]
    fn subsets_keep_multi_symbol_members_whole() {
        let got = subsets(&["AZ", "CD"], &["AZ", "CD"]);
        assert_eq!(got, vec![vec!["AZ"], vec!["CD"], vec!["AZ", "CD"]]);
    }
}
