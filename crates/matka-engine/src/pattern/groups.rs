//! Canonical patti forms and digit-sum groups
//!
//! # Design Principles
//! 1. Canonical sets are generated by rule, never enumerated - the old
//!    system's literal 120/90-entry lists survive only as golden test
//!    fixtures in `tests/golden_pattis.rs`
//! 2. Pana convention: digits ascend left to right with 0 sorting last
//!    ("120" not "012", "100" not "001"), so the leading digit of a
//!    canonical pana is never 0
//! 3. The double-patti zero rule is asymmetric and preserved exactly as the
//!    existing system behaves: a leading 0 is rejected outright, a lone 0
//!    may only trail, and `x00` is the only double form containing the 00
//!    pair. Flagged for product-owner confirmation, do not "fix" it.

use crate::types::PattiSubtype;

use super::classify::patti_subtype;

/// Sort rank of a pana digit: 0 sorts after 9.
fn rank(d: u8) -> u8 {
    if d == 0 {
        10
    } else {
        d
    }
}

/// Whether three digits form a canonical single patti: all distinct,
/// strictly ascending by rank.
fn is_canonical_single(a: u8, b: u8, c: u8) -> bool {
    rank(a) < rank(b) && rank(b) < rank(c)
}

/// Whether three digits form a canonical double patti.
///
/// Closed-form rendering of the literal predicate carried over from the
/// existing system: exactly one repeated pair, never a triple, leading digit
/// nonzero, and ordering such that a leading pair takes a later-ranked third
/// digit while a trailing pair takes an earlier-ranked first digit (`x00`
/// forms being the trailing-pair boundary case).
fn is_canonical_double(a: u8, b: u8, c: u8) -> bool {
    if a == b && b == c {
        return false;
    }
    if a == b {
        a != 0 && (c > a || c == 0)
    } else if b == c {
        a != 0 && (a < b || b == 0)
    } else {
        false
    }
}

/// Whether a 3-digit string is in canonical (bulk-entry) form for its
/// subtype. Triples are trivially canonical.
pub fn is_canonical_patti(pana: &str) -> bool {
    let bytes = pana.as_bytes();
    if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let (a, b, c) = (bytes[0] - b'0', bytes[1] - b'0', bytes[2] - b'0');
    match patti_subtype([a, b, c]) {
        PattiSubtype::Single => is_canonical_single(a, b, c),
        PattiSubtype::Double => is_canonical_double(a, b, c),
        PattiSubtype::Triple => true,
    }
}

/// All canonical pattis of a subtype, in numeric order of the literal string.
///
/// Yields exactly 120 singles, 90 doubles, 10 triples.
pub fn canonical_pattis(subtype: PattiSubtype) -> Vec<String> {
    (0..1000u32)
        .map(|n| format!("{n:03}"))
        .filter(|s| {
            let b = s.as_bytes();
            patti_subtype([b[0] - b'0', b[1] - b'0', b[2] - b'0']) == subtype
                && is_canonical_patti(s)
        })
        .collect()
}

/// The ten digit-sum groups of a subtype's canonical set, indexed by sum key
/// 0..=9.
///
/// Single pattis split 12 per group, doubles 9, triples 1; each group is a
/// disjoint slice of the canonical set, used by bulk-by-sum entry UIs and
/// sangam-by-sum lookups.
pub fn sum_groups(subtype: PattiSubtype) -> [Vec<String>; 10] {
    let mut groups: [Vec<String>; 10] = Default::default();
    for pana in canonical_pattis(subtype) {
        let b = pana.as_bytes();
        let key = ((b[0] - b'0') + (b[1] - b'0') + (b[2] - b'0')) % 10;
        groups[key as usize].push(pana);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_set_sizes() {
        assert_eq!(canonical_pattis(PattiSubtype::Single).len(), 120);
        assert_eq!(canonical_pattis(PattiSubtype::Double).len(), 90);
        assert_eq!(canonical_pattis(PattiSubtype::Triple).len(), 10);
    }

    #[test]
    fn test_single_groups_are_12_each_and_disjoint() {
        let groups = sum_groups(PattiSubtype::Single);
        let mut seen = std::collections::BTreeSet::new();
        for (key, group) in groups.iter().enumerate() {
            assert_eq!(group.len(), 12, "sum group {key}");
            for pana in group {
                assert!(seen.insert(pana.clone()), "{pana} appears twice");
            }
        }
        assert_eq!(seen.len(), 120);
    }

    #[test]
    fn test_double_groups_are_9_each() {
        let groups = sum_groups(PattiSubtype::Double);
        for (key, group) in groups.iter().enumerate() {
            assert_eq!(group.len(), 9, "sum group {key}");
        }
    }

    #[test]
    fn test_triple_groups_are_1_each() {
        let groups = sum_groups(PattiSubtype::Triple);
        for group in &groups {
            assert_eq!(group.len(), 1);
        }
        // "777" sums to 21, key 1
        assert_eq!(groups[1], vec!["777".to_string()]);
    }

    #[test]
    fn test_zero_sorts_last() {
        assert!(is_canonical_patti("120"));
        assert!(!is_canonical_patti("012"));
        assert!(is_canonical_patti("890"));
        assert!(is_canonical_patti("110"));
        assert!(is_canonical_patti("100"));
        assert!(!is_canonical_patti("011"));
        assert!(!is_canonical_patti("001"));
    }

    #[test]
    fn test_double_zero_rule_asymmetry() {
        // Leading 0 never valid, even with the pair elsewhere
        assert!(!is_canonical_patti("022"));
        assert!(!is_canonical_patti("010"));
        // Pair of zeros only as the trailing "x00" boundary forms
        for d in 1..=9u8 {
            assert!(is_canonical_patti(&format!("{d}00")));
        }
        // Leading pair takes a later digit
        assert!(is_canonical_patti("112"));
        assert!(!is_canonical_patti("211"));
        // ...unless the later digit is the trailing zero
        assert!(is_canonical_patti("990"));
        // Trailing pair takes an earlier digit
        assert!(is_canonical_patti("122"));
        assert!(!is_canonical_patti("221"));
    }

    #[test]
    fn test_every_multiset_has_exactly_one_canonical_form() {
        use std::collections::BTreeMap;
        // Key each 3-digit string by its sorted digit multiset and count the
        // canonical representatives per multiset.
        let mut canonical_per_multiset: BTreeMap<[u8; 3], u32> = BTreeMap::new();
        for n in 0..1000u32 {
            let s = format!("{n:03}");
            let b = s.as_bytes();
            let mut key = [b[0] - b'0', b[1] - b'0', b[2] - b'0'];
            key.sort_unstable();
            let entry = canonical_per_multiset.entry(key).or_insert(0);
            if is_canonical_patti(&s) {
                *entry += 1;
            }
        }
        assert_eq!(canonical_per_multiset.len(), 220); // C(12,3) multisets
        for (key, count) in canonical_per_multiset {
            assert_eq!(count, 1, "multiset {key:?}");
        }
    }
}
