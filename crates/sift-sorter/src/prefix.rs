//! Ready-made prefix orderings and prefix generators.

use std::cmp::Ordering;

use crate::compare::{PrefixComparator, RecordComparator};

/// Orders prefixes as signed 64-bit integers.
#[derive(Clone, Copy, Debug, Default)]
pub struct SignedPrefix;

impl PrefixComparator for SignedPrefix {
    fn compare_prefixes(&self, a: u64, b: u64) -> Ordering {
        (a as i64).cmp(&(b as i64))
    }
}

/// Orders prefixes as unsigned 64-bit integers; the right ordering for
/// prefixes produced by [`bytes_prefix`].
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsignedPrefix;

impl PrefixComparator for UnsignedPrefix {
    fn compare_prefixes(&self, a: u64, b: u64) -> Ordering {
        a.cmp(&b)
    }
}

/// Reverses an inner prefix ordering.
#[derive(Clone, Copy, Debug, Default)]
pub struct Descending<C>(pub C);

impl<C: PrefixComparator> PrefixComparator for Descending<C> {
    fn compare_prefixes(&self, a: u64, b: u64) -> Ordering {
        self.0.compare_prefixes(b, a)
    }
}

/// First eight bytes of `bytes`, big-endian, zero-padded on the right.
/// Under [`UnsignedPrefix`], two such prefixes only ever disagree with
/// lexicographic byte order when they are equal, so the record comparator
/// sees exactly the keys that collide in their first eight bytes.
pub fn bytes_prefix(bytes: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    let taken = bytes.len().min(8);
    word[..taken].copy_from_slice(&bytes[..taken]);
    u64::from_be_bytes(word)
}

/// Plain lexicographic payload order; the natural partner of
/// [`bytes_prefix`] + [`UnsignedPrefix`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LexicographicRecordComparator;

impl RecordComparator for LexicographicRecordComparator {
    fn compare_records(&self, left: &[u8], right: &[u8]) -> Ordering {
        left.cmp(right)
    }
}

#[cfg(test)]
mod tests {
    use super::{bytes_prefix, Descending, SignedPrefix, UnsignedPrefix};
    use crate::compare::PrefixComparator;
    use std::cmp::Ordering;

    #[test]
    fn signed_ordering_handles_negatives() {
        let minus_one = -1i64 as u64;
        assert_eq!(
            SignedPrefix.compare_prefixes(minus_one, 1),
            Ordering::Less
        );
        assert_eq!(
            UnsignedPrefix.compare_prefixes(minus_one, 1),
            Ordering::Greater
        );
    }

    #[test]
    fn descending_reverses_inner_order() {
        assert_eq!(
            Descending(UnsignedPrefix).compare_prefixes(1, 2),
            Ordering::Greater
        );
        assert_eq!(
            Descending(UnsignedPrefix).compare_prefixes(2, 2),
            Ordering::Equal
        );
    }

    #[test]
    fn bytes_prefix_agrees_with_lexicographic_order_when_distinct() {
        let cases: &[(&[u8], &[u8])] = &[
            (b"a", b"ab"),
            (b"abc", b"abd"),
            (b"", b"a"),
            (b"zzzzzzzzz", b"zzzzzzzzzz"),
            (&[0x00], &[0xFF]),
        ];
        for (left, right) in cases {
            let (lp, rp) = (bytes_prefix(left), bytes_prefix(right));
            if lp != rp {
                assert_eq!(lp.cmp(&rp), left.cmp(right), "{left:?} vs {right:?}");
            } else {
                // Colliding prefixes mean the first eight bytes matched.
                let shared = left.len().min(right.len()).min(8);
                assert_eq!(left[..shared], right[..shared]);
            }
        }
    }
}
