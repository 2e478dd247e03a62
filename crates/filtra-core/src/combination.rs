//! Lazy cartesian products over small operand groups.

use derive_more::Deref;
use std::{cmp::Ordering, fmt};

///
/// Combinations
///
/// Odometer over an ordered list of groups. Each pick holds one element per
/// group, in group order; the last group varies fastest. The iterator is
/// single-pass.
///
/// An empty group yields no picks. Zero groups yield one empty pick.
///

#[derive(Clone, Debug)]
pub struct Combinations<'a, T> {
    groups: &'a [Vec<T>],
    cursor: Vec<usize>,
    remaining: usize,
}

impl<'a, T: Clone> Combinations<'a, T> {
    #[must_use]
    pub fn new(groups: &'a [Vec<T>]) -> Self {
        Self {
            groups,
            cursor: vec![0; groups.len()],
            remaining: Self::product(groups),
        }
    }

    /// Number of picks the full product contains (saturating).
    #[must_use]
    pub fn total(&self) -> usize {
        Self::product(self.groups)
    }

    /// Group sizes as a multiset, for diagnostics.
    #[must_use]
    pub fn shape(&self) -> Combo {
        Combo::new(
            self.groups
                .iter()
                .map(|group| i32::try_from(group.len()).unwrap_or(i32::MAX)),
        )
    }

    fn product(groups: &[Vec<T>]) -> usize {
        groups
            .iter()
            .fold(1usize, |acc, group| acc.saturating_mul(group.len()))
    }

    // Advance the odometer; the last group is the fastest digit.
    fn advance(&mut self) {
        for (digit, group) in self.cursor.iter_mut().zip(self.groups).rev() {
            *digit += 1;
            if *digit < group.len() {
                return;
            }
            *digit = 0;
        }
    }
}

impl<T: Clone> Iterator for Combinations<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let pick = self
            .cursor
            .iter()
            .zip(self.groups)
            .map(|(&digit, group)| group[digit].clone())
            .collect();

        self.remaining -= 1;
        self.advance();

        Some(pick)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Clone> ExactSizeIterator for Combinations<'_, T> {}

///
/// Combo
///
/// Multiset of small integers kept in sorted order. Ordering is
/// lexicographic over the sorted elements, with a missing position
/// comparing as `-1`.
///

#[derive(Clone, Debug, Deref, Eq, Hash, PartialEq)]
pub struct Combo {
    sorted: Vec<i32>,
}

impl Combo {
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        let mut sorted: Vec<i32> = values.into_iter().collect();
        sorted.sort_unstable();

        Self { sorted }
    }
}

impl Ord for Combo {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.sorted.len().max(other.sorted.len());
        for idx in 0..len {
            let left = self.sorted.get(idx).copied().unwrap_or(-1);
            let right = other.sorted.get(idx).copied().unwrap_or(-1);
            match left.cmp(&right) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }

        // sequences differing only by trailing -1s tie on padding; length breaks it
        self.sorted.len().cmp(&other.sorted.len())
    }
}

impl PartialOrd for Combo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Combo[")?;
        for (idx, value) in self.sorted.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

///
/// TESTS
///
