//! Recursive Fisher–Yates shuffle over nested sequences.
//!
//! Each nesting level is shuffled on its own: for a board stored as
//! `Vec<Vec<Cell>>` the column order is permuted and each column's rows are
//! permuted inside that column, but a cell never moves to another column. The
//! identity permutation is a legal (if unlikely) result.

/// Source of uniformly distributed indices.
pub trait IndexSource {
    /// Returns an index in `0..bound`. `bound` is never zero.
    fn index_below(&mut self, bound: usize) -> usize;
}

impl IndexSource for fastrand::Rng {
    fn index_below(&mut self, bound: usize) -> usize {
        self.usize(..bound)
    }
}

/// Element of a shuffled sequence. Leaves use the default (no-op); sequences
/// recurse.
pub trait Shuffle {
    fn shuffle_nested(&mut self, _rng: &mut dyn IndexSource) {}
}

impl<T: Shuffle> Shuffle for Vec<T> {
    fn shuffle_nested(&mut self, rng: &mut dyn IndexSource) {
        shuffle(self, rng);
    }
}

/// Shuffle `items` in place, descending into nested sequences as they are
/// visited.
pub fn shuffle<T: Shuffle>(items: &mut [T], rng: &mut dyn IndexSource) {
    let mut counter = items.len();
    while counter > 0 {
        let index = rng.index_below(counter);
        counter -= 1;
        if let Some(item) = items.get_mut(counter) {
            item.shuffle_nested(rng);
        }
        items.swap(counter, index);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    impl Shuffle for u32 {}
    impl Shuffle for char {}

    /// Replays a fixed list of draws, clamped into range.
    pub(crate) struct Scripted {
        draws: Vec<usize>,
        next: usize,
    }

    impl Scripted {
        pub(crate) fn new(draws: &[usize]) -> Self {
            Self {
                draws: draws.to_vec(),
                next: 0,
            }
        }
    }

    impl IndexSource for Scripted {
        fn index_below(&mut self, bound: usize) -> usize {
            let draw = self.draws.get(self.next).copied().unwrap_or(0);
            self.next += 1;
            draw % bound
        }
    }

    fn sorted<T: Ord + Clone>(v: &[T]) -> Vec<T> {
        let mut v = v.to_vec();
        v.sort();
        v
    }

    #[test]
    fn test_shuffle_flat_precomputed() {
        // counter=4 draw 1: swap(3,1) -> [0,3,2,1]
        // counter=3 draw 0: swap(2,0) -> [2,3,0,1]
        // counter=2 draw 1: swap(1,1) -> [2,3,0,1]
        // counter=1 draw 0: swap(0,0) -> [2,3,0,1]
        let mut v: Vec<u32> = vec![0, 1, 2, 3];
        shuffle(&mut v, &mut Scripted::new(&[1, 0, 1, 0]));
        assert_eq!(v, vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_shuffle_nested_precomputed() {
        // outer counter=2 draws 0, then shuffles column 1 (draws 0, 0),
        // then swaps columns 1 and 0; outer counter=1 draws 0, shuffles the
        // column now at 0 (draws 1, 0) and swaps it with itself.
        let mut v: Vec<Vec<char>> = vec![vec!['a', 'b'], vec!['c', 'd']];
        shuffle(&mut v, &mut Scripted::new(&[0, 0, 0, 0, 1, 0]));
        // column ['c','d'] -> swap(1,0) -> ['d','c'], moved to front,
        // then -> draw 1 swap(1,1) keeps ['d','c'].
        assert_eq!(v, vec![vec!['d', 'c'], vec!['a', 'b']]);
    }

    #[test]
    fn test_shuffle_preserves_membership_at_every_level() {
        let mut rng = fastrand::Rng::with_seed(7);
        let original: Vec<Vec<u32>> = (0..5).map(|c| (0..4).map(|r| c * 10 + r).collect()).collect();
        for _ in 0..50 {
            let mut v = original.clone();
            shuffle(&mut v, &mut rng);
            assert_eq!(v.len(), original.len());
            let mut firsts: Vec<Vec<u32>> = v.iter().map(|col| sorted(col)).collect();
            firsts.sort();
            assert_eq!(firsts, original, "a cell left its column");
        }
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let base: Vec<Vec<u32>> = (0..4).map(|c| (0..3).map(|r| c * 3 + r).collect()).collect();
        let mut a = base.clone();
        let mut b = base;
        shuffle(&mut a, &mut fastrand::Rng::with_seed(42));
        shuffle(&mut b, &mut fastrand::Rng::with_seed(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_empty_and_single() {
        let mut empty: Vec<u32> = Vec::new();
        shuffle(&mut empty, &mut Scripted::new(&[]));
        assert!(empty.is_empty());
        let mut one = vec![9u32];
        shuffle(&mut one, &mut Scripted::new(&[0]));
        assert_eq!(one, vec![9]);
    }

    #[test]
    fn test_identity_is_a_legal_outcome() {
        // draws i-1 at each step swap every element with itself.
        let mut v: Vec<u32> = vec![0, 1, 2];
        shuffle(&mut v, &mut Scripted::new(&[2, 1, 0]));
        assert_eq!(v, vec![0, 1, 2]);
    }
}
