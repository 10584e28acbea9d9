//! Balanced work sharding for the parallel stages.

use std::num::NonZeroUsize;

/// Split `items` into exactly `n` contiguous shards whose sizes differ by at
/// most one.
///
/// The first `len % n` shards receive the extra item, so concatenating the
/// shards by index reproduces `items` in order. When `n` exceeds the item
/// count the trailing shards are empty.
#[must_use]
pub fn shard<T>(items: Vec<T>, n: NonZeroUsize) -> Vec<Vec<T>> {
    let n = n.get();
    let base = items.len() / n;
    let extra = items.len() % n;

    let mut shards = Vec::with_capacity(n);
    let mut rest = items.into_iter();
    for index in 0..n {
        let size = base + usize::from(index < extra);
        shards.push(rest.by_ref().take(size).collect());
    }
    shards
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn splits_evenly_with_leading_remainder() {
        let shards = shard((1..=7).collect::<Vec<_>>(), nz(3));
        assert_eq!(shards, vec![vec![1, 2, 3], vec![4, 5], vec![6, 7]]);
    }

    #[test]
    fn more_shards_than_items_leaves_trailing_shards_empty() {
        let shards = shard(vec!["a", "b"], nz(4));
        assert_eq!(shards, vec![vec!["a"], vec!["b"], vec![], vec![]]);
    }

    #[test]
    fn empty_input_yields_n_empty_shards() {
        let shards: Vec<Vec<u8>> = shard(Vec::new(), nz(3));
        assert_eq!(shards.len(), 3);
        assert!(shards.iter().all(Vec::is_empty));
    }

    #[test]
    fn single_shard_keeps_everything() {
        let shards = shard(vec![3, 1, 2], nz(1));
        assert_eq!(shards, vec![vec![3, 1, 2]]);
    }

    #[test]
    fn every_split_is_complete_ordered_and_balanced() {
        for len in 0..40usize {
            let items: Vec<usize> = (0..len).collect();
            for n in 1..12usize {
                let shards = shard(items.clone(), nz(n));
                assert_eq!(shards.len(), n, "shard count for len={len} n={n}");

                let flattened: Vec<usize> = shards.iter().flatten().copied().collect();
                assert_eq!(flattened, items, "concatenation for len={len} n={n}");

                let max = shards.iter().map(Vec::len).max().unwrap();
                let min = shards.iter().map(Vec::len).min().unwrap();
                assert!(max - min <= 1, "imbalance for len={len} n={n}");
            }
        }
    }
}
