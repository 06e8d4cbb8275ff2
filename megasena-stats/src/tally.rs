use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::debug;

use megasena_core::models::{Combination, ComboSize, DrawRecord};

use crate::combinations::combinations;

/// How many draws contain each k-subset, for one k.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationTable {
    size: ComboSize,
    counts: BTreeMap<Combination, u32>,
}

impl CombinationTable {
    pub fn size(&self) -> ComboSize {
        self.size
    }

    pub fn get(&self, key: &Combination) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Lookup by numbers in any order; malformed keys count zero.
    pub fn get_numbers(&self, numbers: &[u8]) -> u32 {
        Combination::new(numbers)
            .map(|key| self.get(&key))
            .unwrap_or(0)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Combination, u32)> + '_ {
        self.counts.iter().map(|(k, &v)| (k, v))
    }

    /// Distinct subsets seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }

    /// The `n` most frequent subsets, count descending, ties by key.
    pub fn top(&self, n: usize) -> Vec<(Combination, u32)> {
        let mut ranked: Vec<(Combination, u32)> = self.counts.iter().map(|(k, &v)| (*k, v)).collect();
        // Stable sort keeps key order among equal counts.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

pub fn build_tally(draws: &[DrawRecord], size: ComboSize) -> CombinationTable {
    let mut counts: BTreeMap<Combination, u32> = BTreeMap::new();

    for draw in draws {
        // Draw numbers are stored ascending so every subset is canonical.
        for subset in combinations(draw.numbers(), size.k()) {
            if let Ok(key) = Combination::from_sorted(&subset) {
                *counts.entry(key).or_insert(0) += 1;
            }
        }
    }

    debug!(draws = draws.len(), k = size.k(), distinct = counts.len(), "combination tally built");
    CombinationTable { size, counts }
}

/// One table per size, built in parallel; ordered pairs to quintets.
pub fn build_all_tallies(draws: &[DrawRecord]) -> Vec<CombinationTable> {
    ComboSize::ALL
        .par_iter()
        .map(|&size| build_tally(draws, size))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use megasena_core::models::make_test_draws;

    fn draw(id: u32, numbers: [u8; 6]) -> DrawRecord {
        DrawRecord::new(id, NaiveDate::from_ymd_opt(2020, 1, id).unwrap(), numbers).unwrap()
    }

    #[test]
    fn test_totals_match_subsets_per_draw() {
        let draws = make_test_draws(23);
        for size in ComboSize::ALL {
            let table = build_tally(&draws, size);
            assert_eq!(table.total(), 23 * size.subsets_per_draw() as u64, "{:?}", size);
        }
    }

    #[test]
    fn test_counts_shared_pair() {
        let draws = vec![
            draw(1, [6, 5, 4, 3, 2, 1]),
            draw(2, [9, 8, 7, 3, 2, 1]),
            draw(3, [60, 50, 40, 30, 20, 10]),
        ];
        let pairs = build_tally(&draws, ComboSize::Pairs);
        assert_eq!(pairs.get_numbers(&[1, 2]), 2);
        assert_eq!(pairs.get_numbers(&[2, 1]), 2);
        assert_eq!(pairs.get_numbers(&[4, 5]), 1);
        assert_eq!(pairs.get_numbers(&[4, 7]), 0);
        assert_eq!(pairs.get(&"10,60".parse().unwrap()), 1);
        assert_eq!(pairs.len(), 15 * 3 - 3);

        let trios = build_tally(&draws, ComboSize::Trios);
        assert_eq!(trios.get_numbers(&[1, 2, 3]), 2);
    }

    #[test]
    fn test_top_ranking() {
        let draws = vec![
            draw(1, [1, 2, 3, 4, 5, 6]),
            draw(2, [1, 2, 3, 7, 8, 9]),
            draw(3, [1, 2, 10, 20, 30, 40]),
        ];
        let top = build_tally(&draws, ComboSize::Pairs).top(4);
        let rendered: Vec<(String, u32)> = top.iter().map(|(k, c)| (k.to_string(), *c)).collect();
        assert_eq!(
            rendered,
            vec![
                ("1,2".to_string(), 3),
                ("1,3".to_string(), 2),
                ("2,3".to_string(), 2),
                ("1,4".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_empty_history() {
        let table = build_tally(&[], ComboSize::Quintets);
        assert!(table.is_empty());
        assert!(table.top(5).is_empty());
    }

    #[test]
    fn test_build_all_matches_sequential() {
        let draws = make_test_draws(40);
        let all = build_all_tallies(&draws);
        assert_eq!(all.len(), 4);
        for (table, size) in all.iter().zip(ComboSize::ALL) {
            assert_eq!(table.size(), size);
            assert_eq!(table, &build_tally(&draws, size));
        }
    }
}
