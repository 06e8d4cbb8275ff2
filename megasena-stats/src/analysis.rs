use std::collections::BTreeMap;

use tracing::debug;

use megasena_core::models::{
    Combination, ComboSize, DrawRecord, NumberMask, Selection, PICK_COUNT,
};

use crate::combinations::combinations;

/// Historical profile of a user selection. Rebuilt on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionAnalysis {
    /// Selection members, ascending.
    pub selection: Vec<u8>,
    pub draws_analyzed: usize,
    /// Draws containing each member.
    pub individual: BTreeMap<u8, u32>,
    /// For each size, draws containing every number of each subset of the
    /// selection.
    pub subsets: BTreeMap<ComboSize, BTreeMap<Combination, u32>>,
    /// Draws equal to the selection; only defined for six numbers.
    pub exact_matches: Option<u32>,
    /// Ids of the draws counted in `exact_matches`.
    pub exact_match_ids: Vec<u32>,
    /// Draws by how many selection members they contain (0..=6).
    pub hit_distribution: [u32; PICK_COUNT + 1],
}

impl SelectionAnalysis {
    pub fn subset_count(&self, numbers: &[u8]) -> Option<u32> {
        let key = Combination::new(numbers).ok()?;
        let size = ComboSize::from_k(key.len())?;
        self.subsets.get(&size)?.get(&key).copied()
    }
}

/// Returns `None` with no history or fewer than six selected numbers.
pub fn analyze(selection: &Selection, draws: &[DrawRecord]) -> Option<SelectionAnalysis> {
    if draws.is_empty() || !selection.is_ready() {
        return None;
    }

    let numbers = selection.numbers();

    let individual: BTreeMap<u8, u32> = numbers
        .iter()
        .map(|&n| {
            let count = draws.iter().filter(|d| d.contains(n)).count() as u32;
            (n, count)
        })
        .collect();

    let mut subsets = BTreeMap::new();
    for size in ComboSize::ALL.into_iter().filter(|s| s.k() <= numbers.len()) {
        let table: BTreeMap<Combination, u32> = combinations(&numbers, size.k())
            .into_iter()
            .filter_map(|subset| Combination::from_sorted(&subset).ok())
            .map(|key| {
                let mask = key.mask();
                let count = draws.iter().filter(|d| d.mask().is_superset_of(mask)).count() as u32;
                (key, count)
            })
            .collect();
        subsets.insert(size, table);
    }

    let (exact_matches, exact_match_ids) = if numbers.len() == PICK_COUNT {
        let target = NumberMask::from_numbers(&numbers);
        let ids: Vec<u32> = draws
            .iter()
            .filter(|d| d.mask() == target)
            .map(|d| d.draw_id)
            .collect();
        (Some(ids.len() as u32), ids)
    } else {
        (None, Vec::new())
    };

    let selected = NumberMask::from_numbers(&numbers);
    let mut hit_distribution = [0u32; PICK_COUNT + 1];
    for draw in draws {
        let hits = draw.numbers().iter().filter(|&&n| selected.contains(n)).count();
        hit_distribution[hits] += 1;
    }

    debug!(
        selection = numbers.len(),
        draws = draws.len(),
        exact = exact_matches.unwrap_or(0),
        "selection analyzed"
    );

    Some(SelectionAnalysis {
        selection: numbers,
        draws_analyzed: draws.len(),
        individual,
        subsets,
        exact_matches,
        exact_match_ids,
        hit_distribution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::count_frequencies;
    use chrono::NaiveDate;
    use megasena_core::models::make_test_draws;

    fn draw(id: u32, numbers: [u8; 6]) -> DrawRecord {
        DrawRecord::new(id, NaiveDate::from_ymd_opt(2021, 5, id).unwrap(), numbers).unwrap()
    }

    fn history() -> Vec<DrawRecord> {
        vec![
            draw(1, [1, 2, 3, 4, 5, 6]),
            draw(2, [1, 2, 3, 7, 8, 9]),
            draw(3, [10, 20, 30, 40, 50, 60]),
        ]
    }

    #[test]
    fn test_exact_match() {
        let selection = Selection::from_numbers(&[6, 5, 4, 3, 2, 1]).unwrap();
        let analysis = analyze(&selection, &history()).unwrap();
        assert_eq!(analysis.exact_matches, Some(1));
        assert_eq!(analysis.exact_match_ids, vec![1]);
        assert_eq!(analysis.draws_analyzed, 3);
    }

    #[test]
    fn test_individual_consistent_with_frequencies() {
        let draws = make_test_draws(27);
        let selection = Selection::from_numbers(draws[4].numbers()).unwrap();
        let analysis = analyze(&selection, &draws).unwrap();
        let table = count_frequencies(&draws);
        assert!(analysis.exact_matches.unwrap() >= 1);
        for (&n, &count) in &analysis.individual {
            assert_eq!(count, table.get(n));
        }
    }

    #[test]
    fn test_subset_frequencies() {
        let selection = Selection::from_numbers(&[1, 2, 3, 7, 10, 20, 30, 60]).unwrap();
        let analysis = analyze(&selection, &history()).unwrap();

        assert_eq!(analysis.exact_matches, None);
        assert_eq!(analysis.subsets.len(), 4);
        assert_eq!(analysis.subsets[&ComboSize::Pairs].len(), 28);
        assert_eq!(analysis.subsets[&ComboSize::Trios].len(), 56);
        assert_eq!(analysis.subsets[&ComboSize::Quartets].len(), 70);
        assert_eq!(analysis.subsets[&ComboSize::Quintets].len(), 56);

        assert_eq!(analysis.subset_count(&[1, 2]), Some(2));
        assert_eq!(analysis.subset_count(&[3, 1, 2]), Some(2));
        assert_eq!(analysis.subset_count(&[1, 2, 3, 7]), Some(1));
        assert_eq!(analysis.subset_count(&[10, 20, 30, 60]), Some(1));
        assert_eq!(analysis.subset_count(&[1, 10]), Some(0));
        assert_eq!(analysis.subset_count(&[4, 5]), None);
    }

    #[test]
    fn test_hit_distribution() {
        let selection = Selection::from_numbers(&[1, 2, 3, 4, 5, 6]).unwrap();
        let analysis = analyze(&selection, &history()).unwrap();
        assert_eq!(analysis.hit_distribution, [1, 0, 0, 1, 0, 0, 1]);
        assert_eq!(analysis.hit_distribution.iter().sum::<u32>(), 3);
    }

    #[test]
    fn test_preconditions() {
        let small = Selection::from_numbers(&[1, 2, 3, 4, 5]).unwrap();
        assert!(analyze(&small, &history()).is_none());

        let ready = Selection::from_numbers(&[1, 2, 3, 4, 5, 6]).unwrap();
        assert!(analyze(&ready, &[]).is_none());
    }

    #[test]
    fn test_deterministic() {
        let draws = make_test_draws(50);
        let selection = Selection::from_numbers(&[1, 8, 15, 22, 29, 36, 43]).unwrap();
        assert_eq!(analyze(&selection, &draws), analyze(&selection, &draws));
    }
}
