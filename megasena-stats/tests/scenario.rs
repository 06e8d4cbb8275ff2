use chrono::NaiveDate;

use megasena_core::models::{ComboSize, Selection};
use megasena_core::raw::RawRecord;
use megasena_core::validate::{into_history_at, validate_at};
use megasena_stats::analysis::analyze;
use megasena_stats::config::BetConfig;
use megasena_stats::frequency::count_frequencies;
use megasena_stats::sampler::{generate_bet, hot_cold_pools, make_rng};
use megasena_stats::tally::build_all_tallies;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn rows() -> Vec<RawRecord> {
    vec![
        RawRecord::draw(1, "06/01/2023", [1, 2, 3, 4, 5, 6]),
        RawRecord::draw(2, "13/01/2023", [1, 2, 3, 7, 8, 9]),
        RawRecord::draw(3, "20/01/2023", [10, 20, 30, 40, 50, 60]),
    ]
}

#[test]
fn three_draw_history_end_to_end() {
    assert!(validate_at(&rows(), today()).is_empty());
    let history = into_history_at(&rows(), today()).unwrap();

    let table = count_frequencies(&history);
    for n in [1, 2, 3] {
        assert_eq!(table.get(n), 2);
    }
    for n in [4, 5, 6, 7, 8, 9, 10, 20, 30, 40, 50, 60] {
        assert_eq!(table.get(n), 1);
    }
    assert_eq!(table.get(11), 0);
    assert_eq!(table.total(), 18);

    let tallies = build_all_tallies(&history);
    let pairs = &tallies[0];
    assert_eq!(pairs.size(), ComboSize::Pairs);
    assert_eq!(pairs.get(&"1,2".parse().unwrap()), 2);
    assert_eq!(pairs.get(&"4,5".parse().unwrap()), 1);
    for tally in &tallies {
        assert_eq!(tally.total(), 3 * tally.size().subsets_per_draw() as u64);
    }

    let selection = Selection::from_numbers(&[1, 2, 3, 4, 5, 6]).unwrap();
    let analysis = analyze(&selection, &history).unwrap();
    assert_eq!(analysis.exact_matches, Some(1));
    assert_eq!(analysis.individual[&1], 2);
    assert_eq!(analysis.individual[&4], 1);
    assert_eq!(analysis.subset_count(&[1, 2, 3]), Some(2));
}

#[test]
fn rejected_dataset_never_reaches_the_engine() {
    let mut bad = rows();
    bad.push(RawRecord::draw(4, "27/01/2023", [1, 2, 3, 4, 4, 6]));
    bad.push(RawRecord::draw(5, "03/02/2023", [0, 2, 3, 4, 5, 61]));
    let errors = into_history_at(&bad, today()).unwrap_err();
    let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "Linha 4: Números duplicados encontrados",
            "Linha 5: Todos os números devem ser inteiros entre 1 e 60",
        ]
    );
}

#[test]
fn generated_bets_stay_inside_pools() {
    let history = into_history_at(&rows(), today()).unwrap();
    let table = count_frequencies(&history);
    let config = BetConfig::default();
    let (hot, cold) = hot_cold_pools(&table, &config);
    let mut rng = make_rng(Some(2024));
    for _ in 0..200 {
        let bet = generate_bet(Some(&table), &config, &mut rng).unwrap();
        assert!(bet.numbers().iter().all(|n| hot.contains(n) || cold.contains(n)));
    }
}
