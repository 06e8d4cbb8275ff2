//! Bet generation heuristics.
//!
//! These pick numbers from historical frequencies for variety only; past
//! frequencies carry no predictive value for a fair draw.

use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use megasena_core::models::{Bet, DrawRecord, PICK_COUNT, POOL_SIZE};

use crate::config::{BetConfig, ComboBetConfig};
use crate::frequency::{count_frequencies, FrequencyTable};
use crate::tally::build_tally;

/// Seed of the form YYYYMMDD.
pub fn seed_for_date(date: NaiveDate) -> u64 {
    date.year() as u64 * 10_000 + date.month() as u64 * 100 + date.day() as u64
}

/// Seed for the local date, so runs on the same day repeat their bets.
pub fn date_seed() -> u64 {
    seed_for_date(chrono::Local::now().date_naive())
}

/// Explicit seed when given, today's date seed otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(date_seed);
    debug!(seed, "rng seeded");
    StdRng::seed_from_u64(seed)
}

/// Hot pool (most frequent first) and cold pool (the tail of the same
/// ranking), ties broken by number ascending.
pub fn hot_cold_pools(frequencies: &FrequencyTable, config: &BetConfig) -> (Vec<u8>, Vec<u8>) {
    let ranked: Vec<u8> = frequencies.ranked().into_iter().map(|(n, _)| n).collect();
    let hot_len = config.hot_pool.min(ranked.len());
    let cold_len = config.cold_pool.min(ranked.len() - hot_len);
    let hot = ranked[..hot_len].to_vec();
    let cold = ranked[ranked.len() - cold_len..].to_vec();
    (hot, cold)
}

/// Uniform bet without history, hot/cold-biased bet with one.
pub fn generate_bet<R: Rng>(
    frequencies: Option<&FrequencyTable>,
    config: &BetConfig,
    rng: &mut R,
) -> Result<Bet> {
    let Some(frequencies) = frequencies else {
        return random_bet(rng);
    };

    if config.min_hot > config.max_hot {
        bail!("Faixa de números quentes inválida: {}-{}", config.min_hot, config.max_hot);
    }

    let (hot, cold) = hot_cold_pools(frequencies, config);
    let hot_target = rng.random_range(config.min_hot..=config.max_hot).min(PICK_COUNT);

    // Sampling without replacement inside each pool always terminates.
    let mut picked: Vec<u8> = hot.choose_multiple(rng, hot_target).copied().collect();

    let cold_left: Vec<u8> = cold.iter().copied().filter(|n| !picked.contains(n)).collect();
    let need = PICK_COUNT - picked.len();
    picked.extend(cold_left.choose_multiple(rng, need).copied());

    if picked.len() < PICK_COUNT {
        // Pools too small for the target: top up from the rest of the range.
        let rest: Vec<u8> = (1..=POOL_SIZE).filter(|n| !picked.contains(n)).collect();
        let need = PICK_COUNT - picked.len();
        picked.extend(rest.choose_multiple(rng, need).copied());
    }

    debug!(hot = hot_target, "hot/cold bet generated");
    Bet::from_numbers(&picked)
}

pub fn random_bet<R: Rng>(rng: &mut R) -> Result<Bet> {
    let numbers: Vec<u8> = rand::seq::index::sample(rng, POOL_SIZE as usize, PICK_COUNT)
        .into_iter()
        .map(|i| (i + 1) as u8)
        .collect();
    Bet::from_numbers(&numbers)
}

pub fn generate_bets<R: Rng>(
    frequencies: Option<&FrequencyTable>,
    config: &BetConfig,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Bet>> {
    (0..count).map(|_| generate_bet(frequencies, config, rng)).collect()
}

/// Bet seeded by the numbers of the top-ranked combinations, then the
/// rarest numbers, completed at random. `None` without history.
pub fn generate_from_combos<R: Rng>(
    draws: &[DrawRecord],
    config: &ComboBetConfig,
    rng: &mut R,
) -> Option<Bet> {
    if draws.is_empty() {
        return None;
    }

    let mut picked: Vec<u8> = Vec::with_capacity(PICK_COUNT * 2);

    if config.use_top_combos {
        let table = build_tally(draws, config.combo_size);
        for (combo, _) in table.top(config.top_count) {
            for &n in combo.as_slice() {
                if !picked.contains(&n) {
                    picked.push(n);
                }
            }
        }
    }

    if config.use_cold_numbers {
        let frequencies = count_frequencies(draws);
        let rarest = frequencies
            .ranked_ascending()
            .into_iter()
            .map(|(n, _)| n)
            .filter(|n| !picked.contains(n))
            .take(config.cold_count)
            .collect::<Vec<_>>();
        picked.extend(rarest);
    }

    while picked.len() < PICK_COUNT {
        let available: Vec<u8> = (1..=POOL_SIZE).filter(|n| !picked.contains(n)).collect();
        match available.choose(rng) {
            Some(&n) => picked.push(n),
            None => break,
        }
    }

    picked.truncate(PICK_COUNT);
    Bet::from_numbers(&picked).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use megasena_core::models::make_test_draws;

    fn skewed_table() -> FrequencyTable {
        let mut counts = [0u32; 60];
        for (i, c) in counts.iter_mut().enumerate() {
            *c = (i as u32 * 7) % 61;
        }
        FrequencyTable::from_counts(counts)
    }

    fn assert_valid(bet: &Bet) {
        let n = bet.numbers();
        assert!(n.windows(2).all(|w| w[0] < w[1]), "not ascending: {:?}", n);
        assert!(n.iter().all(|&x| (1..=60).contains(&x)), "out of range: {:?}", n);
    }

    #[test]
    fn test_random_bet_valid() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let bet = generate_bet(None, &BetConfig::default(), &mut rng).unwrap();
            assert_valid(&bet);
        }
    }

    #[test]
    fn test_hot_cold_bet_uses_pools() {
        let table = skewed_table();
        let config = BetConfig::default();
        let (hot, cold) = hot_cold_pools(&table, &config);
        assert_eq!(hot.len(), 20);
        assert_eq!(cold.len(), 20);
        assert!(hot.iter().all(|n| !cold.contains(n)));

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let bet = generate_bet(Some(&table), &config, &mut rng).unwrap();
            assert_valid(&bet);
            let hot_hits = bet.numbers().iter().filter(|n| hot.contains(n)).count();
            let cold_hits = bet.numbers().iter().filter(|n| cold.contains(n)).count();
            assert!((3..=4).contains(&hot_hits), "hot hits = {}", hot_hits);
            assert_eq!(hot_hits + cold_hits, 6);
        }
    }

    #[test]
    fn test_pool_ties_by_number() {
        let (hot, cold) = hot_cold_pools(&FrequencyTable::default(), &BetConfig::default());
        assert_eq!(hot, (1..=20).collect::<Vec<u8>>());
        assert_eq!(cold, (41..=60).collect::<Vec<u8>>());
    }

    #[test]
    fn test_tiny_pools_still_complete() {
        let config = BetConfig {
            hot_pool: 2,
            cold_pool: 1,
            min_hot: 4,
            max_hot: 4,
        };
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let bet = generate_bet(Some(&skewed_table()), &config, &mut rng).unwrap();
            assert_valid(&bet);
        }
    }

    #[test]
    fn test_seeded_rng_reproducible() {
        let table = skewed_table();
        let config = BetConfig::default();
        let a = generate_bets(Some(&table), &config, 5, &mut make_rng(Some(7))).unwrap();
        let b = generate_bets(Some(&table), &config, 5, &mut make_rng(Some(7))).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
    }

    #[test]
    fn test_generate_from_combos() {
        // Blocks 1-6, 7-12 and 13-18 appear twice; the rest once.
        let draws = make_test_draws(13);
        let config = ComboBetConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        let bet = generate_from_combos(&draws, &config, &mut rng).unwrap();
        // Top pairs are (1,2), (1,3), (1,4): numbers 1-4, then rarest 19, 20.
        assert_eq!(bet.numbers(), &[1, 2, 3, 4, 19, 20]);
    }

    #[test]
    fn test_generate_from_combos_random_fill() {
        let draws = make_test_draws(13);
        let config = ComboBetConfig {
            use_top_combos: false,
            use_cold_numbers: false,
            ..ComboBetConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let bet = generate_from_combos(&draws, &config, &mut rng).unwrap();
            assert_valid(&bet);
        }
        assert!(generate_from_combos(&[], &config, &mut rng).is_none());
    }

    #[test]
    fn test_generate_from_combos_truncates() {
        let draws = make_test_draws(13);
        let config = ComboBetConfig {
            combo_size: megasena_core::models::ComboSize::Quintets,
            top_count: 2,
            ..ComboBetConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let bet = generate_from_combos(&draws, &config, &mut rng).unwrap();
        // Top quintets (1,2,3,4,5) and (1,2,3,4,6): first six chosen are 1-6.
        assert_eq!(bet.numbers(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_seed_for_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(seed_for_date(date), 20_260_309);
        assert_eq!(date_seed().to_string().len(), 8);
    }

    #[test]
    fn test_unseeded_rng_uses_date_seed() {
        let table = skewed_table();
        let config = BetConfig::default();
        let seed = date_seed();
        let implicit = generate_bets(Some(&table), &config, 3, &mut make_rng(None)).unwrap();
        let explicit = generate_bets(Some(&table), &config, 3, &mut make_rng(Some(seed))).unwrap();
        // A run straddling midnight sees two different dates.
        if seed == date_seed() {
            assert_eq!(implicit, explicit);
        }
    }
}
