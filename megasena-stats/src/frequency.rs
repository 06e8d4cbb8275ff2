use tracing::debug;

use megasena_core::models::{DrawRecord, FrequencyTag, NumberStats, POOL_SIZE};

/// Occurrence count for every number 1..=60; absent numbers count zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; POOL_SIZE as usize],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self {
            counts: [0; POOL_SIZE as usize],
        }
    }
}

impl FrequencyTable {
    pub fn from_counts(counts: [u32; POOL_SIZE as usize]) -> Self {
        Self { counts }
    }

    pub fn get(&self, n: u8) -> u32 {
        match n {
            1..=POOL_SIZE => self.counts[(n - 1) as usize],
            _ => 0,
        }
    }

    /// `(number, count)` in numeric order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| ((i + 1) as u8, c))
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn mean(&self) -> f64 {
        self.total() as f64 / POOL_SIZE as f64
    }

    /// True when every number has the same count, including an empty table.
    pub fn is_uniform(&self) -> bool {
        self.counts.iter().all(|&c| c == self.counts[0])
    }

    /// Frequency descending, ties by number ascending.
    pub fn ranked(&self) -> Vec<(u8, u32)> {
        let mut ranked: Vec<(u8, u32)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }

    /// Frequency ascending, ties by number ascending.
    pub fn ranked_ascending(&self) -> Vec<(u8, u32)> {
        let mut ranked: Vec<(u8, u32)> = self.iter().collect();
        ranked.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
        ranked
    }
}

pub fn count_frequencies(draws: &[DrawRecord]) -> FrequencyTable {
    let mut counts = [0u32; POOL_SIZE as usize];

    for draw in draws {
        for &n in draw.numbers() {
            let idx = n.wrapping_sub(1) as usize;
            if idx < counts.len() {
                counts[idx] += 1;
            }
        }
    }

    debug!(draws = draws.len(), "frequencies counted");
    FrequencyTable { counts }
}

/// The `count` most frequent numbers and the `count` least frequent, the
/// latter listed rarest first.
pub fn most_least_frequent(table: &FrequencyTable, count: usize) -> (Vec<(u8, u32)>, Vec<(u8, u32)>) {
    let ranked = table.ranked();
    let count = count.min(ranked.len());
    let most = ranked[..count].to_vec();
    let least = ranked[ranked.len() - count..].iter().rev().copied().collect();
    (most, least)
}

/// Tags each number by its relative deviation from the mean count.
pub fn tag_frequencies(table: &FrequencyTable, threshold: f64) -> Vec<NumberStats> {
    let mean = table.mean();

    table
        .iter()
        .map(|(number, frequency)| {
            let tag = if mean <= 0.0 {
                FrequencyTag::Normal
            } else {
                let deviation = (frequency as f64 - mean) / mean;
                if deviation > threshold {
                    FrequencyTag::Hot
                } else if deviation < -threshold {
                    FrequencyTag::Cold
                } else {
                    FrequencyTag::Normal
                }
            };
            NumberStats {
                number,
                frequency,
                tag,
            }
        })
        .collect()
}
