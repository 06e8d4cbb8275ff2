use std::collections::BTreeSet;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Highest ball number; balls are drawn from 1..=POOL_SIZE.
pub const POOL_SIZE: u8 = 60;
/// Balls per draw and per bet.
pub const PICK_COUNT: usize = 6;
pub const MIN_SELECTION: usize = 6;
pub const MAX_SELECTION: usize = 8;
/// Longest key a `Combination` can hold (a whole draw).
pub const MAX_COMBINATION: usize = 6;

pub fn in_range(n: i64) -> bool {
    (1..=POOL_SIZE as i64).contains(&n)
}

/// Set of ball numbers packed in one bit per number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NumberMask(u64);

impl NumberMask {
    pub fn from_numbers(numbers: &[u8]) -> Self {
        let mut bits = 0u64;
        for &n in numbers {
            if n >= 1 && n <= POOL_SIZE {
                bits |= 1 << (n - 1);
            }
        }
        NumberMask(bits)
    }

    pub fn contains(&self, n: u8) -> bool {
        n >= 1 && n <= POOL_SIZE && self.0 & (1 << (n - 1)) != 0
    }

    pub fn is_superset_of(&self, other: NumberMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }
}

/// One historical drawing. Numbers are kept sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    pub draw_id: u32,
    pub date: NaiveDate,
    numbers: [u8; PICK_COUNT],
    mask: NumberMask,
}

impl DrawRecord {
    pub fn new(draw_id: u32, date: NaiveDate, numbers: [u8; PICK_COUNT]) -> Result<Self> {
        if draw_id == 0 {
            bail!("Concurso deve ser um número inteiro positivo");
        }
        validate_draw(&numbers)?;
        let mut numbers = numbers;
        numbers.sort_unstable();
        Ok(Self {
            draw_id,
            date,
            numbers,
            mask: NumberMask::from_numbers(&numbers),
        })
    }

    pub fn numbers(&self) -> &[u8; PICK_COUNT] {
        &self.numbers
    }

    pub fn mask(&self) -> NumberMask {
        self.mask
    }

    pub fn contains(&self, n: u8) -> bool {
        self.mask.contains(n)
    }
}

/// Six distinct numbers in range, in any order.
pub fn validate_draw(numbers: &[u8; PICK_COUNT]) -> Result<()> {
    Combination::new(numbers).map(|_| ())
}

/// Validated draw sequence in ingestion order. Read-only once built; a new
/// dataset replaces the whole history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawHistory {
    draws: Vec<DrawRecord>,
}

impl DrawHistory {
    pub fn new(draws: Vec<DrawRecord>) -> Self {
        Self { draws }
    }

    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }
}

impl Deref for DrawHistory {
    type Target = [DrawRecord];

    fn deref(&self) -> &[DrawRecord] {
        &self.draws
    }
}

/// Canonical key for a subset of ball numbers: sorted ascending, distinct.
///
/// Ordering is by length first, then lexicographic on the numbers, so keys
/// of one size sort the same way their comma-joined forms read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Combination {
    len: u8,
    numbers: [u8; MAX_COMBINATION],
}

impl Combination {
    /// Builds a key from numbers in any order.
    pub fn new(numbers: &[u8]) -> Result<Self> {
        check_combination_len(numbers.len())?;
        let mut buf = [0u8; MAX_COMBINATION];
        let buf = &mut buf[..numbers.len()];
        buf.copy_from_slice(numbers);
        buf.sort_unstable();
        Self::from_sorted(buf)
    }

    /// Builds a key from numbers already ascending, such as a subset
    /// enumerated from a stored draw.
    pub fn from_sorted(numbers: &[u8]) -> Result<Self> {
        check_combination_len(numbers.len())?;
        if let Some(w) = numbers.windows(2).find(|w| w[0] >= w[1]) {
            if w[0] == w[1] {
                bail!("Número duplicado: {}", w[0]);
            }
            bail!("Números fora de ordem: {} antes de {}", w[0], w[1]);
        }
        if let Some(&n) = numbers.iter().find(|&&n| !in_range(n as i64)) {
            bail!("Número {} fora do intervalo (1-{})", n, POOL_SIZE);
        }
        let mut buf = [0u8; MAX_COMBINATION];
        buf[..numbers.len()].copy_from_slice(numbers);
        Ok(Self {
            len: numbers.len() as u8,
            numbers: buf,
        })
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.numbers[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn mask(&self) -> NumberMask {
        NumberMask::from_numbers(self.as_slice())
    }
}

fn check_combination_len(len: usize) -> Result<()> {
    if len == 0 || len > MAX_COMBINATION {
        bail!(
            "Combinação deve ter entre 1 e {} números ({} fornecidos)",
            MAX_COMBINATION,
            len
        );
    }
    Ok(())
}

impl TryFrom<&[u8]> for Combination {
    type Error = anyhow::Error;

    fn try_from(numbers: &[u8]) -> Result<Self> {
        Combination::new(numbers)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, n) in self.as_slice().iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", n)?;
        }
        Ok(())
    }
}

impl FromStr for Combination {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let numbers = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<u8>()
                    .with_context(|| format!("Número inválido: '{}'", part.trim()))
            })
            .collect::<Result<Vec<_>>>()?;
        Combination::new(&numbers)
    }
}

/// Subset sizes tallied per draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ComboSize {
    Pairs,
    Trios,
    Quartets,
    Quintets,
}

impl ComboSize {
    pub const ALL: [ComboSize; 4] = [
        ComboSize::Pairs,
        ComboSize::Trios,
        ComboSize::Quartets,
        ComboSize::Quintets,
    ];

    pub fn k(&self) -> usize {
        match self {
            ComboSize::Pairs => 2,
            ComboSize::Trios => 3,
            ComboSize::Quartets => 4,
            ComboSize::Quintets => 5,
        }
    }

    pub fn from_k(k: usize) -> Option<Self> {
        ComboSize::ALL.into_iter().find(|size| size.k() == k)
    }

    /// C(6, k): subsets contributed by each draw.
    pub fn subsets_per_draw(&self) -> usize {
        match self {
            ComboSize::Pairs => 15,
            ComboSize::Trios => 20,
            ComboSize::Quartets => 15,
            ComboSize::Quintets => 6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComboSize::Pairs => "Duplas",
            ComboSize::Trios => "Ternos",
            ComboSize::Quartets => "Quadras",
            ComboSize::Quintets => "Quinas",
        }
    }
}

impl fmt::Display for ComboSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Selection already holds `MAX_SELECTION` numbers; nothing changed.
    Full,
}

/// User-curated candidate numbers, at most `MAX_SELECTION` of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    numbers: BTreeSet<u8>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_numbers(numbers: &[u8]) -> Result<Self> {
        if numbers.len() > MAX_SELECTION {
            bail!("Selecione no máximo {} números ({} fornecidos)", MAX_SELECTION, numbers.len());
        }
        let mut selection = Selection::new();
        for &n in numbers {
            if !in_range(n as i64) {
                bail!("Número {} fora do intervalo (1-{})", n, POOL_SIZE);
            }
            if !selection.numbers.insert(n) {
                bail!("Número duplicado: {}", n);
            }
        }
        Ok(selection)
    }

    pub fn toggle(&mut self, n: u8) -> Result<ToggleOutcome> {
        if !in_range(n as i64) {
            bail!("Número {} fora do intervalo (1-{})", n, POOL_SIZE);
        }
        if self.numbers.remove(&n) {
            return Ok(ToggleOutcome::Removed);
        }
        if self.numbers.len() >= MAX_SELECTION {
            return Ok(ToggleOutcome::Full);
        }
        self.numbers.insert(n);
        Ok(ToggleOutcome::Added)
    }

    pub fn clear(&mut self) {
        self.numbers.clear();
    }

    /// Members in ascending order.
    pub fn numbers(&self) -> Vec<u8> {
        self.numbers.iter().copied().collect()
    }

    pub fn contains(&self, n: u8) -> bool {
        self.numbers.contains(&n)
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Enough numbers for an analysis.
    pub fn is_ready(&self) -> bool {
        self.numbers.len() >= MIN_SELECTION
    }
}

/// Generated candidate bet: 6 distinct numbers, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bet {
    numbers: [u8; PICK_COUNT],
}

impl Bet {
    pub fn from_numbers(numbers: &[u8]) -> Result<Self> {
        let arr: [u8; PICK_COUNT] = numbers
            .try_into()
            .with_context(|| format!("Aposta deve ter {} números ({} fornecidos)", PICK_COUNT, numbers.len()))?;
        validate_draw(&arr)?;
        let mut arr = arr;
        arr.sort_unstable();
        Ok(Self { numbers: arr })
    }

    pub fn numbers(&self) -> &[u8; PICK_COUNT] {
        &self.numbers
    }
}

#[derive(Debug, Clone)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub tag: FrequencyTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyTag {
    Hot,
    Cold,
    Normal,
}

impl fmt::Display for FrequencyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrequencyTag::Hot => write!(f, "QUENTE"),
            FrequencyTag::Cold => write!(f, "FRIO"),
            FrequencyTag::Normal => write!(f, "-"),
        }
    }
}

/// Deterministic fixture: draw `i` holds six consecutive numbers starting
/// at `(i % 10) * 6 + 1`, dated one day apart from 2024-01-01.
pub fn make_test_draws(n: usize) -> Vec<DrawRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    (0..n)
        .map(|i| {
            let base = ((i % 10) * 6) as u8;
            let numbers = [base + 1, base + 2, base + 3, base + 4, base + 5, base + 6];
            DrawRecord {
                draw_id: i as u32 + 1,
                date: start + chrono::Days::new(i as u64),
                numbers,
                mask: NumberMask::from_numbers(&numbers),
            }
        })
        .collect()
}
