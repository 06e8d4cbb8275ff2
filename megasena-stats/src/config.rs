use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use megasena_core::models::{ComboSize, PICK_COUNT, POOL_SIZE};

/// Hot/cold bet generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BetConfig {
    /// Most frequent numbers forming the hot pool.
    pub hot_pool: usize,
    /// Least frequent numbers forming the cold pool.
    pub cold_pool: usize,
    pub min_hot: usize,
    pub max_hot: usize,
}

impl Default for BetConfig {
    fn default() -> Self {
        Self {
            hot_pool: 20,
            cold_pool: 20,
            min_hot: 3,
            max_hot: 4,
        }
    }
}

/// Parameters for bets built from the top-ranked combinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboBetConfig {
    pub combo_size: ComboSize,
    pub top_count: usize,
    pub use_top_combos: bool,
    pub use_cold_numbers: bool,
    pub cold_count: usize,
}

impl Default for ComboBetConfig {
    fn default() -> Self {
        Self {
            combo_size: ComboSize::Pairs,
            top_count: 3,
            use_top_combos: true,
            use_cold_numbers: true,
            cold_count: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub bet: BetConfig,
    pub combo_bet: ComboBetConfig,
    /// Relative deviation from the mean count above which a number is hot
    /// (below its negation, cold).
    pub hot_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bet: BetConfig::default(),
            combo_bet: ComboBetConfig::default(),
            hot_threshold: 0.3,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        let bet = &self.bet;
        if bet.hot_pool == 0 || bet.cold_pool == 0 {
            bail!("Os grupos quente e frio não podem ser vazios");
        }
        if bet.hot_pool + bet.cold_pool > POOL_SIZE as usize {
            bail!(
                "Grupos quente ({}) e frio ({}) se sobrepõem: máximo {} no total",
                bet.hot_pool,
                bet.cold_pool,
                POOL_SIZE
            );
        }
        if bet.min_hot > bet.max_hot || bet.max_hot > PICK_COUNT {
            bail!("Faixa de números quentes inválida: {}-{}", bet.min_hot, bet.max_hot);
        }
        if bet.max_hot > bet.hot_pool {
            bail!("Grupo quente ({}) menor que max_hot ({})", bet.hot_pool, bet.max_hot);
        }
        if PICK_COUNT - bet.min_hot > bet.cold_pool {
            bail!(
                "Grupo frio ({}) não completa a aposta com apenas {} números quentes",
                bet.cold_pool,
                bet.min_hot
            );
        }
        if !(self.hot_threshold.is_finite() && self.hot_threshold >= 0.0) {
            bail!("hot_threshold inválido: {}", self.hot_threshold);
        }
        Ok(())
    }
}
