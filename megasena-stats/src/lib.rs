pub mod analysis;
pub mod combinations;
pub mod config;
pub mod filter;
pub mod frequency;
pub mod sampler;
pub mod tally;
