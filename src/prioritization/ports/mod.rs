//! Port contracts for re-prioritization.

pub mod oracle;

pub use oracle::{RankingOracle, RankingOracleError, RankingOracleResult};
