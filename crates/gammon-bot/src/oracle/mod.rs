//! Contract with the external move-evaluation oracle. The engine hands it
//! the two opaque identifiers produced by the codec and gets free-form hint
//! text back; everything else about the oracle is a black box.

use std::fmt;

/// Fixed evaluation-depth and performance settings an oracle implementation
/// applies before every analysis. The engine never varies these per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub plies: u8,
    pub threads: usize,
    pub cache_size: usize,
    pub timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            plies: 3,
            threads: 16,
            cache_size: 65536,
            timeout_secs: 25,
        }
    }
}

/// Oracle failures are recoverable by contract: the router degrades to the
/// next safest action instead of stalling the turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    Unavailable(String),
    Timeout,
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleError::Unavailable(reason) => write!(f, "oracle unavailable: {reason}"),
            OracleError::Timeout => write!(f, "oracle timed out"),
        }
    }
}

impl std::error::Error for OracleError {}

pub trait Oracle {
    /// Runs one analysis for the encoded position and decision identifiers,
    /// returning the oracle's raw textual reply. Blocks until the reply or
    /// the configured timeout.
    fn analyze(&mut self, position_id: &str, match_id: &str) -> Result<String, OracleError>;
}
