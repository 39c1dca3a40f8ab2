//! Protocol instance configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TsspvError};

/// Threshold parameters of one protocol instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Number of players `n`
    pub players: usize,

    /// Reconstruction threshold `k`
    pub threshold: usize,

    /// Upper bound `f` on the number of leaked shares
    pub collusion: usize,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            players: 8,
            threshold: 5,
            collusion: 2,
        }
    }
}

impl ThresholdConfig {
    /// Create a new configuration
    pub fn new(players: usize, threshold: usize, collusion: usize) -> Self {
        Self {
            players,
            threshold,
            collusion,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.threshold < 2 || self.threshold > self.players {
            return Err(TsspvError::InvalidThreshold {
                threshold: self.threshold,
                players: self.players,
            });
        }
        // threshold >= 2 here, so the subtraction cannot underflow
        if self.collusion >= self.threshold - 1 {
            return Err(TsspvError::InvalidCollusionBound {
                collusion: self.collusion,
                threshold: self.threshold,
            });
        }
        Ok(())
    }

    /// Degree `t = k - 1` of the evaluation function
    pub fn degree(&self) -> usize {
        self.threshold - 1
    }

    /// Number of dummy shares padding each tracing query (`k - f - 1`)
    pub fn filler_size(&self) -> usize {
        self.threshold - self.collusion - 1
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
