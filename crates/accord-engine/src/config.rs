//! Engine configuration

use std::time::Duration;

/// Configuration for the contract engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Bounded timeout for a single proof-anchoring attempt
    pub anchor_timeout: Duration,

    /// How long a membership invitation stays valid
    pub invitation_ttl: Duration,

    /// Maximum accepted comment length in bytes
    pub max_comment_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            anchor_timeout: Duration::from_secs(10),
            invitation_ttl: Duration::from_secs(7 * 24 * 60 * 60), // 7 days
            max_comment_length: 4000,
        }
    }
}
