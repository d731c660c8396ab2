use serde::{Deserialize, Serialize};

use super::orchestrator::CompilerOutput;
use super::registry::RULESET_VERSION;

/// Outputs are only reusable under the ruleset that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheKey {
    pub input_hash: String,
    pub ruleset_version: String,
}

impl CacheKey {
    pub fn current(input_hash: impl Into<String>) -> Self {
        Self {
            input_hash: input_hash.into(),
            ruleset_version: RULESET_VERSION.to_string(),
        }
    }

    pub fn for_output(output: &CompilerOutput) -> Self {
        Self {
            input_hash: output.trace.input_hash.clone(),
            ruleset_version: output.trace.ruleset_version.clone(),
        }
    }
}

/// Storage abstraction for compiled outputs so the service can be exercised in isolation.
pub trait TraceCache: Send + Sync {
    /// Returns true when an existing entry was replaced.
    fn store(&self, key: CacheKey, output: CompilerOutput) -> Result<bool, CacheError>;
    fn fetch(&self, key: &CacheKey) -> Result<Option<CompilerOutput>, CacheError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}
