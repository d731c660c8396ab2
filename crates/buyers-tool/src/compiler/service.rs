use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::cache::{CacheError, CacheKey, TraceCache};
use super::domain::BuyerInput;
use super::orchestrator::{compile, CompilerOptions, CompilerOutput};
use super::validation::{validate_request, InputError};

/// Request body accepted by the evaluation endpoint and CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub input: BuyerInput,
    pub options: CompilerOptions,
}

/// Service composing intake validation, the compiler, and the output cache.
pub struct EvaluationService<C> {
    cache: Arc<C>,
}

impl<C> EvaluationService<C>
where
    C: TraceCache + 'static,
{
    pub fn new(cache: Arc<C>) -> Self {
        Self { cache }
    }

    /// Validate, compile, and cache a single request.
    pub fn evaluate(
        &self,
        request: EvaluationRequest,
    ) -> Result<CompilerOutput, EvaluationServiceError> {
        let EvaluationRequest { input, options } = request;
        validate_request(&input, &options)?;

        let output = compile(&input, &options);
        let key = CacheKey::for_output(&output);
        let replaced = self.cache.store(key, output.clone())?;

        info!(
            input_hash = %output.trace.input_hash,
            recommendation = output.verdict.recommendation.label(),
            replaced,
            "buyer input evaluated"
        );
        Ok(output)
    }

    /// Most recent output for an input hash under the current ruleset.
    pub fn lookup(&self, input_hash: &str) -> Result<CompilerOutput, EvaluationServiceError> {
        let key = CacheKey::current(input_hash);
        self.cache
            .fetch(&key)?
            .ok_or_else(|| EvaluationServiceError::NotFound(input_hash.to_string()))
    }
}

/// Error raised by the evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationServiceError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("no evaluation cached for input hash {0}")]
    NotFound(String),
}
