//! Optional narrative enrichment of an analysis.
//!
//! The provider sits behind [`NarrativeEnricher`]; the engine ships only the
//! [`DisabledEnricher`] null object. Whatever the provider does, the
//! rule-based score, grade and confidence are never changed by it.

use crate::grade::Grade;
use crate::model::{Category, RiskTier};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// What the provider gets to see: the rule-based outcome, not the raw input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentRequest {
    pub product_name: String,
    pub brand: Option<String>,
    pub category: Category,
    pub ingredients: Vec<String>,
    pub score: u8,
    pub grade: Grade,
    pub risk_tier: RiskTier,
    /// Explanation lines of the classifier.
    pub highlights: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("enrichment timed out after {0:?}")]
    Timeout(Duration),

    #[error("enrichment provider unavailable")]
    Unavailable,

    #[error("enrichment failed: {0}")]
    Failed(String),
}

pub type EnrichmentFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, EnrichmentError>> + Send + 'a>>;

/// Produces a short narrative for an already scored product.
pub trait NarrativeEnricher: Send + Sync {
    fn enrich<'a>(&'a self, request: &'a EnrichmentRequest) -> EnrichmentFuture<'a>;

    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;

    /// False for the null object, so callers can skip the call entirely.
    fn is_enabled(&self) -> bool {
        true
    }
}

pub type DynEnricher = Arc<dyn NarrativeEnricher>;

/// Null object used when no provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledEnricher;

impl NarrativeEnricher for DisabledEnricher {
    fn enrich<'a>(&'a self, _request: &'a EnrichmentRequest) -> EnrichmentFuture<'a> {
        Box::pin(async { Err(EnrichmentError::Unavailable) })
    }

    fn name(&self) -> &'static str {
        "disabled"
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Run the provider under a deadline. Dropping the returned future cancels the call.
pub async fn enrich_with_timeout(
    enricher: &dyn NarrativeEnricher,
    request: &EnrichmentRequest,
    timeout: Duration,
) -> Result<String, EnrichmentError> {
    match tokio::time::timeout(timeout, enricher.enrich(request)).await {
        Ok(Ok(text)) if text.trim().is_empty() => {
            Err(EnrichmentError::Failed("empty narrative".into()))
        }
        Ok(result) => result,
        Err(_) => Err(EnrichmentError::Timeout(timeout)),
    }
}
