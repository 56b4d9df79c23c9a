//! Recommendation model abstraction
//!
//! The scoring model is an opaque remote service behind this trait, so the
//! orchestrator runs the same against in-process fakes.

use crate::{
    error::RecommendError,
    models::{ModelInput, ModelOutput},
};

pub mod hosted;

pub use hosted::HostedModel;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationModel: Send + Sync {
    /// Scores the catalogue for one normalized profile.
    ///
    /// Attempted once; a non-2xx status is `RecommendError::Upstream` and a body
    /// that does not match the expected shape is `RecommendError::MalformedResponse`.
    async fn predict(&self, input: &ModelInput) -> Result<ModelOutput, RecommendError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
