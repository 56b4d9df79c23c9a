use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::{
    config::Config,
    db::{AccountStore, LookupStore, PgAccountStore, PgLookupStore},
    services::{AccountService, HostedModel, ProfileService, RecommendationModel, Recommender},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub profiles: ProfileService,
    pub recommender: Recommender,
}

impl AppState {
    /// Wires the services over the given collaborators
    pub fn new(
        account_store: Arc<dyn AccountStore>,
        lookups: Arc<dyn LookupStore>,
        model: Arc<dyn RecommendationModel>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            accounts: AccountService::new(account_store.clone(), bcrypt_cost),
            profiles: ProfileService::new(account_store),
            recommender: Recommender::new(model, lookups),
        }
    }

    /// Production wiring: Postgres stores and the hosted model
    pub fn from_config(pool: PgPool, config: &Config) -> anyhow::Result<Self> {
        let model = HostedModel::new(
            config.recommendation_api_url.clone(),
            Duration::from_secs(config.recommendation_timeout_secs),
        )?;

        Ok(Self::new(
            Arc::new(PgAccountStore::new(pool.clone())),
            Arc::new(PgLookupStore::new(pool)),
            Arc::new(model),
            config.bcrypt_cost,
        ))
    }
}
