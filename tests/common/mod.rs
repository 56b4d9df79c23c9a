//! Helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use shoprec_api::{
    db::{AccountStore, LookupStore, LookupTable},
    error::AccountError,
    models::{Account, NewAccount, Profile, ProfileAttributes},
    routes::{create_router, AppState},
    services::HostedModel,
};

/// Lowest cost bcrypt accepts, keeps tests fast
pub const TEST_BCRYPT_COST: u32 = 4;

/// Account store backed by a vector, enforcing unique emails like the real table
#[derive(Default)]
pub struct InMemoryAccounts {
    accounts: Mutex<Vec<Account>>,
}

#[async_trait::async_trait]
impl AccountStore for InMemoryAccounts {
    async fn insert(&self, new: NewAccount) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.lock().await;
        if accounts.iter().any(|a| a.email == new.email) {
            return Err(AccountError::DuplicateEmail);
        }

        let account = Account {
            user_id: accounts.len() as i32 + 1,
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            gender: None,
            age_group: None,
            shopping_lvl: None,
            is_student: None,
            pref_shop_hour: None,
            pref_shop_day: None,
            created_at: Utc::now(),
        };
        accounts.push(account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn profile(&self, user_id: i32) -> Result<Profile, AccountError> {
        let accounts = self.accounts.lock().await;
        accounts
            .iter()
            .find(|a| a.user_id == user_id)
            .map(Account::profile)
            .ok_or(AccountError::NotFound)
    }

    async fn update_profile(
        &self,
        user_id: i32,
        attributes: ProfileAttributes,
    ) -> Result<(), AccountError> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .iter_mut()
            .find(|a| a.user_id == user_id)
            .ok_or(AccountError::NotFound)?;

        account.gender = Some(attributes.gender);
        account.age_group = Some(attributes.age_group);
        account.shopping_lvl = Some(attributes.shopping_level);
        account.is_student = Some(attributes.is_student);
        account.pref_shop_hour = Some(attributes.hour_of_click);
        account.pref_shop_day = Some(attributes.day_of_click);
        Ok(())
    }
}

/// Brand and category tables held in memory; `unreachable` simulates a dead database
#[derive(Default)]
pub struct StaticLookups {
    pub brands: HashMap<i64, String>,
    pub categories: HashMap<i64, String>,
    pub unreachable: bool,
}

#[async_trait::async_trait]
impl LookupStore for StaticLookups {
    async fn names(
        &self,
        table: LookupTable,
        ids: &[i64],
    ) -> Result<HashMap<i64, String>, sqlx::Error> {
        if self.unreachable {
            return Err(sqlx::Error::PoolTimedOut);
        }

        let source = match table {
            LookupTable::Brand => &self.brands,
            LookupTable::Category => &self.categories,
        };
        Ok(ids
            .iter()
            .filter_map(|id| source.get(id).map(|name| (*id, name.clone())))
            .collect())
    }
}

#[derive(Clone)]
struct UpstreamState {
    status: StatusCode,
    body: String,
    received: Arc<Mutex<Vec<Value>>>,
}

async fn predict(State(state): State<UpstreamState>, Json(body): Json<Value>) -> (StatusCode, String) {
    state.received.lock().await.push(body);
    (state.status, state.body)
}

/// Fake of the hosted model listening on a random local port
pub struct FakeUpstream {
    pub url: String,
    pub received: Arc<Mutex<Vec<Value>>>,
}

impl FakeUpstream {
    pub async fn start(status: StatusCode, body: impl Into<String>) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/predict", post(predict))
            .with_state(UpstreamState {
                status,
                body: body.into(),
                received: received.clone(),
            });

        let url = serve(app).await;
        Self {
            url: format!("{}/predict", url),
            received,
        }
    }

    pub fn model(&self) -> HostedModel {
        HostedModel::new(self.url.clone(), Duration::from_secs(5)).unwrap()
    }
}

/// Serves `app` on an ephemeral port and returns its base URL
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", address)
}

/// Upstream body with one item per `(brand, cate_id, probability)` tuple
pub fn upstream_body(items: &[(i64, i64, f64)]) -> String {
    let items: Vec<Value> = items
        .iter()
        .map(|(brand, cate_id, probability)| {
            json!({
                "brand": brand,
                "cate_id": cate_id,
                "price": 49.9,
                "probability": probability,
            })
        })
        .collect();

    json!({
        "top_10_recommendations": items,
        "total_products_scored": 5000,
    })
    .to_string()
}

pub fn app(lookups: StaticLookups, upstream: &FakeUpstream) -> Router {
    let state = AppState::new(
        Arc::new(InMemoryAccounts::default()),
        Arc::new(lookups),
        Arc::new(upstream.model()),
        TEST_BCRYPT_COST,
    );
    create_router(state)
}

pub fn profile_request(use_gen_model: Value) -> Value {
    json!({
        "gender": 1,
        "ageGroup": 3,
        "shoppingLevel": 2,
        "isStudent": 0,
        "hourOfClick": 14,
        "dayOfClick": 5,
        "useGenModel": use_gen_model,
    })
}
