//! Typed client for the account and recommendation API.
//!
//! Mirrors what the browser UI does: validate form input locally, keep the
//! session returned by login, and attach the session's user id to profile calls.

use std::sync::Arc;

use reqwest::{Client as HttpClient, Response, StatusCode};
use serde_json::json;

use crate::{
    models::{EnrichedRecommendation, Profile, ProfileAttributes, RecommendationResponse},
    session::{Session, SessionStore},
    validation::{validate_email, validate_name, validate_password, FieldError, PasswordMode},
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Field(#[from] FieldError),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Session storage failed: {0}")]
    Session(#[from] anyhow::Error),
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody {
    user_id: i32,
    name: String,
}

pub struct ApiClient {
    http_client: HttpClient,
    base_url: String,
    sessions: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `http://localhost:3000/api`
    pub fn new(base_url: impl Into<String>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            sessions,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<(), ClientError> {
        let name = name.trim();
        let email = email.trim();
        validate_name(name)?;
        validate_email(email)?;
        validate_password(password, PasswordMode::Strict)?;

        let response = self
            .http_client
            .post(self.url("/signup"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    /// Logs in and stores the resulting session
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let email = email.trim();
        validate_email(email)?;
        validate_password(password, PasswordMode::Lenient)?;

        let response = self
            .http_client
            .post(self.url("/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let body: LoginBody = ensure_success(response).await?.json().await?;
        let session = Session {
            user_id: body.user_id,
            name: body.name,
        };
        self.sessions.save(&session)?;

        Ok(session)
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.sessions.clear()?;
        Ok(())
    }

    /// The current session, or `ClientError::NotLoggedIn`
    pub fn require_session(&self) -> Result<Session, ClientError> {
        self.sessions.load().ok_or(ClientError::NotLoggedIn)
    }

    /// Saved profile of the logged-in user; `None` when the account is gone
    pub async fn load_profile(&self) -> Result<Option<Profile>, ClientError> {
        let session = self.require_session()?;

        let response = self
            .http_client
            .get(self.url(&format!("/profile/{}", session.user_id)))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let profile = ensure_success(response).await?.json().await?;
        Ok(Some(profile))
    }

    pub async fn save_profile(&self, attributes: ProfileAttributes) -> Result<(), ClientError> {
        let session = self.require_session()?;

        let response = self
            .http_client
            .put(self.url(&format!("/profile/{}", session.user_id)))
            .json(&Profile::from(attributes))
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    pub async fn recommend(
        &self,
        attributes: ProfileAttributes,
        use_gen_model: bool,
    ) -> Result<RecommendationResponse, ClientError> {
        self.require_session()?;

        let response = self
            .http_client
            .post(self.url("/recommend"))
            .json(&json!({
                "gender": attributes.gender,
                "ageGroup": attributes.age_group,
                "shoppingLevel": attributes.shopping_level,
                "isStudent": attributes.is_student,
                "hourOfClick": attributes.hour_of_click,
                "dayOfClick": attributes.day_of_click,
                "useGenModel": use_gen_model,
            }))
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }
}

/// Turns a non-2xx response into `ClientError::Api` using its `error` field
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| v["error"].as_str().map(str::to_string))
        .unwrap_or(text);

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

/// One-line rendering of a recommendation card
pub fn render_card(rec: &EnrichedRecommendation) -> String {
    let brand = if rec.brand_name.is_empty() {
        format!("Brand ID: {}", rec.brand_id)
    } else {
        rec.brand_name.clone()
    };
    let category = if rec.category_name.is_empty() {
        format!("Category ID: {}", rec.category_id)
    } else {
        rec.category_name.clone()
    };

    format!(
        "#{} {} | {} | ¥{:.2} ({}%)",
        rec.rank, brand, category, rec.price, rec.confidence
    )
}
