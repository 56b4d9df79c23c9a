use std::sync::Arc;

use validator::Validate;

use crate::{
    db::AccountStore,
    error::{AppError, AppResult},
    models::{Account, NewAccount, SignupRequest},
};

/// Signup and login against the account store
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    /// Registers a new account with a salted bcrypt hash of the password
    pub async fn signup(&self, request: SignupRequest) -> AppResult<Account> {
        request
            .validate()
            .map_err(|_| AppError::Validation("Name, email and password are required".to_string()))?;

        let cost = self.bcrypt_cost;
        let password = request.password;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Hashing(e.to_string()))?
            .map_err(|e| AppError::Hashing(e.to_string()))?;

        let account = self
            .store
            .insert(NewAccount {
                name: request.name,
                email: request.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = account.user_id, "Account created");

        Ok(account)
    }

    /// Checks credentials and returns the matching account.
    ///
    /// An unknown email and a wrong password both produce
    /// `AppError::InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Account> {
        let Some(account) = self.store.find_by_email(email).await? else {
            tracing::info!("Login rejected");
            return Err(AppError::InvalidCredentials);
        };

        let password = password.to_string();
        let hash = account.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::Hashing(e.to_string()))?
            .map_err(|e| AppError::Hashing(e.to_string()))?;

        if !matches {
            tracing::info!("Login rejected");
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = account.user_id, "Login successful");
        Ok(account)
    }
}
