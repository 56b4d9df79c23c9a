use sqlx::PgPool;

use crate::{
    error::AccountError,
    models::{Account, NewAccount, Profile, ProfileAttributes},
};

/// Persistence for shopper accounts and their profile attributes
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts a new account. A taken email yields `AccountError::DuplicateEmail`.
    async fn insert(&self, account: NewAccount) -> Result<Account, AccountError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError>;

    /// Profile attributes of an account, `AccountError::NotFound` if it does not exist
    async fn profile(&self, user_id: i32) -> Result<Profile, AccountError>;

    /// Overwrites all six attributes in a single statement
    async fn update_profile(
        &self,
        user_id: i32,
        attributes: ProfileAttributes,
    ) -> Result<(), AccountError>;
}

#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_insert_error(err: sqlx::Error) -> AccountError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AccountError::DuplicateEmail
        }
        _ => AccountError::Storage(err),
    }
}

#[async_trait::async_trait]
impl AccountStore for PgAccountStore {
    async fn insert(&self, account: NewAccount) -> Result<Account, AccountError> {
        // Uniqueness is enforced by the constraint, not a pre-check, so two
        // concurrent signups with one email cannot both succeed.
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    async fn profile(&self, user_id: i32) -> Result<Profile, AccountError> {
        sqlx::query_as::<_, Profile>(
            r#"
            SELECT gender,
                   age_group,
                   shopping_lvl AS shopping_level,
                   is_student,
                   pref_shop_hour AS hour_of_click,
                   pref_shop_day AS day_of_click
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AccountError::NotFound)
    }

    async fn update_profile(
        &self,
        user_id: i32,
        attributes: ProfileAttributes,
    ) -> Result<(), AccountError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET gender = $1,
                age_group = $2,
                shopping_lvl = $3,
                is_student = $4,
                pref_shop_hour = $5,
                pref_shop_day = $6
            WHERE user_id = $7
            "#,
        )
        .bind(attributes.gender)
        .bind(attributes.age_group)
        .bind(attributes.shopping_level)
        .bind(attributes.is_student)
        .bind(attributes.hour_of_click)
        .bind(attributes.day_of_click)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound);
        }

        Ok(())
    }
}
