use std::sync::Arc;

use crate::{
    db::AccountStore,
    error::{AppError, AppResult},
    models::Profile,
};

/// Reads and writes the six profile attributes of an account
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn AccountStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    pub async fn get_profile(&self, user_id: i32) -> AppResult<Profile> {
        Ok(self.store.profile(user_id).await?)
    }

    /// Overwrites all attributes at once; every one must be present
    pub async fn update_profile(&self, user_id: i32, profile: Profile) -> AppResult<()> {
        let attributes = profile
            .complete()
            .ok_or_else(|| AppError::Validation("All profile fields are required".to_string()))?;

        if !(0..=23).contains(&attributes.hour_of_click) {
            return Err(AppError::Validation(
                "hourOfClick must be between 0 and 23".to_string(),
            ));
        }

        self.store.update_profile(user_id, attributes).await?;

        tracing::info!(user_id = user_id, "Profile updated");
        Ok(())
    }
}
