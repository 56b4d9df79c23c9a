use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A registered shopper as stored in the `users` table
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Account {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub gender: Option<i32>,
    pub age_group: Option<i32>,
    pub shopping_lvl: Option<i32>,
    pub is_student: Option<i32>,
    pub pref_shop_hour: Option<i32>,
    pub pref_shop_day: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Profile attributes of this account; unset until the first profile save
    pub fn profile(&self) -> Profile {
        Profile {
            gender: self.gender,
            age_group: self.age_group,
            shopping_level: self.shopping_lvl,
            is_student: self.is_student,
            hour_of_click: self.pref_shop_hour,
            day_of_click: self.pref_shop_day,
        }
    }
}

/// Values required to insert a new account
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Body of `POST /api/signup`
///
/// Only presence is checked here; format rules live with the client.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

/// Body of `POST /api/login`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// The six profile attributes as exchanged with clients.
///
/// Every field is optional: a stored profile is all-null until first saved,
/// and an incoming update may omit fields (which the profile service rejects).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub gender: Option<i32>,
    pub age_group: Option<i32>,
    pub shopping_level: Option<i32>,
    pub is_student: Option<i32>,
    pub hour_of_click: Option<i32>,
    pub day_of_click: Option<i32>,
}

/// A fully populated profile, ready to be written in one update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileAttributes {
    pub gender: i32,
    pub age_group: i32,
    pub shopping_level: i32,
    pub is_student: i32,
    pub hour_of_click: i32,
    pub day_of_click: i32,
}

impl Profile {
    /// Returns the attributes if all six are present.
    ///
    /// Zero is a legitimate value for every attribute; only `None` counts as missing.
    pub fn complete(&self) -> Option<ProfileAttributes> {
        Some(ProfileAttributes {
            gender: self.gender?,
            age_group: self.age_group?,
            shopping_level: self.shopping_level?,
            is_student: self.is_student?,
            hour_of_click: self.hour_of_click?,
            day_of_click: self.day_of_click?,
        })
    }
}

impl From<ProfileAttributes> for Profile {
    fn from(attrs: ProfileAttributes) -> Self {
        Self {
            gender: Some(attrs.gender),
            age_group: Some(attrs.age_group),
            shopping_level: Some(attrs.shopping_level),
            is_student: Some(attrs.is_student),
            hour_of_click: Some(attrs.hour_of_click),
            day_of_click: Some(attrs.day_of_click),
        }
    }
}
