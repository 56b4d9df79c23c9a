//! Form field rules applied before a request leaves the client.
//!
//! Each validator stops at the first failing rule, so only one message is
//! ever reported per field.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Email is required")]
    EmailRequired,
    #[error("Please enter a valid email address")]
    EmailInvalid,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Password must contain an uppercase letter")]
    PasswordNoUppercase,
    #[error("Password must contain a lowercase letter")]
    PasswordNoLowercase,
    #[error("Password must contain a number")]
    PasswordNoDigit,
    #[error("Name is required")]
    NameRequired,
    #[error("Name must be 2-50 characters and contain only letters, spaces, or hyphens")]
    NameInvalid,
}

/// Strict applies on signup; login only needs a non-empty password
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordMode {
    Strict,
    Lenient,
}

const MIN_PASSWORD_LEN: usize = 8;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// One `@`, no whitespace, and a dot in the domain with text on both sides
pub fn validate_email(email: &str) -> Result<(), FieldError> {
    if is_blank(email) {
        return Err(FieldError::EmailRequired);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(FieldError::EmailInvalid);
    };

    let well_formed = !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && !domain.contains('@')
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());

    if well_formed {
        Ok(())
    } else {
        Err(FieldError::EmailInvalid)
    }
}

pub fn validate_password(password: &str, mode: PasswordMode) -> Result<(), FieldError> {
    if is_blank(password) {
        return Err(FieldError::PasswordRequired);
    }
    if mode == PasswordMode::Lenient {
        return Ok(());
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FieldError::PasswordTooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(FieldError::PasswordNoUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(FieldError::PasswordNoLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(FieldError::PasswordNoDigit);
    }

    Ok(())
}

/// 2 to 50 characters drawn from ASCII letters, whitespace and hyphens
pub fn validate_name(name: &str) -> Result<(), FieldError> {
    if is_blank(name) {
        return Err(FieldError::NameRequired);
    }

    let len = name.chars().count();
    let allowed = name
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || c == '-');

    if allowed && (2..=50).contains(&len) {
        Ok(())
    } else {
        Err(FieldError::NameInvalid)
    }
}
