//! Handles requests to register a new user.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use email_address::EmailAddress;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{PasswordHash, UserResponse, ValidatedPassword, create_user, set_auth_cookie},
    db::lock_connection,
};

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The bcrypt cost used when hashing new passwords.
    pub password_hash_cost: u32,
    /// The database connection for storing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// The details sent by the client to create an account.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterData {
    /// The email address to log in with.
    pub email: String,
    /// The password to log in with.
    pub password: String,
}

/// Create a new user and log them in.
///
/// Emails are trimmed and lowercased before they are stored.
///
/// # Errors
///
/// Returns:
/// - [Error::InvalidEmail] if the email address is malformed,
/// - [Error::TooWeak] if the password is too easy to guess,
/// - [Error::DuplicateEmail] if the email address is already registered.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Json(user_data): Json<RegisterData>,
) -> Result<(StatusCode, PrivateCookieJar, Json<UserResponse>), Error> {
    let email_string = user_data.email.trim().to_lowercase();
    let email = EmailAddress::from_str(&email_string)
        .map_err(|_| Error::InvalidEmail(user_data.email.clone()))?;

    let password = ValidatedPassword::new(&user_data.password, &[email_string.as_str()])?;
    let password_hash = PasswordHash::new(password, state.password_hash_cost)?;

    let user = {
        let connection = lock_connection(&state.db_connection)?;
        create_user(email, password_hash, &connection)?
    };
    tracing::info!("Registered user {}", user.id);

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration)?;

    Ok((StatusCode::CREATED, jar, Json(UserResponse::from(&user))))
}
