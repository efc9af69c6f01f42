#![allow(missing_docs)]

use axum::http::StatusCode;
use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, auth::COOKIE_TOKEN, build_router, endpoints};

pub(crate) const TEST_PASSWORD: &str = "averystrongandsecurepassword";

/// A server running the full app against an in-memory database.
pub(crate) fn get_test_server() -> TestServer {
    let connection = Connection::open_in_memory().unwrap();
    let mut state = AppState::new(connection, "42", "Etc/UTC").unwrap();
    state.password_hash_cost = 4;

    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

/// Register a user with `email` and return their auth cookie.
pub(crate) async fn register(server: &TestServer, email: &str) -> Cookie<'static> {
    let response = server
        .post(endpoints::USERS)
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .await;

    response.assert_status(StatusCode::CREATED);
    response.cookie(COOKIE_TOKEN)
}
