use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use crate::{
    Error,
    auth::UserID,
    database_id::TransactionId,
    date_range::DateRangeQuery,
    transaction::{SQLiteTransactionStore, Transaction, TransactionStore},
};

/// A route handler for listing the user's transactions, newest first.
///
/// The optional `from` and `to` query parameters limit the results to an inclusive date range.
pub async fn list_transactions_endpoint(
    State(store): State<SQLiteTransactionStore>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let transactions = match query.into_range()? {
        Some(date_range) => store.list_in_range(user_id, date_range)?,
        None => store.list(user_id)?,
    };

    Ok(Json(transactions))
}

/// A route handler for getting a single transaction.
pub async fn get_transaction_endpoint(
    State(store): State<SQLiteTransactionStore>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    store.get(user_id, transaction_id).map(Json)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_test_server, register},
    };

    async fn create(server: &TestServer, cookie: &Cookie<'static>, amount: &str, date: &str) -> i64 {
        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .json(&json!({
                "description": "Lunch",
                "amount": amount,
                "category": "Food",
                "date": date
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        response.json::<Value>()["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn list_returns_only_own_transactions() {
        let server = get_test_server();
        let alice = register(&server, "alice@example.com").await;
        let bob = register(&server, "bob@example.com").await;
        let first = create(&server, &alice, "10", "2025-10-01").await;
        let second = create(&server, &alice, "20", "2025-10-02").await;
        create(&server, &bob, "30", "2025-10-03").await;

        let response = server.get(endpoints::TRANSACTIONS).add_cookie(alice).await;

        response.assert_status_ok();
        let ids: Vec<i64> = response
            .json::<Vec<Value>>()
            .iter()
            .map(|transaction| transaction["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn list_filters_by_date_range() {
        let server = get_test_server();
        let cookie = register(&server, "alice@example.com").await;
        create(&server, &cookie, "10", "2025-09-30").await;
        let october = create(&server, &cookie, "20", "2025-10-15").await;
        create(&server, &cookie, "30", "2025-11-01").await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("from", "2025-10-01")
            .add_query_param("to", "2025-10-31")
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        let transactions = response.json::<Vec<Value>>();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0]["id"].as_i64(), Some(october));
    }

    #[tokio::test]
    async fn reversed_date_range_is_bad_request() {
        let server = get_test_server();
        let cookie = register(&server, "alice@example.com").await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("from", "2025-10-31")
            .add_query_param("to", "2025-10-01")
            .add_cookie(cookie)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_other_users_transaction_is_forbidden() {
        let server = get_test_server();
        let alice = register(&server, "alice@example.com").await;
        let bob = register(&server, "bob@example.com").await;
        let id = create(&server, &alice, "10", "2025-10-01").await;

        server
            .get(&format_endpoint(endpoints::TRANSACTION, id))
            .add_cookie(alice)
            .await
            .assert_status_ok();
        server
            .get(&format_endpoint(endpoints::TRANSACTION, id))
            .add_cookie(bob)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}
