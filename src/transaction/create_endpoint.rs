use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, CategoryName, Error, Money,
    auth::UserID,
    timezone::local_today,
    transaction::{NewTransaction, SQLiteTransactionStore, Transaction, TransactionStore},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    pub store: SQLiteTransactionStore,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: SQLiteTransactionStore::from_ref(state),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The request body for creating a transaction.
///
/// `amount` may be a JSON number or string. `date` defaults to today.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub date: Option<Date>,
}

/// A route handler for recording a new transaction, responds with the stored transaction.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<TransactionForm>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let amount = Money::from_decimal(form.amount)?;
    let category = CategoryName::new(&form.category)?;
    let date = match form.date {
        Some(date) => date,
        None => local_today(&state.local_timezone)
            .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?,
    };

    let transaction = state.store.create(
        user_id,
        NewTransaction {
            description: form.description,
            amount,
            category,
            date,
        },
    )?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use time::OffsetDateTime;

    use crate::{
        endpoints,
        test_utils::{get_test_server, register},
    };

    #[tokio::test]
    async fn create_transaction_returns_created() {
        let server = get_test_server();
        let cookie = register(&server, "foo@bar.baz").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .json(&json!({
                "description": "Weekly groceries",
                "amount": 120.5,
                "category": "Food",
                "date": "2025-10-01"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["description"], "Weekly groceries");
        assert_eq!(body["amount"], "120.50");
        assert_eq!(body["category"], "Food");
        assert_eq!(body["date"], "2025-10-01");
        assert!(body["id"].is_i64());
        assert!(body.get("owner_id").is_none());
    }

    #[tokio::test]
    async fn date_defaults_to_today() {
        let server = get_test_server();
        let cookie = register(&server, "foo@bar.baz").await;
        let before = OffsetDateTime::now_utc().date().to_string();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .json(&json!({ "description": "Bus", "amount": "4.20", "category": "Transport" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let after = OffsetDateTime::now_utc().date().to_string();
        let date = response.json::<Value>()["date"].as_str().unwrap().to_owned();
        assert!(date == before || date == after);
    }

    #[tokio::test]
    async fn negative_amount_is_bad_request() {
        let server = get_test_server();
        let cookie = register(&server, "foo@bar.baz").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .json(&json!({ "description": "Refund", "amount": -5, "category": "Food" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn too_many_decimal_places_is_bad_request() {
        let server = get_test_server();
        let cookie = register(&server, "foo@bar.baz").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .json(&json!({ "description": "Fuel", "amount": "12.345", "category": "Transport" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn blank_category_is_bad_request() {
        let server = get_test_server();
        let cookie = register(&server, "foo@bar.baz").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .json(&json!({ "description": "Mystery", "amount": 1, "category": "  " }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["error"],
            "category cannot be empty"
        );
    }

    #[tokio::test]
    async fn create_requires_log_in() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({ "description": "Bus", "amount": 1, "category": "Transport" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
