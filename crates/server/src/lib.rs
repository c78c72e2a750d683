use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, app, run_with_listener};

mod balance;
mod charities;
mod donations;
mod server;
mod txns;
mod user;

pub mod types {
    pub mod donation {
        pub use api_types::donation::DonateRequest;
    }

    pub mod balance {
        pub use api_types::balance::Balance;
    }

    pub mod charity {
        pub use api_types::charity::{CharityTotal, CharityView};
    }

    pub mod txn {
        pub use api_types::txn::{TxnList, TxnView};
    }
}

pub enum ServerError {
    Engine(EngineError),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InsufficientBalance | EngineError::InsufficientRedeemable(_) => {
            StatusCode::FORBIDDEN
        }
        EngineError::BelowMinimum(_) | EngineError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InsufficientFunds(_)
        | EngineError::InvalidTxn(_)
        | EngineError::InvalidId(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let ServerError::Engine(err) = self;
        let status = status_for_engine_error(&err);
        let error = message_for_engine_error(err);

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
