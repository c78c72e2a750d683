//! Donation API endpoint

use api_types::donation::DonateRequest;
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::{DonateCmd, PrizeCash};

use crate::{ServerError, server::ServerState, user};

/// Donates prizecash from the authenticated user to `payload.to`.
///
/// Responds `200` with an empty body on success.
pub async fn donate(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<DonateRequest>,
) -> Result<StatusCode, ServerError> {
    let amount = PrizeCash::from_number(payload.amount)?;
    let cmd = DonateCmd::new(user.id.as_str(), payload.to, amount);

    match state.engine.donate(cmd).await {
        Ok(_) => Ok(StatusCode::OK),
        Err(err) => {
            tracing::warn!(user_id = %user.id, amount = %amount, "donation rejected: {err}");
            Err(err.into())
        }
    }
}
