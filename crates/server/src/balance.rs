use api_types::balance::Balance;
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState, user};

/// Cash balance and redeemable prizecash of the authenticated user.
pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Balance>, ServerError> {
    let snapshot = state.engine.prize_cash_balance(&user.id).await?;

    Ok(Json(Balance {
        cash_balance: snapshot.cash_balance.as_number(),
        redeemable: snapshot.redeemable.as_number(),
    }))
}
