use api_types::txn::{TxnList, TxnView};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{ServerError, server::ServerState, user};

fn map_txn(txn: engine::Txn) -> TxnView {
    TxnView {
        id: txn.id,
        category: txn.category.as_str().to_string(),
        from_type: txn.from_type.as_str().to_string(),
        from_id: txn.from_id,
        to_type: txn.to_type.as_str().to_string(),
        to_id: txn.to_id,
        amount: txn.amount.as_number(),
        token: txn.token.as_str().to_string(),
        created_at: txn.created_at,
    }
}

/// Ledger entries of the authenticated user, newest first.
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<TxnList>,
) -> Result<Json<Vec<TxnView>>, ServerError> {
    let txns = state.engine.list_txns(&user.id, query.limit).await?;

    Ok(Json(txns.into_iter().map(map_txn).collect()))
}
