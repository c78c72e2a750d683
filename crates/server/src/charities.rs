//! Charity API endpoints

use api_types::charity::{CharityTotal, CharityView};
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{ServerError, server::ServerState};

pub async fn list(State(state): State<ServerState>) -> Json<Vec<CharityView>> {
    let charities = state
        .engine
        .charities()
        .list()
        .into_iter()
        .map(|c| CharityView {
            id: c.id.clone(),
            name: c.name.clone(),
            website: c.website.clone(),
            description: c.description.clone(),
        })
        .collect();

    Json(charities)
}

pub async fn total(
    Path(id): Path<String>,
    State(state): State<ServerState>,
) -> Result<Json<CharityTotal>, ServerError> {
    let totals = state.engine.charity_totals(&id).await?;

    Ok(Json(CharityTotal {
        charity_id: totals.charity_id,
        total: totals.total.as_number(),
        donors: totals.donors,
    }))
}
