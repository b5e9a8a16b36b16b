use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::log::OrderLogEntry;
use crate::routes::auth::require_bearer;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 1000;

#[derive(Deserialize)]
pub struct OrdersQuery {
    pub limit: Option<usize>,
}

/// GET /api/v1/orders
///
/// Most recent entries of the advisory order log, newest first.
/// Requires `Authorization: Bearer <ORDERS_API_TOKEN>`.
pub async fn handle_list_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<OrdersQuery>,
) -> Result<Json<Vec<OrderLogEntry>>, AppError> {
    require_bearer(&headers, state.orders_api_token.as_deref())?;
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok(Json(state.order_log.recent(limit)))
}

/// GET /api/v1/orders/:id
pub async fn handle_get_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderLogEntry>, AppError> {
    require_bearer(&headers, state.orders_api_token.as_deref())?;
    state
        .order_log
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))
}
