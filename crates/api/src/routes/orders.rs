//! Order placement and order history endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use common::OrderId;
use domain::{
    LineItemRequest, OrderPlacementRequest, OrderPlacementService, OrderQueryService, OrderSummary,
};
use order_store::{OrderRepository, OrderStatus};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::extract_user_id;

/// Shared application state accessible from all handlers.
pub struct AppState<R: OrderRepository> {
    pub placement: OrderPlacementService<R>,
    pub queries: OrderQueryService<R>,
}

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<LineItemRequest>,
}

// -- Response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedResponse {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

// -- Handlers --

/// POST /orders: place an order for the calling user.
#[tracing::instrument(skip(state, headers, body))]
pub async fn create<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    headers: HeaderMap,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderCreatedResponse>), ApiError> {
    let user_id = extract_user_id(&headers)?;
    let Json(req) = body?;

    let order_id = state
        .placement
        .place_order(OrderPlacementRequest::new(user_id, req.items))
        .await?;

    let response = OrderCreatedResponse {
        order_id,
        status: OrderStatus::Created,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /orders: order history of the calling user, newest first.
#[tracing::instrument(skip(state, headers))]
pub async fn list<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<OrderSummary>>, ApiError> {
    let user_id = extract_user_id(&headers)?;
    let orders = state.queries.get_user_orders(&user_id).await?;
    Ok(Json(orders))
}

/// GET /orders/{id}: one order of the calling user.
#[tracing::instrument(skip(state, headers))]
pub async fn get<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<OrderSummary>, ApiError> {
    let user_id = extract_user_id(&headers)?;
    let Path(id) = id?;
    let order_id = OrderId::new(id);

    state
        .queries
        .get_user_order(&user_id, order_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Order {order_id} not found")))
}
