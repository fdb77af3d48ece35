//! HTTP API
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | `GET` | `/fleets/{fleet_id}/cars` | 一覧 (`[CarBase]`) |
//! | `GET` | `/fleets/{fleet_id}/cars/{vin}` | 単一取得 (`Car`、レンタル付き) |
//! | `PUT` | `/fleets/{fleet_id}/cars/{vin}` | 追加 (`CarBase`) |
//! | `DELETE` | `/fleets/{fleet_id}/cars/{vin}` | 削除 (204) |
//!
//! エラーは `{"message": "..."}`。HEAD にはボディを付けない (axum が除去する)。

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use fleetcar_core::{Car, CarBase, ErrorKind, FleetError, FleetId, RequestContext, Vin};
use fleetcar_ops::FleetService;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Client went away before the response was written (nginx convention).
const CLIENT_CLOSED_REQUEST: u16 = 499;

#[derive(Clone)]
pub struct ApiState {
    service: Arc<dyn FleetService>,
    request_deadline: Option<Duration>,
}

impl ApiState {
    /// リクエストごとの新しいコンテキスト
    fn context(&self) -> RequestContext {
        match self.request_deadline {
            Some(deadline) => RequestContext::with_timeout(deadline),
            None => RequestContext::new(),
        }
    }
}

pub fn router(service: Arc<dyn FleetService>, request_deadline: Option<Duration>) -> Router {
    Router::new()
        .route("/fleets/{fleet_id}/cars", get(list_cars))
        .route(
            "/fleets/{fleet_id}/cars/{vin}",
            get(get_car).put(add_car).delete(remove_car),
        )
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .with_state(ApiState {
            service,
            request_deadline,
        })
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

fn message_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(MessageResponse {
            message: message.into(),
        }),
    )
        .into_response()
}

/// Boundary mapping of the error taxonomy.
pub fn status_for(err: &FleetError) -> StatusCode {
    match err.kind() {
        ErrorKind::FleetNotFound | ErrorKind::CarNotFound | ErrorKind::CarNotInFleet => {
            StatusCode::NOT_FOUND
        }
        // 追加の冪等性: 既に割り当て済みは失敗ではない
        ErrorKind::CarAlreadyInFleet => StatusCode::NO_CONTENT,
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::Cancelled => {
            StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::BAD_REQUEST)
        }
        ErrorKind::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::FleetAlreadyExists
        | ErrorKind::DomainAssertion
        | ErrorKind::RentalManagementAssertion
        | ErrorKind::Backend => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub struct ApiError(FleetError);

impl From<FleetError> for ApiError {
    fn from(err: FleetError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);

        if status == StatusCode::NO_CONTENT {
            debug!(error = %self.0, "Treating as no-op");
            return status.into_response();
        }

        if status.is_server_error() {
            // 内部の詳細はログにのみ出す
            error!(error = %self.0, source = ?std::error::Error::source(&self.0), "Request failed");
            let message = status.canonical_reason().unwrap_or("Internal Server Error");
            return message_response(status, message);
        }

        debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        message_response(status, self.0.to_string())
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// `GET /fleets/{fleet_id}/cars`
async fn list_cars(
    State(state): State<ApiState>,
    Path(fleet_id): Path<String>,
) -> ApiResult<Json<Vec<CarBase>>> {
    let fleet_id = FleetId::parse(&fleet_id)?;

    let ctx = state.context();
    let _cancel = ctx.cancel_on_drop();
    let cars = state.service.list_cars_in_fleet(&ctx, &fleet_id).await?;
    Ok(Json(cars))
}

/// `GET /fleets/{fleet_id}/cars/{vin}`
async fn get_car(
    State(state): State<ApiState>,
    Path((fleet_id, vin)): Path<(String, String)>,
) -> ApiResult<Json<Car>> {
    let fleet_id = FleetId::parse(&fleet_id)?;
    let vin = Vin::parse(&vin)?;

    let ctx = state.context();
    let _cancel = ctx.cancel_on_drop();
    let car = state.service.get_single_car(&ctx, &fleet_id, &vin).await?;
    Ok(Json(car))
}

/// `PUT /fleets/{fleet_id}/cars/{vin}`
async fn add_car(
    State(state): State<ApiState>,
    Path((fleet_id, vin)): Path<(String, String)>,
) -> ApiResult<Json<CarBase>> {
    let fleet_id = FleetId::parse(&fleet_id)?;
    let vin = Vin::parse(&vin)?;

    let ctx = state.context();
    let _cancel = ctx.cancel_on_drop();
    let car = state.service.add_car_to_fleet(&ctx, &fleet_id, &vin).await?;
    Ok(Json(car))
}

/// `DELETE /fleets/{fleet_id}/cars/{vin}`
async fn remove_car(
    State(state): State<ApiState>,
    Path((fleet_id, vin)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let fleet_id = FleetId::parse(&fleet_id)?;
    let vin = Vin::parse(&vin)?;

    let ctx = state.context();
    let _cancel = ctx.cancel_on_drop();
    state
        .service
        .remove_car_from_fleet(&ctx, &fleet_id, &vin)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn not_found() -> Response {
    message_response(StatusCode::NOT_FOUND, "Not Found")
}

async fn method_not_allowed() -> Response {
    message_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}
