use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::api::rest::caller::Caller;
use crate::api::rest::extract::{AppJson, AppPath, AppQuery};
use crate::error::AppError;
use crate::ledger::queue::submit_transaction;
use crate::ledger::tracker::Call;
use crate::models::event::Receipt;
use crate::models::shipment::{Checkpoint, Shipment, ShipmentFilter};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shipments", post(create_shipment).get(list_shipments))
        .route("/shipments/:id", get(get_shipment))
        .route(
            "/shipments/:id/checkpoints",
            post(add_checkpoint).get(get_checkpoints),
        )
        .route("/shipments/:id/deliver", post(mark_delivered))
}

#[derive(Deserialize)]
pub struct CreateShipmentRequest {
    pub description: String,
    pub origin: String,
    pub destination: String,
}

#[derive(Deserialize)]
pub struct LocationRequest {
    pub location: String,
}

#[derive(Serialize)]
pub struct ShipmentView {
    #[serde(flatten)]
    pub shipment: Shipment,
    pub status_label: &'static str,
    pub progress_percent: u8,
    pub checkpoint_count: usize,
}

async fn create_shipment(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    AppJson(payload): AppJson<CreateShipmentRequest>,
) -> Result<Json<Receipt>, AppError> {
    let call = Call::CreateShipment {
        description: payload.description,
        origin: payload.origin,
        destination: payload.destination,
    };

    Ok(Json(submit_transaction(&state, caller, call).await?))
}

async fn add_checkpoint(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<u64>,
    Caller(caller): Caller,
    AppJson(payload): AppJson<LocationRequest>,
) -> Result<Json<Receipt>, AppError> {
    let call = Call::AddCheckpoint {
        id,
        location: payload.location,
    };

    Ok(Json(submit_transaction(&state, caller, call).await?))
}

async fn mark_delivered(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<u64>,
    Caller(caller): Caller,
    AppJson(payload): AppJson<LocationRequest>,
) -> Result<Json<Receipt>, AppError> {
    let call = Call::MarkDelivered {
        id,
        location: payload.location,
    };

    Ok(Json(submit_transaction(&state, caller, call).await?))
}

async fn get_shipment(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<u64>,
) -> Result<Json<ShipmentView>, AppError> {
    let tracker = state.read_tracker()?;
    let shipment = tracker.get_shipment(id)?;
    let checkpoint_count = tracker.get_checkpoints(id)?.len();

    Ok(Json(ShipmentView {
        status_label: shipment.status.label(),
        progress_percent: shipment.status.progress_percent(),
        checkpoint_count,
        shipment,
    }))
}

async fn get_checkpoints(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<u64>,
) -> Result<Json<Vec<Checkpoint>>, AppError> {
    let checkpoints = state.read_tracker()?.get_checkpoints(id)?;
    Ok(Json(checkpoints))
}

async fn list_shipments(
    State(state): State<Arc<AppState>>,
    AppQuery(filter): AppQuery<ShipmentFilter>,
) -> Result<Json<Vec<Shipment>>, AppError> {
    let shipments = state.read_tracker()?.shipments(&filter);
    Ok(Json(shipments))
}
