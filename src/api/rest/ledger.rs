use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::api::rest::extract::{AppPath, AppQuery};
use crate::error::AppError;
use crate::ledger::access::Role;
use crate::models::address::Address;
use crate::models::event::EventRecord;
use crate::models::shipment::ShipmentStatus;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stats", get(stats))
        .route("/events", get(list_events))
        .route("/roles/:address", get(role_of))
}

#[derive(Serialize)]
struct StatsResponse {
    total_shipments: u64,
    created: u64,
    in_transit: u64,
    delivered: u64,
    block_number: u64,
}

#[derive(Deserialize)]
struct EventsQuery {
    shipment_id: Option<u64>,
}

#[derive(Serialize)]
struct RoleResponse {
    address: Address,
    role: &'static str,
}

async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>, AppError> {
    let tracker = state.read_tracker()?;
    let counts = tracker.status_counts();
    let count = |status: ShipmentStatus| counts.get(&status).copied().unwrap_or(0);

    Ok(Json(StatsResponse {
        total_shipments: tracker.total_shipments(),
        created: count(ShipmentStatus::Created),
        in_transit: count(ShipmentStatus::InTransit),
        delivered: count(ShipmentStatus::Delivered),
        block_number: tracker.block_number(),
    }))
}

async fn list_events(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<EventsQuery>,
) -> Result<Json<Vec<EventRecord>>, AppError> {
    let events = state.read_tracker()?.events(query.shipment_id);
    Ok(Json(events))
}

async fn role_of(
    State(state): State<Arc<AppState>>,
    AppPath(raw): AppPath<String>,
) -> Result<Json<RoleResponse>, AppError> {
    let address: Address = raw.parse()?;
    let role = match state.read_tracker()?.role_of(&address) {
        Some(Role::Org) => "org",
        Some(Role::Field) => "field",
        None => "public",
    };

    Ok(Json(RoleResponse { address, role }))
}
