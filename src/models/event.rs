use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::address::Address;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum TrackerEvent {
    ShipmentCreated {
        shipment_id: u64,
        creator: Address,
    },
    CheckpointAdded {
        shipment_id: u64,
        location: String,
        updated_by: Address,
    },
    ShipmentDelivered {
        shipment_id: u64,
        location: String,
        delivered_by: Address,
    },
}

impl TrackerEvent {
    pub fn shipment_id(&self) -> u64 {
        match self {
            TrackerEvent::ShipmentCreated { shipment_id, .. }
            | TrackerEvent::CheckpointAdded { shipment_id, .. }
            | TrackerEvent::ShipmentDelivered { shipment_id, .. } => *shipment_id,
        }
    }
}

/// An event as it was committed to the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventRecord {
    pub block_number: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: TrackerEvent,
}

/// Result of a committed mutating call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Receipt {
    pub block_number: u64,
    pub shipment_id: u64,
    pub event: TrackerEvent,
}
