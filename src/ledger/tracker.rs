use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::ledger::access::{AccessControl, Role};
use crate::ledger::store::ShipmentStore;
use crate::models::address::Address;
use crate::models::event::{EventRecord, Receipt, TrackerEvent};
use crate::models::shipment::{Checkpoint, Shipment, ShipmentFilter, ShipmentStatus};

/// A mutating call submitted to the tracker.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShipment {
        description: String,
        origin: String,
        destination: String,
    },
    AddCheckpoint {
        id: u64,
        location: String,
    },
    MarkDelivered {
        id: u64,
        location: String,
    },
}

impl Call {
    pub fn operation(&self) -> &'static str {
        match self {
            Call::CreateShipment { .. } => "create_shipment",
            Call::AddCheckpoint { .. } => "add_checkpoint",
            Call::MarkDelivered { .. } => "mark_delivered",
        }
    }
}

/// The shipment tracking ledger: store, role gates and the committed event log.
///
/// Every mutating method checks all preconditions before touching state, so a
/// failed call leaves the tracker exactly as it was. `block_number` counts
/// committed calls.
pub struct ShipmentTracker {
    store: ShipmentStore,
    access: AccessControl,
    events: Vec<EventRecord>,
    block_number: u64,
}

impl ShipmentTracker {
    pub fn new(access: AccessControl) -> Self {
        Self {
            store: ShipmentStore::new(),
            access,
            events: Vec::new(),
            block_number: 0,
        }
    }

    pub fn execute(
        &mut self,
        caller: &Address,
        now: DateTime<Utc>,
        call: Call,
    ) -> Result<Receipt, AppError> {
        match call {
            Call::CreateShipment {
                description,
                origin,
                destination,
            } => self.create_shipment(caller, now, description, origin, destination),
            Call::AddCheckpoint { id, location } => self.add_checkpoint(caller, now, id, location),
            Call::MarkDelivered { id, location } => self.mark_delivered(caller, now, id, location),
        }
    }

    pub fn create_shipment(
        &mut self,
        caller: &Address,
        now: DateTime<Utc>,
        description: String,
        origin: String,
        destination: String,
    ) -> Result<Receipt, AppError> {
        self.access.require_org(caller)?;
        let shipment = self.store.create(description, origin, destination, caller)?;

        let event = TrackerEvent::ShipmentCreated {
            shipment_id: shipment.id,
            creator: caller.clone(),
        };
        Ok(self.commit(now, event))
    }

    pub fn add_checkpoint(
        &mut self,
        caller: &Address,
        now: DateTime<Utc>,
        id: u64,
        location: String,
    ) -> Result<Receipt, AppError> {
        self.access.require_field(caller)?;
        self.store.append_checkpoint(id, location.clone(), caller, now)?;

        let event = TrackerEvent::CheckpointAdded {
            shipment_id: id,
            location,
            updated_by: caller.clone(),
        };
        Ok(self.commit(now, event))
    }

    pub fn mark_delivered(
        &mut self,
        caller: &Address,
        now: DateTime<Utc>,
        id: u64,
        location: String,
    ) -> Result<Receipt, AppError> {
        self.access.require_field(caller)?;
        self.store.mark_delivered(id, location.clone(), caller, now)?;

        let event = TrackerEvent::ShipmentDelivered {
            shipment_id: id,
            location,
            delivered_by: caller.clone(),
        };
        Ok(self.commit(now, event))
    }

    pub fn get_shipment(&self, id: u64) -> Result<Shipment, AppError> {
        self.store.get(id).cloned()
    }

    pub fn get_checkpoints(&self, id: u64) -> Result<Vec<Checkpoint>, AppError> {
        self.store.checkpoints(id).map(<[Checkpoint]>::to_vec)
    }

    pub fn total_shipments(&self) -> u64 {
        self.store.total()
    }

    pub fn shipments(&self, filter: &ShipmentFilter) -> Vec<Shipment> {
        self.store.list(filter)
    }

    pub fn status_counts(&self) -> HashMap<ShipmentStatus, u64> {
        self.store.status_counts()
    }

    pub fn events(&self, shipment_id: Option<u64>) -> Vec<EventRecord> {
        self.events
            .iter()
            .filter(|record| shipment_id.is_none_or(|id| record.event.shipment_id() == id))
            .cloned()
            .collect()
    }

    pub fn role_of(&self, address: &Address) -> Option<Role> {
        self.access.role_of(address)
    }

    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    fn commit(&mut self, now: DateTime<Utc>, event: TrackerEvent) -> Receipt {
        self.block_number += 1;
        self.events.push(EventRecord {
            block_number: self.block_number,
            timestamp: now,
            event: event.clone(),
        });

        Receipt {
            block_number: self.block_number,
            shipment_id: event.shipment_id(),
            event,
        }
    }
}
