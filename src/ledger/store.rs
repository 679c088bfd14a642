use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::address::Address;
use crate::models::shipment::{Checkpoint, Shipment, ShipmentFilter, ShipmentStatus};

struct ShipmentRecord {
    shipment: Shipment,
    checkpoints: Vec<Checkpoint>,
}

/// Shipment records keyed by id, each with its append-only checkpoint trail.
///
/// Ids are handed out from a counter owned by the store, starting at 1.
/// Nothing is ever removed, so `total()` is also the highest assigned id.
/// Per-status totals are kept in step with every status change.
pub struct ShipmentStore {
    last_id: u64,
    records: BTreeMap<u64, ShipmentRecord>,
    status_counts: HashMap<ShipmentStatus, u64>,
}

impl Default for ShipmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ShipmentStore {
    pub fn new() -> Self {
        Self {
            last_id: 0,
            records: BTreeMap::new(),
            status_counts: ShipmentStatus::ALL.iter().map(|status| (*status, 0)).collect(),
        }
    }

    pub fn create(
        &mut self,
        description: String,
        origin: String,
        destination: String,
        creator: &Address,
    ) -> Result<&Shipment, AppError> {
        let id = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| AppError::Internal("shipment id space exhausted".to_string()))?;

        let shipment = Shipment {
            id,
            description,
            origin,
            destination,
            status: ShipmentStatus::Created,
            current_custodian: creator.clone(),
        };

        self.last_id = id;
        *self.status_counts.entry(ShipmentStatus::Created).or_default() += 1;
        let record = self.records.entry(id).or_insert(ShipmentRecord {
            shipment,
            checkpoints: Vec::new(),
        });

        Ok(&record.shipment)
    }

    pub fn get(&self, id: u64) -> Result<&Shipment, AppError> {
        self.record(id).map(|record| &record.shipment)
    }

    pub fn checkpoints(&self, id: u64) -> Result<&[Checkpoint], AppError> {
        self.record(id).map(|record| record.checkpoints.as_slice())
    }

    pub fn append_checkpoint(
        &mut self,
        id: u64,
        location: String,
        caller: &Address,
        now: DateTime<Utc>,
    ) -> Result<&Shipment, AppError> {
        let record = open_record_mut(&mut self.records, id)?;

        if record.shipment.status == ShipmentStatus::Created {
            shift_status(
                &mut self.status_counts,
                ShipmentStatus::Created,
                ShipmentStatus::InTransit,
            );
            record.shipment.status = ShipmentStatus::InTransit;
        }
        record.push_checkpoint(location, caller, now);

        Ok(&record.shipment)
    }

    pub fn mark_delivered(
        &mut self,
        id: u64,
        location: String,
        caller: &Address,
        now: DateTime<Utc>,
    ) -> Result<&Shipment, AppError> {
        let record = open_record_mut(&mut self.records, id)?;

        shift_status(
            &mut self.status_counts,
            record.shipment.status,
            ShipmentStatus::Delivered,
        );
        record.shipment.status = ShipmentStatus::Delivered;
        record.push_checkpoint(location, caller, now);

        Ok(&record.shipment)
    }

    pub fn total(&self) -> u64 {
        self.last_id
    }

    pub fn list(&self, filter: &ShipmentFilter) -> Vec<Shipment> {
        self.records
            .values()
            .map(|record| &record.shipment)
            .filter(|shipment| filter.matches(shipment))
            .cloned()
            .collect()
    }

    pub fn status_counts(&self) -> HashMap<ShipmentStatus, u64> {
        self.status_counts.clone()
    }

    fn record(&self, id: u64) -> Result<&ShipmentRecord, AppError> {
        self.records
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("shipment {id} not found")))
    }
}

/// Mutable access to a shipment that can still take updates.
fn open_record_mut(
    records: &mut BTreeMap<u64, ShipmentRecord>,
    id: u64,
) -> Result<&mut ShipmentRecord, AppError> {
    let record = records
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("shipment {id} not found")))?;

    if record.shipment.status.is_terminal() {
        return Err(AppError::AlreadyDelivered(id));
    }

    Ok(record)
}

fn shift_status(
    counts: &mut HashMap<ShipmentStatus, u64>,
    from: ShipmentStatus,
    to: ShipmentStatus,
) {
    if let Some(count) = counts.get_mut(&from) {
        *count = count.saturating_sub(1);
    }
    *counts.entry(to).or_default() += 1;
}

impl ShipmentRecord {
    fn push_checkpoint(&mut self, location: String, caller: &Address, now: DateTime<Utc>) {
        self.checkpoints.push(Checkpoint {
            timestamp: now,
            location,
            updated_by: caller.clone(),
        });
        self.shipment.current_custodian = caller.clone();
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::ShipmentStore;
    use crate::error::AppError;
    use crate::models::address::Address;
    use crate::models::shipment::{ShipmentFilter, ShipmentStatus};

    fn org() -> Address {
        "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".parse().unwrap()
    }

    fn field() -> Address {
        "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc".parse().unwrap()
    }

    fn create(store: &mut ShipmentStore, description: &str) -> u64 {
        store
            .create(description.to_string(), "KL".to_string(), "Sabah".to_string(), &org())
            .unwrap()
            .id
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let mut store = ShipmentStore::new();

        assert_eq!(create(&mut store, "a"), 1);
        assert_eq!(create(&mut store, "b"), 2);
        assert_eq!(create(&mut store, "c"), 3);
        assert_eq!(store.total(), 3);
    }

    #[test]
    fn new_shipment_is_created_and_held_by_creator() {
        let mut store = ShipmentStore::new();
        let id = create(&mut store, "Aid");

        let shipment = store.get(id).unwrap();
        assert_eq!(shipment.status, ShipmentStatus::Created);
        assert_eq!(shipment.current_custodian, org());
        assert!(store.checkpoints(id).unwrap().is_empty());
    }

    #[test]
    fn empty_strings_are_accepted() {
        let mut store = ShipmentStore::new();
        let shipment = store
            .create(String::new(), String::new(), String::new(), &org())
            .unwrap();

        assert_eq!(shipment.id, 1);
        assert_eq!(shipment.description, "");
    }

    #[test]
    fn first_checkpoint_moves_to_in_transit_and_hands_over_custody() {
        let mut store = ShipmentStore::new();
        let id = create(&mut store, "Food");

        let shipment = store
            .append_checkpoint(id, "Warehouse".to_string(), &field(), Utc::now())
            .unwrap();
        assert_eq!(shipment.status, ShipmentStatus::InTransit);
        assert_eq!(shipment.current_custodian, field());

        store
            .append_checkpoint(id, "Hub".to_string(), &field(), Utc::now())
            .unwrap();
        let checkpoints = store.checkpoints(id).unwrap();
        assert_eq!(checkpoints.len(), 2);
        assert_eq!(checkpoints[0].location, "Warehouse");
        assert_eq!(checkpoints[1].location, "Hub");
        assert_eq!(checkpoints[1].updated_by, field());
        assert_eq!(store.get(id).unwrap().status, ShipmentStatus::InTransit);
    }

    #[test]
    fn delivery_straight_from_created_is_allowed() {
        let mut store = ShipmentStore::new();
        let id = create(&mut store, "Kits");

        let shipment = store
            .mark_delivered(id, "Village".to_string(), &field(), Utc::now())
            .unwrap();
        assert_eq!(shipment.status, ShipmentStatus::Delivered);
        assert_eq!(store.checkpoints(id).unwrap().len(), 1);
    }

    #[test]
    fn delivered_shipment_rejects_further_updates() {
        let mut store = ShipmentStore::new();
        let id = create(&mut store, "Kits");
        store
            .mark_delivered(id, "Village".to_string(), &field(), Utc::now())
            .unwrap();

        let err = store
            .append_checkpoint(id, "After".to_string(), &field(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyDelivered(found) if found == id));

        let err = store
            .mark_delivered(id, "Again".to_string(), &field(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyDelivered(found) if found == id));

        assert_eq!(store.checkpoints(id).unwrap().len(), 1);
        assert_eq!(store.get(id).unwrap().status, ShipmentStatus::Delivered);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut store = ShipmentStore::new();

        assert!(matches!(store.get(0), Err(AppError::NotFound(_))));
        assert!(matches!(store.checkpoints(1), Err(AppError::NotFound(_))));
        assert!(matches!(
            store.append_checkpoint(1, "x".to_string(), &field(), Utc::now()),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.mark_delivered(1, "x".to_string(), &field(), Utc::now()),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn list_and_counts_follow_status() {
        let mut store = ShipmentStore::new();
        let first = create(&mut store, "Water");
        create(&mut store, "Blankets");
        store
            .append_checkpoint(first, "Port".to_string(), &field(), Utc::now())
            .unwrap();

        let in_transit = store.list(&ShipmentFilter {
            status: Some(ShipmentStatus::InTransit),
            ..ShipmentFilter::default()
        });
        assert_eq!(in_transit.len(), 1);
        assert_eq!(in_transit[0].id, first);

        let counts = store.status_counts();
        assert_eq!(counts[&ShipmentStatus::Created], 1);
        assert_eq!(counts[&ShipmentStatus::InTransit], 1);
        assert_eq!(counts[&ShipmentStatus::Delivered], 0);
    }

    #[test]
    fn status_counts_track_every_transition() {
        let mut store = ShipmentStore::new();
        let walked = create(&mut store, "Rice");
        let direct = create(&mut store, "Tents");
        create(&mut store, "Soap");

        store
            .append_checkpoint(walked, "Port".to_string(), &field(), Utc::now())
            .unwrap();
        store
            .append_checkpoint(walked, "Road".to_string(), &field(), Utc::now())
            .unwrap();
        store
            .mark_delivered(walked, "Camp".to_string(), &field(), Utc::now())
            .unwrap();
        store
            .mark_delivered(direct, "Clinic".to_string(), &field(), Utc::now())
            .unwrap();
        assert!(store
            .append_checkpoint(direct, "Late".to_string(), &field(), Utc::now())
            .is_err());
        assert!(store
            .mark_delivered(99, "Nowhere".to_string(), &field(), Utc::now())
            .is_err());

        let counts = store.status_counts();
        assert_eq!(counts[&ShipmentStatus::Created], 1);
        assert_eq!(counts[&ShipmentStatus::InTransit], 0);
        assert_eq!(counts[&ShipmentStatus::Delivered], 2);
        assert_eq!(counts.values().sum::<u64>(), store.total());
    }
}
