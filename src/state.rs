use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::{broadcast, mpsc};

use crate::error::AppError;
use crate::ledger::access::AccessControl;
use crate::ledger::queue::Transaction;
use crate::ledger::tracker::ShipmentTracker;
use crate::models::event::EventRecord;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub tracker: RwLock<ShipmentTracker>,
    pub tx_sender: mpsc::Sender<Transaction>,
    pub events_tx: broadcast::Sender<EventRecord>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(
        access: AccessControl,
        tx_queue_size: usize,
        event_buffer_size: usize,
    ) -> (Self, mpsc::Receiver<Transaction>) {
        let (tx_sender, tx_rx) = mpsc::channel(tx_queue_size);
        let (events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        (
            Self {
                tracker: RwLock::new(ShipmentTracker::new(access)),
                tx_sender,
                events_tx,
                metrics: Metrics::new(),
            },
            tx_rx,
        )
    }

    pub fn read_tracker(&self) -> Result<RwLockReadGuard<'_, ShipmentTracker>, AppError> {
        self.tracker
            .read()
            .map_err(|_| AppError::Internal("tracker lock poisoned".to_string()))
    }

    pub fn write_tracker(&self) -> Result<RwLockWriteGuard<'_, ShipmentTracker>, AppError> {
        self.tracker
            .write()
            .map_err(|_| AppError::Internal("tracker lock poisoned".to_string()))
    }
}
