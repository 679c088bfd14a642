use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::AppError;
use crate::ledger::queue::Transaction;
use crate::models::event::{EventRecord, Receipt};
use crate::state::AppState;

/// Applies queued transactions one at a time, in arrival order.
///
/// This task is the only writer of the tracker. Each transaction is applied
/// under the write lock and stamped with the time it was applied.
pub async fn run_ledger(state: Arc<AppState>, mut tx_rx: mpsc::Receiver<Transaction>) {
    info!("ledger started");

    while let Some(transaction) = tx_rx.recv().await {
        state.metrics.transactions_in_queue.dec();

        let operation = transaction.call.operation();
        let start = Instant::now();
        let result = apply(&state, &transaction);
        state
            .metrics
            .transaction_latency_seconds
            .with_label_values(&[operation])
            .observe(start.elapsed().as_secs_f64());

        match &result {
            Ok(receipt) => {
                state
                    .metrics
                    .transactions_total
                    .with_label_values(&[operation, "committed"])
                    .inc();
                info!(
                    tx_id = %transaction.id,
                    operation,
                    shipment_id = receipt.shipment_id,
                    block = receipt.block_number,
                    caller = %transaction.caller,
                    "transaction committed"
                );
            }
            Err(err) => {
                state
                    .metrics
                    .transactions_total
                    .with_label_values(&[operation, err.kind()])
                    .inc();
                warn!(
                    tx_id = %transaction.id,
                    operation,
                    caller = %transaction.caller,
                    error = %err,
                    "transaction reverted"
                );
            }
        }

        if transaction.reply.send(result).is_err() {
            warn!(tx_id = %transaction.id, "caller went away before receipt");
        }
    }

    warn!("ledger stopped: transaction channel closed");
}

fn apply(state: &AppState, transaction: &Transaction) -> Result<Receipt, AppError> {
    let mut tracker = state.write_tracker()?;
    let now = Utc::now();
    let receipt = tracker.execute(&transaction.caller, now, transaction.call.clone())?;

    state.metrics.record_status_counts(&tracker.status_counts());
    let _ = state.events_tx.send(EventRecord {
        block_number: receipt.block_number,
        timestamp: now,
        event: receipt.event.clone(),
    });

    Ok(receipt)
}
