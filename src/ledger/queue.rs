use tokio::sync::oneshot;
use uuid::Uuid;

use crate::error::AppError;
use crate::ledger::tracker::Call;
use crate::models::address::Address;
use crate::models::event::Receipt;
use crate::state::AppState;

pub struct Transaction {
    pub id: Uuid,
    pub caller: Address,
    pub call: Call,
    pub reply: oneshot::Sender<Result<Receipt, AppError>>,
}

/// Hands a call to the ledger task and waits until it is committed or reverted.
pub async fn submit_transaction(
    state: &AppState,
    caller: Address,
    call: Call,
) -> Result<Receipt, AppError> {
    let (reply, outcome) = oneshot::channel();
    let transaction = Transaction {
        id: Uuid::new_v4(),
        caller,
        call,
        reply,
    };

    state
        .tx_sender
        .send(transaction)
        .await
        .map_err(|err| AppError::Internal(format!("transaction queue send failed: {err}")))?;
    state.metrics.transactions_in_queue.inc();

    outcome
        .await
        .map_err(|_| AppError::Internal("ledger dropped the transaction".to_string()))?
}
