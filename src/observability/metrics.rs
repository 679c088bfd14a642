use std::collections::HashMap;

use prometheus::{
    Encoder, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder,
};

use crate::models::shipment::ShipmentStatus;

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub transactions_total: IntCounterVec,
    pub transactions_in_queue: IntGauge,
    pub transaction_latency_seconds: HistogramVec,
    pub shipments_by_status: IntGaugeVec,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let transactions_total = IntCounterVec::new(
            Opts::new("transactions_total", "Total ledger transactions by operation and outcome"),
            &["operation", "outcome"],
        )
        .expect("valid transactions_total metric");

        let transactions_in_queue = IntGauge::new(
            "transactions_in_queue",
            "Current number of transactions waiting for the ledger",
        )
        .expect("valid transactions_in_queue metric");

        let transaction_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "transaction_latency_seconds",
                "Time spent applying a transaction in seconds",
            ),
            &["operation"],
        )
        .expect("valid transaction_latency_seconds metric");

        let shipments_by_status = IntGaugeVec::new(
            Opts::new("shipments_by_status", "Number of shipments in each status"),
            &["status"],
        )
        .expect("valid shipments_by_status metric");

        registry
            .register(Box::new(transactions_total.clone()))
            .expect("register transactions_total");
        registry
            .register(Box::new(transactions_in_queue.clone()))
            .expect("register transactions_in_queue");
        registry
            .register(Box::new(transaction_latency_seconds.clone()))
            .expect("register transaction_latency_seconds");
        registry
            .register(Box::new(shipments_by_status.clone()))
            .expect("register shipments_by_status");

        Self {
            registry,
            transactions_total,
            transactions_in_queue,
            transaction_latency_seconds,
            shipments_by_status,
        }
    }

    pub fn record_status_counts(&self, counts: &HashMap<ShipmentStatus, u64>) {
        for status in ShipmentStatus::ALL {
            let count = counts.get(&status).copied().unwrap_or(0);
            self.shipments_by_status
                .with_label_values(&[status.as_metric_label()])
                .set(i64::try_from(count).unwrap_or(i64::MAX));
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
