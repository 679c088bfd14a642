use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::address::Address;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShipmentStatus {
    Created,
    InTransit,
    Delivered,
}

impl ShipmentStatus {
    pub const ALL: [ShipmentStatus; 3] = [
        ShipmentStatus::Created,
        ShipmentStatus::InTransit,
        ShipmentStatus::Delivered,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ShipmentStatus::Created => "Created",
            ShipmentStatus::InTransit => "In Transit",
            ShipmentStatus::Delivered => "Delivered",
        }
    }

    /// Rough completion figure shown next to a shipment.
    pub fn progress_percent(self) -> u8 {
        match self {
            ShipmentStatus::Created => 20,
            ShipmentStatus::InTransit => 60,
            ShipmentStatus::Delivered => 100,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == ShipmentStatus::Delivered
    }

    pub fn as_metric_label(self) -> &'static str {
        match self {
            ShipmentStatus::Created => "created",
            ShipmentStatus::InTransit => "in_transit",
            ShipmentStatus::Delivered => "delivered",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Shipment {
    pub id: u64,
    pub description: String,
    pub origin: String,
    pub destination: String,
    pub status: ShipmentStatus,
    pub current_custodian: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Checkpoint {
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub updated_by: Address,
}

/// Listing filter; every field that is set must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShipmentFilter {
    pub status: Option<ShipmentStatus>,
    pub custodian: Option<Address>,
    #[serde(rename = "q")]
    pub query: Option<String>,
}

impl ShipmentFilter {
    pub fn matches(&self, shipment: &Shipment) -> bool {
        if self.status.is_some_and(|status| status != shipment.status) {
            return false;
        }

        if let Some(custodian) = &self.custodian {
            if custodian != &shipment.current_custodian {
                return false;
            }
        }

        match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => {
                let needle = query.to_lowercase();
                shipment.id.to_string().contains(&needle)
                    || shipment.description.to_lowercase().contains(&needle)
                    || shipment.origin.to_lowercase().contains(&needle)
                    || shipment.destination.to_lowercase().contains(&needle)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Shipment, ShipmentFilter, ShipmentStatus};

    fn shipment(id: u64, description: &str, destination: &str, status: ShipmentStatus) -> Shipment {
        Shipment {
            id,
            description: description.to_string(),
            origin: "KL".to_string(),
            destination: destination.to_string(),
            status,
            current_custodian: "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".parse().unwrap(),
        }
    }

    #[test]
    fn status_only_moves_forward() {
        assert!(ShipmentStatus::Created < ShipmentStatus::InTransit);
        assert!(ShipmentStatus::InTransit < ShipmentStatus::Delivered);
        assert!(ShipmentStatus::Delivered.is_terminal());
        assert!(!ShipmentStatus::InTransit.is_terminal());
    }

    #[test]
    fn query_matches_case_insensitively() {
        let rice = shipment(7, "Rice sacks", "Sabah", ShipmentStatus::Created);
        let filter = ShipmentFilter {
            query: Some("sABAH".to_string()),
            ..ShipmentFilter::default()
        };

        assert!(filter.matches(&rice));
        assert!(!ShipmentFilter {
            query: Some("Sarawak".to_string()),
            ..ShipmentFilter::default()
        }
        .matches(&rice));
    }

    #[test]
    fn status_and_custodian_must_both_match() {
        let kits = shipment(2, "Kits", "Village", ShipmentStatus::InTransit);
        let filter = ShipmentFilter {
            status: Some(ShipmentStatus::InTransit),
            custodian: Some("0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc".parse().unwrap()),
            query: None,
        };

        assert!(!filter.matches(&kits));
        assert!(ShipmentFilter {
            status: Some(ShipmentStatus::InTransit),
            ..ShipmentFilter::default()
        }
        .matches(&kits));
    }
}
