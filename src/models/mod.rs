pub mod address;
pub mod event;
pub mod shipment;
