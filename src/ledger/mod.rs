pub mod access;
pub mod executor;
pub mod queue;
pub mod store;
pub mod tracker;
