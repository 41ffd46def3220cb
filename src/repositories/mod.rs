//! Repository layer for data access operations.

mod delivery_log_repo;

pub use delivery_log_repo::{DeliveryLogError, DeliveryLogStore, FirestoreDeliveryLog};
