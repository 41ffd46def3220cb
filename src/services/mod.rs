//! Service layer for business logic operations.

pub mod notifications;

pub use notifications::NotificationDispatcher;
