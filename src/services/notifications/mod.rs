//! Notification dispatch with a pluggable push provider.
//!
//! `NotificationDispatcher` owns the flow; `PushProvider` and the delivery
//! log store sit behind traits so tests can replace them.

mod content;
mod dispatcher;
mod fcm_provider;
mod provider;

pub use content::{BUILTIN_BODIES, BUILTIN_TITLES, ContentSelector, MessagePool};
pub use dispatcher::{DispatchError, NotificationDispatcher};
pub use fcm_provider::FcmProvider;
pub use provider::{ProviderError, PushProvider};
