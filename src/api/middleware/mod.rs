//! Middleware for request correlation and access logging.

mod logging;
mod request_id;

pub use logging::logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
