// ABOUTME: HTTP middleware for request correlation and cross-origin access
// ABOUTME: Provides request ID propagation, the request deadline and the CORS layer

pub mod cors;
pub mod deadline;
pub mod request_id;

// CORS configuration
pub use cors::setup_cors;

// Whole-request deadline
pub use deadline::request_deadline_middleware;

// Request correlation
pub use request_id::{request_id_middleware, RequestId};
