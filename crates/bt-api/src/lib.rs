//! REST API for Bug Tracker RS
//!
//! Handlers translate request bodies and params into service calls and map
//! results to HTTP status codes; auth and role checks run as middleware
//! ahead of the handlers.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::AppState;
