//! routedb-api
//!
//! REST surface over the route catalog. Every endpoint lives under `/api` and
//! reads the catalog currently installed in the shared [`ModelSlot`](routedb_service::ModelSlot).

pub mod errors;
pub mod handlers;
pub mod models;
pub mod routing;
pub mod server;

pub use handlers::AppState;
pub use routing::create_router;
pub use server::start_server;
