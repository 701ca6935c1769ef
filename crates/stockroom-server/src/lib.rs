//! HTTP server for stockroom.
//!
//! Maps inventory routes onto the record and photo stores, decodes multipart,
//! url-encoded and JSON bodies, and answers cross-origin pre-flights.

pub mod config;
pub mod error;
pub mod form;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::{build_router, build_router_with_limit};
pub use server::InventoryServer;
