/// HTTP API for interaction notes and adverse-event signals
///
/// - `server`: listener, middleware and graceful shutdown
/// - `routes`: endpoint handlers
/// - `state`: shared handles passed to every handler
/// - `utils`: JSON response helpers
mod server;

pub mod routes;
pub mod state;
pub mod utils;

pub use server::{build_app, start_server};
pub use state::AppState;
