use crate::webserver::state::AppState;
use axum::Router;
use std::sync::Arc;

pub mod interactions;
pub mod signals;
pub mod system;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(interactions::routes())
        .merge(signals::routes())
        .merge(system::routes())
        .with_state(state)
}
