use std::sync::Arc;

use axum::Router;

use crate::{Config, WireRecord};

mod health;
mod stream;

// ---

/// Shared application state: the materialized record set plus configuration.
/// Records are loaded once before this router exists; connections only ever
/// read them.
pub type AppState = (Arc<Vec<WireRecord>>, Config);

pub fn router(records: Arc<Vec<WireRecord>>, config: Config) -> Router {
    // ---
    Router::new()
        .merge(stream::router())
        .merge(health::router())
        .with_state((records, config))
}
