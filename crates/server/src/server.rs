use axum::{
    Router,
    routing::{delete, get, post, put},
};

use std::sync::Arc;

use crate::{transactions, user};
use engine::{Engine, LedgerStore};

pub struct ServerState<S> {
    pub engine: Arc<Engine<S>>,
}

impl<S> Clone for ServerState<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

async fn root() -> &'static str {
    "Server running successfully !"
}

pub fn router<S: LedgerStore>(engine: Arc<Engine<S>>) -> Router {
    let state = ServerState { engine };

    Router::new()
        .route("/", get(root))
        .route("/api/v1/users", get(user::get::<S>))
        .route("/api/v1/addUserToDB", post(user::upsert::<S>))
        .route("/api/v1/financeTracker", get(transactions::ledger::<S>))
        .route("/api/v1/addTransaction", post(transactions::add::<S>))
        .route("/api/v1/editTransaction", put(transactions::edit::<S>))
        .route("/api/v1/deleteTransaction", delete(transactions::delete::<S>))
        .with_state(state)
}

pub async fn run_with_listener<S: LedgerStore>(
    engine: Engine<S>,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine))).await
}
