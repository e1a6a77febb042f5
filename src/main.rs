use smartoffice_server::api::{self, AppState, SharedState};
use smartoffice_server::ledger::{Ledger, StatusPolicy};
use smartoffice_server::persist::JsonFileStore;
use smartoffice_server::{seed, Settings};
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smartoffice_server=info,tower_http=info".into()),
        )
        .init();

    let settings = Settings::load()?;

    // ── Boot the store ─────────────────────────────────────────
    let store = Arc::new(JsonFileStore::open(&settings.data_path)?);
    let outcome = seed::ensure_seeded(store.as_ref())?;
    tracing::info!(path = %store.path().display(), ?outcome, "data file ready");

    // ── Shared state ───────────────────────────────────────────
    let policy = if settings.strict_status {
        StatusPolicy::Strict
    } else {
        StatusPolicy::Loose
    };
    let state: SharedState = Arc::new(AppState {
        ledger: Arc::new(Ledger::new(store)),
        policy,
    });

    // ── Start ──────────────────────────────────────────────────
    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(?policy, "SmartOffice API listening on http://{addr}");

    axum::serve(listener, api::router(state)).await?;
    Ok(())
}
