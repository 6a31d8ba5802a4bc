use dbconnect::env::{self, EnvSnapshot};
use dbconnect::{AppState, SCHEMA};

#[tokio::main]
async fn main() {
    // Best-effort: a missing or malformed .env never blocks startup.
    let loaded = env::load_env_file();

    tracing_subscriber::fmt::init();

    if let Err(e) = loaded {
        tracing::debug!(error = %e, "env file not applied");
    }

    // Only the top-level message is logged; the driver error may quote URL parts.
    let handles = dbconnect::connect(&EnvSnapshot::from_process(), &SCHEMA)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "database configuration invalid");
            std::process::exit(1);
        });

    let _state = AppState::new(handles);
}
