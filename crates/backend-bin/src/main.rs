use backend_lib::{
    config::Settings,
    routes,
    storage::{create_account, AccountStore, NewAccount},
    AppState,
};
use educoach_common::Role;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize configuration, trying an explicit path when the default
    // locations have nothing
    let config = Settings::load().or_else(|_| Settings::load_from("config/default.toml"))?;

    // Initialize tracing; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Create application state; a missing session secret refuses startup here
    let state = Arc::new(AppState::new_flat_file(config)?);

    bootstrap_admin(&state).await?;

    let app = routes::create_router(state.clone());

    let listener = TcpListener::bind(&state.settings.bind_addr).await?;
    tracing::info!("listening on {}", state.settings.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the initial admin account when `EDUCOACH_ADMIN_PASSWORD` is set
/// and no `admin` account exists yet
async fn bootstrap_admin<S: AccountStore>(state: &AppState<S>) -> anyhow::Result<()> {
    let Ok(password) = std::env::var("EDUCOACH_ADMIN_PASSWORD") else {
        return Ok(());
    };

    if state.accounts.find_by_identifier("admin").await?.is_some() {
        return Ok(());
    }

    create_account(
        &state.accounts,
        &state.settings.password_requirements,
        NewAccount {
            username: "admin".to_string(),
            email: "admin@educoach.local".to_string(),
            password,
            role: Role::Admin,
            full_name: "Administrator".to_string(),
        },
    )
    .await?;

    tracing::info!("bootstrapped initial admin account");
    Ok(())
}
