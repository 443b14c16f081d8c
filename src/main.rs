use std::net::SocketAddr;

use teacher_recruitment::{
    config::Config,
    database::pool::{create_pool, migrate},
    routes, AppState,
};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    let bootstrap = config
        .bootstrap_admin_email
        .clone()
        .zip(config.bootstrap_admin_password.clone());
    let addr: SocketAddr = config.server_address.parse()?;

    let app_state = match config.database_url.clone() {
        Some(url) => {
            let pool = create_pool(&url).await?;
            migrate(&pool).await?;
            info!("Connected to Postgres, migrations applied");
            AppState::postgres(config, pool)?
        }
        None => {
            warn!("DATABASE_URL is not set, applications are kept in memory only");
            AppState::in_memory(config)?
        }
    };

    if let Some((email, password)) = bootstrap {
        app_state
            .admin_service
            .ensure_bootstrap(&email, &password)
            .await?;
    }

    let app = routes::router(app_state);

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
