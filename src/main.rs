use userhub::application::maintenance::cleanup::CleanupExpiredTokensUseCase;
use userhub::application::users::register::RegisterUserUseCase;
use userhub::application::users::seed_admin::SeedAdminUseCase;
use userhub::infrastructure;
use userhub::infrastructure::config::AppConfig;
use userhub::infrastructure::scheduler::CleanupScheduler;
use userhub::infrastructure::state::AppState;
use userhub::presentation;
use userhub::shared::retry::RetryPolicy;

use dotenvy::dotenv;
use std::env;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run_with_signal().await
}

async fn run_with_signal() -> anyhow::Result<()> {
    run(async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run<F>(shutdown_signal: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    dotenv().ok();

    // try_init: tests call run more than once per process
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "userhub=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    let config = AppConfig::from_env()?;

    let (listener, app, cleanup) = bootstrap(&config).await?;

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await;

    cleanup.abort();
    tracing::info!("Server stopped");

    served?;
    Ok(())
}

async fn bootstrap(
    config: &AppConfig,
) -> anyhow::Result<(tokio::net::TcpListener, axum::Router, JoinHandle<()>)> {
    let pool = infrastructure::db::create_pool(&config.database).await?;

    // Run migrations
    sqlx::migrate!().run(&pool).await?;

    let state = AppState::from_config(pool, config)?;

    if let Some(seed) = &config.admin_seed {
        let register = RegisterUserUseCase::new(
            state.user_repo.clone(),
            state.password_service.clone(),
            state.cipher.clone(),
        );
        SeedAdminUseCase::new(state.user_repo.clone(), register)
            .execute(&seed.email, &seed.password)
            .await?;
    }

    let cleanup = CleanupScheduler::new(
        Arc::new(CleanupExpiredTokensUseCase::new(
            state.refresh_token_repo.clone(),
            state.reset_token_repo.clone(),
        )),
        RetryPolicy::new(config.cleanup.max_attempts, config.cleanup.base_delay),
        config.cleanup.hour_utc,
    )
    .spawn();

    let app = presentation::router::app(state, &config.http)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::debug!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    Ok((listener, app, cleanup))
}
