use std::sync::Arc;

use blog_api::config::Config;
use blog_api::domain::user::service::UserService;
use blog_api::inbound::http::router::create_router;
use blog_api::outbound::repositories::InMemoryUserRepository;
use blog_auth::AuthGate;
use blog_auth::Authenticator;
use blog_auth::JwtSecret;
use blog_auth::PasswordHasher;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blog_api=debug,blog_auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "blog-api",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_minutes = config.jwt.expiration_minutes,
        hashing_memory_kib = config.password.memory_kib,
        hashing_iterations = config.password.iterations,
        "Configuration loaded"
    );

    let secret = JwtSecret::new(config.jwt.secret.as_bytes())?;
    let password_hasher = PasswordHasher::with_cost(config.password)?;
    let authenticator = Arc::new(
        Authenticator::new(&secret, config.jwt.token_ttl()).with_password_hasher(password_hasher),
    );

    let user_repository = Arc::new(InMemoryUserRepository::new());
    let user_service = Arc::new(UserService::new(
        user_repository,
        Arc::clone(&authenticator),
    ));
    let auth_gate = AuthGate::new(authenticator.validator().clone(), Arc::clone(&user_service));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, auth_gate);

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
