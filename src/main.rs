use clap::Parser; // for cli
use join_gateway::config::Args;
use join_gateway::create_router;
use join_gateway::identity::ForwardedIdentity;
use join_gateway::registry::expiry_sweeper;
use join_gateway::state::AppState;
use join_gateway::store::MemoryStore;
use join_gateway::verifier::{BotVerifier, RecaptchaVerifier, StaticVerifier};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("join_gateway=info")),
        )
        .init();

    // parse cli arguments
    let args = Args::parse();
    let settings = args.settings();

    let verifier: Arc<dyn BotVerifier> = match &args.recaptcha_secret {
        Some(secret) => Arc::new(RecaptchaVerifier::new(
            reqwest::Client::new(),
            secret.clone(),
            args.recaptcha_min_score,
        )),
        None => {
            warn!("no reCAPTCHA secret configured, bot verification disabled");
            Arc::new(StaticVerifier::accept_all())
        }
    };
    let identity = Arc::new(ForwardedIdentity::new(&args.identity_header)?);
    let store = Arc::new(MemoryStore::new());

    // creating shared state
    let state = Arc::new(AppState::new(settings.clone(), identity, verifier, store)?);

    // spawn the expiry sweepers
    let sweep_every = Duration::from_secs(args.sweep_interval.max(1));
    tokio::spawn(expiry_sweeper(
        Arc::clone(state.submit_limiter.registry()),
        "submit",
        sweep_every,
    ));
    tokio::spawn(expiry_sweeper(
        Arc::clone(state.ip_limiter.registry()),
        "ip",
        sweep_every,
    ));

    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(%addr, "join gateway listening");
    info!(
        limit = settings.submit_limit,
        capacity = settings.submit_limiter.capacity,
        window = ?settings.submit_limiter.window,
        "submission rate limit"
    );
    info!(
        limit = settings.ip_limit,
        capacity = settings.ip_limiter.capacity,
        window = ?settings.ip_limiter.window,
        "per-ip rate limit"
    );
    if !settings.registrations_open {
        info!("registrations are closed");
    }

    axum::serve(listener, app).await?;
    Ok(())
}
