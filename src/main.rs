use mooniform_site::{
    AppState, Site, SiteConfig,
    booking::BookingClient,
    calendar::CalendarClient,
    load_prefs,
    player::{PlaybackSession, Playlist},
    remote::RemoteMedia,
    router,
    shows::ShowsFeed,
};
use std::{net::SocketAddr, time::Duration};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = SiteConfig::from_env();
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let prefs = load_prefs(&config.data_path).await;
    let mut player = PlaybackSession::new(Playlist::default(), RemoteMedia::default());
    player.restore(&prefs);

    let client = reqwest::Client::builder()
        .user_agent(concat!("mooniform-site/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(10))
        .build()?;

    if config.booking_endpoint.is_none() {
        warn!("BOOKING_ENDPOINT not set; booking form is disabled");
    }
    if config.calendar_id.is_none() || config.calendar_api_key.is_none() {
        warn!("CALENDAR_ID or CALENDAR_API_KEY not set; availability check is disabled");
    }

    let state = AppState::new(
        config.data_path.clone(),
        Site { prefs, player },
        ShowsFeed::new(client.clone(), config.shows_csv_url.clone()),
        BookingClient::new(client.clone(), config.booking_endpoint.clone()),
        CalendarClient::new(
            client,
            config.calendar_api_base.clone(),
            config.calendar_id.clone(),
            config.calendar_api_key.clone(),
        ),
    );
    let app = router(state, &config.assets_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
