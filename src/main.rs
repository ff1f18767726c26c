use log::info;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use thread_messenger::integration;
use thread_messenger::state::AppState;

#[tokio::main]
async fn main() -> Result<(), integration::Error> {
    let config = integration::Config::env()?;
    config.init_logger()?;

    let state = AppState::init(&config)?;

    let app = thread_messenger::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(config.cors());

    let addr = config.env.addr();
    info!("{} listening on {addr}", config.service_name);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
