use scoreboard_server::config::Config;
use scoreboard_server::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = Config::from_env()?;
    let (app, _state) = scoreboard_server::build_app(&config).await?;

    let addr = config.bind_addr();
    tracing::info!(%addr, database = %config.database_url, "listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
