#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pastebox::telemetry::init();
    let cfg = pastebox::config::Config::load()?;

    let (app, sweeper) = pastebox::build_app(&cfg);

    use tracing::info;
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.port));
    info!(%addr, test_mode = cfg.test_mode, sweep_interval_secs = cfg.sweep_interval_secs, "server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    if let Some(sweeper) = sweeper {
        sweeper.shutdown().await;
    }
    Ok(())
}
