use std::sync::Arc;

use statik::config::Config;
use statik::server;
use statik::site::Site;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let site = Arc::new(Site::from_config(&cfg));

    tokio::select! {
        res = server::listener::run(&cfg, site) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
