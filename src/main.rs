use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vnpay_gateway::cli::{Cli, Commands};
use vnpay_gateway::config::Config;
use vnpay_gateway::{AppState, create_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    if let Some(Commands::Config) = cli.command {
        // `Debug` for Config redacts the secret key.
        println!("{:#?}", config);
        return Ok(());
    }

    let gateway = config.gateway()?;
    tracing::info!(
        merchant_code = %gateway.merchant_code,
        pay_url = %gateway.pay_url,
        "gateway integration configured"
    );

    let state = AppState {
        config: config.clone(),
        gateway,
    };
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
