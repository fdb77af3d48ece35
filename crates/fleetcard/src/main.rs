use clap::Parser;
use colored::Colorize;
use fleetcar_config::AppConfig;
use fleetcard::StartupOptions;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fleetcard")]
#[command(about = "フリートと車両の割り当てを管理する HTTP サービス", version)]
struct Cli {
    /// 設定ファイル (TOML)
    #[arg(short, long, env = "FM_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// 待ち受けポート (FM_EXPOSE_PORT より優先)
    #[arg(short, long)]
    port: Option<u16>,

    /// 起動時に全フリートを削除してから初期フリートを作り直す
    #[arg(long)]
    reset_store: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.expose_port = port;
    }

    let app = fleetcard::build(
        &config,
        StartupOptions {
            reset_store: cli.reset_store,
        },
    )
    .await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.expose_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!(
        "{} listening on {}",
        "fleetcard".green().bold(),
        addr.to_string().cyan()
    );
    info!(%addr, local_setup = config.local_setup, "Server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    println!("{}", "shutting down...".yellow());
}
