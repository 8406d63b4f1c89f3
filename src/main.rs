//! Chess client - local hot-seat board and remote match lobby.

use anyhow::Result;
use clap::Parser;
use gpui::{App, Application};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use gpui_chess_client::app;
use gpui_chess_client::config::Cli;
use gpui_chess_client::ui::FileAssets;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,gpui_chess_client=debug")),
        )
        .init();

    let mode = cli.mode();
    let config = cli.server_config();
    info!(?mode, host = %config.host, use_ssl = config.use_ssl, "starting chess client");

    Application::new()
        .with_assets(FileAssets::new())
        .run(move |cx: &mut App| {
            if let Err(e) = app::run(cx, mode, config) {
                error!(error = ?e, "startup failed");
                cx.quit();
            }
        });

    Ok(())
}
