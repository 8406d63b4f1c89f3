//! Application setup and window creation.

use anyhow::{Context as _, Result};
use gpui::{App, Bounds, WindowBounds, WindowOptions, prelude::*, px, size};
use gpui_component::Root;
use tracing::info;

use crate::config::{Mode, ServerConfig};
use crate::domain::MatchId;
use crate::models::{GameModel, MatchModel};
use crate::ui::views::{ChessBoardView, MatchView};

/// Initialize the UI and open the window for `mode`
pub fn run(cx: &mut App, mode: Mode, config: ServerConfig) -> Result<()> {
    gpui_component::init(cx);

    match mode {
        Mode::Local => open_board(cx),
        Mode::NewMatch => open_match(cx, config, None),
        Mode::Join { id } => open_match(cx, config, Some(id)),
    }
}

fn window_options(cx: &App, width: f32, height: f32) -> WindowOptions {
    let bounds = Bounds::centered(None, size(px(width), px(height)), cx);
    WindowOptions {
        window_bounds: Some(WindowBounds::Windowed(bounds)),
        ..Default::default()
    }
}

/// Hot-seat board: both players share this window
fn open_board(cx: &mut App) -> Result<()> {
    info!("opening local board");
    let model = cx.new(|_| GameModel::new());

    let options = window_options(cx, 900.0, 600.0);
    cx.open_window(options, |window, cx| {
        let view = cx.new(|cx| ChessBoardView::new(model, cx));
        view.read(cx).focus_initial(window);
        cx.new(|cx| Root::new(view, window, cx))
    })
    .context("failed to open board window")?;
    Ok(())
}

/// Match lobby, either for a new match or for `join`
fn open_match(cx: &mut App, config: ServerConfig, join: Option<MatchId>) -> Result<()> {
    info!(host = %config.host, ?join, "opening match lobby");
    let model = cx.new(|_| MatchModel::new(config));
    model.update(cx, |model, cx| match join {
        Some(id) => model.join(id, cx),
        None => model.start(cx),
    });

    let options = window_options(cx, 480.0, 520.0);
    cx.open_window(options, |window, cx| {
        let view = cx.new(|cx| MatchView::new(model, cx));
        cx.new(|cx| Root::new(view, window, cx))
    })
    .context("failed to open match window")?;
    Ok(())
}
