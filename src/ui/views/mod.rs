mod board_view;
mod match_view;
mod status_panel;

pub use board_view::ChessBoardView;
pub use match_view::MatchView;
pub use status_panel::render_status_panel;
