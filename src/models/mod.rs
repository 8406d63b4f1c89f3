mod game;
mod match_model;
mod transport;

pub use game::GameModel;
pub use match_model::{MatchEvent, MatchModel};
pub use transport::WebSocketTransport;
