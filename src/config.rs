//! Command line and server configuration.

use clap::{ArgAction, Parser, Subcommand};

use crate::domain::MatchId;

/// Chess board client - play locally or against a remote opponent
#[derive(Parser, Debug)]
#[command(name = "gpui-chess-client")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Match server host (and port)
    #[arg(long, env = "CHERS_SERVER_HOST", default_value = "localhost:3000")]
    pub server_host: String,

    /// Use https/wss instead of http/ws
    #[arg(long, env = "CHERS_USE_SSL", default_value_t = false, action = ArgAction::Set)]
    pub use_ssl: bool,

    #[command(subcommand)]
    pub mode: Option<Mode>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Both players share this board (default)
    Local,
    /// Ask the server for a new match and connect to it
    NewMatch,
    /// Connect to an existing match
    Join {
        /// Match id handed out by the server
        id: MatchId,
    },
}

impl Cli {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.server_host.clone(),
            use_ssl: self.use_ssl,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode.clone().unwrap_or(Mode::Local)
    }
}

/// Where the match server lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub use_ssl: bool,
}

impl ServerConfig {
    pub fn http_base(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{scheme}://{}", self.host)
    }

    pub fn ws_base(&self) -> String {
        let scheme = if self.use_ssl { "wss" } else { "ws" };
        format!("{scheme}://{}", self.host)
    }

    pub fn new_match_url(&self) -> String {
        format!("{}/matches/new", self.http_base())
    }

    pub fn play_url(&self, id: MatchId) -> String {
        format!("{}/matches/{id}/play", self.ws_base())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost:3000".to_string(),
            use_ssl: false,
        }
    }
}
