use std::path::PathBuf;

use clap::Parser;
use comms::RoomId;

/// Terminal client for a word race room
#[derive(Debug, Clone, Parser)]
#[command(name = "player", version, about)]
pub struct Settings {
    /// Address of the relay broker
    #[arg(short, long, env = "PLAYER_BROKER", default_value = "localhost:8080")]
    pub broker: String,
    /// Room to join
    #[arg(short, long, env = "PLAYER_ROOM", default_value_t = 1)]
    pub room: RoomId,
    /// Keyword of the round, words are associated with it
    #[arg(short, long, env = "PLAYER_KEYWORD")]
    pub keyword: String,
    #[arg(short, long, env = "PLAYER_NICKNAME", default_value = "guest")]
    pub nickname: String,
    /// Write logs to this file, nothing is logged otherwise
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
