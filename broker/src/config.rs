use clap::Parser;

/// Relay broker for word race rooms
#[derive(Debug, Clone, Parser)]
#[command(name = "broker", version, about)]
pub struct Settings {
    /// Port to accept participants on
    #[arg(short, long, env = "BROKER_PORT", default_value_t = 8080)]
    pub port: u16,
}
