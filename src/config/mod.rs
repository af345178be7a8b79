pub mod settings;

pub use settings::BoardSettings;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "slotboard")]
#[command(about = "Kiosk availability board for a single bookable resource")]
pub struct CliConfig {
    /// Path to the TOML settings file.
    #[arg(long, default_value = "slotboard.toml")]
    pub config: String,

    /// Override the configured listen port.
    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
