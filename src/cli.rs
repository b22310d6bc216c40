// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wooting_analog::KeycodeType;

#[derive(Parser)]
#[command(name = "wooting_analog")]
#[command(author, version, about = "Read analog keyboards through the Wooting analog wrapper")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (default: ~/.config/wooting-analog/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the wrapper library (overrides config)
    #[arg(long, global = true, value_name = "PATH")]
    pub library: Option<PathBuf>,

    /// Use a simulated keyboard instead of the native library
    #[arg(long, global = true)]
    pub mock: bool,

    /// Keycode mode: HID, ScanCode1, VirtualKey or VirtualKeyTranslate
    #[arg(long, global = true)]
    pub mode: Option<KeycodeType>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show library state and connected devices
    #[command(visible_alias = "s")]
    Status,

    /// List connected devices
    #[command(visible_aliases = ["list", "ls"])]
    Devices {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read the analog value of a single key
    #[command(visible_alias = "r")]
    Read {
        /// Key name (W, Space, ArrowUp, ...) or code (26, 0x1A)
        key: String,

        /// Only read from this device ID
        #[arg(short, long)]
        device: Option<u64>,
    },

    /// Print pressed keys and their depth until Ctrl-C
    #[command(visible_alias = "w")]
    Watch {
        /// Only read from this device ID
        #[arg(short, long)]
        device: Option<u64>,

        /// Poll interval in milliseconds (overrides config)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Print device connect/disconnect events until Ctrl-C
    #[command(visible_alias = "e")]
    Events,

    /// Write the effective configuration to the config file
    SaveConfig,
}
