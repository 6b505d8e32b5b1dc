// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "scroll-backdrop")]
#[command(about = "Animated 3D page backdrop driven by scroll and pointer", long_about = None)]
pub struct Cli {
    /// JSON file overriding the default scene tuning
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Skip GPU setup and run the disabled backdrop
    #[arg(long = "disable-gpu", default_value = "false")]
    pub disable_gpu: bool,

    /// Exit after this many frames
    #[arg(long)]
    pub frames: Option<u64>,
}
