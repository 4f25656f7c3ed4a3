/// Knots Terminal Viewer
///
/// Shows the left- and right-handed trefoil knots side by side.
/// Controls:
///   - Drag with the left mouse button on either half: rotate that knot
///   - Q/ESC: Quit

use anyhow::{Context, Result};
use clap::Parser;
use knots_terminal::{init_logging, LoggingConfig, TerminalApp};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "knots-terminal")]
#[command(about = "Rotate two chiral trefoil knots in the terminal")]
struct Cli {
    /// Directory containing `public/chiral_trefoil_knots_*.{obj,mtl}`
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Log filter, env_logger syntax (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log,
        ..LoggingConfig::default()
    });

    let mut app = TerminalApp::new(cli.assets, cli.fps).context("failed to query terminal size")?;
    app.run().context("terminal viewer failed")?;

    Ok(())
}
