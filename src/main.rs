//! mediatree - browse media shared by MediaServer2 peers on the session bus
//!
//! This is the binary entry point. All logic lives in the library.

use clap::Parser;
use mediatree::config::{load_settings, Settings};

/// Browse media shared by MediaServer2 peers on the session bus
#[derive(Parser, Debug)]
#[command(name = "mediatree")]
#[command(about = "Browse media shared by MediaServer2 peers on the session bus", long_about = None)]
struct Args {
    /// Container levels below the roots to expand (0 = roots only)
    #[arg(long)]
    depth: Option<u32>,

    /// Children fetched per listing call (first page only)
    #[arg(long)]
    max_children: Option<u32>,

    /// Idle window in milliseconds before unanswered requests are abandoned
    #[arg(long)]
    wait_ms: Option<u64>,
}

impl Args {
    /// File settings with CLI overrides applied on top
    fn into_settings(self, mut settings: Settings) -> Settings {
        if let Some(depth) = self.depth {
            settings.depth = depth;
        }
        if let Some(max_children) = self.max_children {
            settings.max_children = max_children;
        }
        if let Some(wait_ms) = self.wait_ms {
            settings.wait_ms = wait_ms;
        }
        settings
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    mediatree_core::logging::init()?;

    let args = Args::parse();
    let settings = args.into_settings(load_settings()?);

    mediatree::run(settings).await?;
    Ok(())
}
