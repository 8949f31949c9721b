use clap::{Parser, Subcommand};

/// reader-bridge: drive the reader page hooks outside the browser.
#[derive(Parser, Debug)]
#[command(name = "reader-bridge", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log level override (trace, debug, info, warn, error or a filter directive).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a JSON-lines page script against an in-memory page.
    Replay {
        /// Script path, one step per line.
        script: String,
    },

    /// Print the image URL and layout class for one viewport.
    Resolve {
        #[arg(long)]
        base_url: Option<String>,

        #[arg(long)]
        comic_id: Option<String>,

        #[arg(long)]
        current_page: Option<String>,

        #[arg(long)]
        width: f64,

        #[arg(long)]
        height: f64,
    },

    /// Print the effective configuration as JSON.
    Config,

    /// Print the JavaScript that registers the LiveView hooks.
    Shim,
}

pub fn parse() -> Args {
    Args::parse()
}
