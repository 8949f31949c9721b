mod cli;
mod replay;

use std::path::Path;
use std::process::ExitCode;

use reader_config::BridgeConfig;
use reader_common::ViewportState;
use reader_hooks::responsive_image::{resolve, ImageDescriptor};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::Command;
use replay::Replay;

fn load_config(path: Option<&str>) -> (BridgeConfig, Option<String>) {
    let loaded = match path {
        Some(path) => reader_config::load_from_path(Path::new(path)),
        None => reader_config::load_config(),
    };
    match loaded {
        Ok(config) => (config, None),
        Err(e) => (BridgeConfig::default(), Some(e.to_string())),
    }
}

fn init_logging(directive: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();
}

fn print_json<T: serde::Serialize>(value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(line) => {
            println!("{line}");
            true
        }
        Err(e) => {
            tracing::error!("Failed to serialize output: {e}");
            false
        }
    }
}

fn main() -> ExitCode {
    let args = cli::parse();

    // Config first so its log level can apply
    let (config, config_error) = load_config(args.config.as_deref());
    let directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.as_directive().to_string());
    init_logging(&directive);

    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {path}");
    }
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    match args.command {
        Command::Replay { script } => {
            let text = match std::fs::read_to_string(&script) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("Failed to read {script}: {e}");
                    return ExitCode::FAILURE;
                }
            };
            let mut replay = Replay::new(config);
            match replay.run_script(&text) {
                Ok(entries) => {
                    for entry in &entries {
                        if !print_json(entry) {
                            return ExitCode::FAILURE;
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("Replay failed: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        Command::Resolve {
            base_url,
            comic_id,
            current_page,
            width,
            height,
        } => {
            let descriptor = ImageDescriptor {
                base_url,
                comic_id,
                current_page,
            };
            let resolved = resolve(&descriptor, ViewportState::new(width, height), &config.image);
            if !print_json(&resolved) {
                return ExitCode::FAILURE;
            }
        }
        Command::Config => println!("{}", reader_config::config_to_json(&config)),
        Command::Shim => print!("{}", reader_web::HOOKS_SHIM),
    }

    ExitCode::SUCCESS
}
