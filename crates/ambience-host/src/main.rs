//! Ambience Host - drives the playback engine from a terminal
//!
//! This binary stands in for the browser side of the system. It:
//! 1. Opens the YAML settings store (and watches it for external edits)
//! 2. Spawns the playback service with an in-process audio surface
//! 3. Reads page lifecycle and settings commands from stdin
//!
//! ## Command line flags
//!
//! - `--config <path>`: Host configuration file (default ~/.config/ambience/host.yaml)

mod commands;
mod config;
mod playback;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use ambience_core::config::{load_config, ConfigStore, Setting, YamlStore};
use ambience_core::pages::{PageAction, PageRouter, SitePattern};
use ambience_core::services::{EngineClient, PlaybackService};
use ambience_core::surface::{LocalSurfaceHost, PlaybackPrimitive, SurfaceHost};

use commands::{HostCommand, HELP};
use config::HostConfig;
use playback::FilePlayback;

fn main() -> Result<()> {
    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config_path = args
        .iter()
        .position(|arg| arg == "--config")
        .map(|i| {
            args.get(i + 1)
                .map(PathBuf::from)
                .ok_or_else(|| anyhow!("--config needs a path"))
        })
        .transpose()?
        .unwrap_or_else(config::default_host_config_path);

    log::info!("ambience-host starting up");
    let host_config: HostConfig = load_config(&config_path);

    let store = Arc::new(
        YamlStore::open(&host_config.settings_path)
            .with_context(|| format!("Failed to open settings {:?}", host_config.settings_path))?,
    );
    if host_config.watch_settings {
        if let Err(e) = store.watch() {
            log::warn!("Settings file watch unavailable: {}", e);
        }
    }

    let surface_host = Arc::new(LocalSurfaceHost::new(
        Box::new(|| Box::new(FilePlayback::new()) as Box<dyn PlaybackPrimitive>),
        host_config.asset_root.clone(),
    ));

    let handle = PlaybackService::spawn(store.clone(), surface_host.clone(), surface_host.clone())
        .map_err(|e| anyhow!(e))?;
    let client = EngineClient::new(&handle);
    surface_host.connect_settings(Arc::new(client.clone()));

    let router = PageRouter::new(Box::new(SitePattern::new(
        host_config.qualifying_hosts.iter().cloned(),
    )));

    println!("ambience-host ready ({}). Type 'help' for commands.", store.path().display());

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match commands::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        if command == HostCommand::Quit {
            break;
        }
        if let Err(e) = execute(command, &client, &router, store.as_ref()) {
            eprintln!("error: {:#}", e);
        }
    }

    client.shutdown().map_err(|e| anyhow!(e))?;
    handle.join();
    if surface_host.close_surface().is_ok() {
        log::info!("Audio surface closed on exit");
    }
    log::info!("ambience-host stopped");
    Ok(())
}

fn execute(
    command: HostCommand,
    client: &EngineClient,
    router: &PageRouter,
    store: &dyn ConfigStore,
) -> Result<()> {
    match command {
        HostCommand::Page(event) => match router.route(&event) {
            PageAction::Qualified(page) => client.page_qualified(page),
            PageAction::Closed(page) => client.page_closed(page),
        }
        .map_err(|e| anyhow!(e))?,
        HostCommand::Open(page) => client.page_qualified(page).map_err(|e| anyhow!(e))?,
        HostCommand::SetEnabled(enabled) => store.write(&[Setting::Enabled(enabled)])?,
        HostCommand::SetVolume(volume) => store.write(&[Setting::Volume(volume)])?,
        HostCommand::SetTrack(track) => store.write(&[Setting::Track(track)])?,
        HostCommand::Restart => client.restart().map_err(|e| anyhow!(e))?,
        HostCommand::Status => {
            let status = client.status().map_err(|e| anyhow!(e))?;
            let settings = store.snapshot()?;
            let pages: Vec<String> = status.active_pages.iter().map(|p| p.to_string()).collect();
            println!(
                "enabled={} volume={} track={}",
                settings.enabled, settings.volume, settings.track
            );
            println!("active pages: [{}]", pages.join(", "));
            println!("surface: {:?}", status.surface);
            match status.last_directive {
                Some(directive) => println!("last directive: {}", directive),
                None => println!("last directive: none"),
            }
        }
        HostCommand::Help => println!("{}", HELP),
        HostCommand::Quit => {}
    }
    Ok(())
}
