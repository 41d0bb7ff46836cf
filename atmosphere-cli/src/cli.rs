use anyhow::Context;
use atmosphere_core::{Config, Controller, Coordinates, controller_from_config, interpretation};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::{sync::Arc, time::Duration};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{configure, render};

/// ANSI: clear screen and move the cursor home.
const CLEAR: &str = "\x1b[2J\x1b[H";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "atmosphere", version, about = "Local weather dashboard with AI tips")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the advisor API key and location source.
    Configure,

    /// Run one refresh cycle and print the dashboard.
    Show {
        #[command(flatten)]
        at: LocationArgs,

        /// Print the view state as JSON instead of the dashboard.
        #[arg(long)]
        json: bool,
    },

    /// Live dashboard. Enter refreshes, `q` quits.
    Watch {
        #[command(flatten)]
        at: LocationArgs,
    },

    /// List the known weather codes.
    Codes,
}

/// Coordinates given on the command line override the configured location.
#[derive(Debug, clap::Args)]
pub struct LocationArgs {
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

impl LocationArgs {
    fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.lat?, self.lon?))
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure::run(),
            Command::Show { at, json } => show(load_config(&at)?, json).await,
            Command::Watch { at } => watch(load_config(&at)?).await,
            Command::Codes => {
                for (code, interp) in interpretation::entries() {
                    println!("{code:>3}  {}  {}", interp.icon, interp.label);
                }
                Ok(())
            }
        }
    }
}

fn load_config(at: &LocationArgs) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    config.apply_env();

    if let Some(coords) = at.coordinates() {
        config.location.set_fixed(coords);
    }

    tracing::debug!(
        location = %config.location.source,
        advisor = config.is_advisor_configured(),
        "configuration loaded"
    );
    Ok(config)
}

async fn show(config: Config, json: bool) -> anyhow::Result<()> {
    let controller = controller_from_config(&config);
    controller.refresh().await;
    let state = controller.state();

    if json {
        let text = serde_json::to_string_pretty(&state).context("Failed to serialize view state")?;
        println!("{text}");
    } else {
        print!(
            "{}",
            render::render_dashboard(&state, &Local::now(), "Run `atmosphere show` again to retry.")
        );
    }

    Ok(())
}

async fn watch(config: Config) -> anyhow::Result<()> {
    let controller = Arc::new(controller_from_config(&config));
    let mut updates = controller.subscribe();
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut clock = tokio::time::interval(Duration::from_secs(1));

    spawn_refresh(&controller);

    loop {
        tokio::select! {
            _ = clock.tick() => {}
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            line = input.next_line() => {
                match line.context("Failed to read from stdin")? {
                    Some(cmd) if cmd.trim().eq_ignore_ascii_case("q") => break,
                    Some(_) => spawn_refresh(&controller),
                    None => break,
                }
            }
        }

        let state = updates.borrow_and_update().clone();
        println!(
            "{CLEAR}{}Enter: refresh · q: quit",
            render::render_dashboard(&state, &Local::now(), "Press Enter to retry.")
        );
    }

    Ok(())
}

fn spawn_refresh(controller: &Arc<Controller>) {
    let controller = Arc::clone(controller);
    tokio::spawn(async move { controller.refresh().await });
}
