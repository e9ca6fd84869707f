//! Shared plumbing for the command-line front-ends.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use kartographer::common::ids::VesselId;
use kartographer::common::time::{format_duration, format_number, format_ut};
use kartographer::config::{Settings, load_settings};
use kartographer::maneuver::ManeuverNode;
use kartographer::scenario::load_scenario;
use kartographer::sim::SimHost;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Options every binary accepts.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Scenario file describing bodies and vessels
    #[arg(long, default_value = "data/scenarios/kerbin.yaml")]
    pub scenario: PathBuf,

    /// Settings file (YAML or TOML); built-in defaults when omitted
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Vessel id (defaults to the lowest id in the scenario)
    #[arg(long)]
    pub vessel: Option<String>,
}

/// Loaded scenario plus the resolved settings and vessel.
pub struct Loaded {
    pub host: SimHost,
    pub settings: Settings,
    pub vessel: VesselId,
}

impl CommonArgs {
    /// Load settings, start logging, then load the scenario.
    pub fn load(&self) -> anyhow::Result<Loaded> {
        let settings = match &self.settings {
            Some(path) => load_settings(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };
        init_logging(&settings.logging.filter);

        let host = load_scenario(&self.scenario)
            .with_context(|| format!("loading scenario {}", self.scenario.display()))?;
        let vessel = match &self.vessel {
            Some(id) => VesselId::new(id.clone()),
            None => host
                .vessel_ids()
                .next()
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("scenario {} has no vessels", self.scenario.display()))?,
        };
        if host.vessel(&vessel).is_none() {
            anyhow::bail!("vessel '{vessel}' not found in {}", self.scenario.display());
        }
        Ok(Loaded {
            host,
            settings,
            vessel,
        })
    }
}

/// Log to stderr; `RUST_LOG` overrides the configured filter.
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A second initialisation in the same process is harmless; keep the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Print the live node list in a fixed-width table.
pub fn print_nodes(nodes: &[ManeuverNode], now: f64) {
    if nodes.is_empty() {
        println!("No maneuver nodes.");
        return;
    }
    println!(
        "{:>3}  {:<24} {:<24} {:>10} {:>10} {:>10} {:>12}",
        "#", "UT", "T-", "radial", "normal", "prograde", "|dv| m/s"
    );
    for (i, node) in nodes.iter().enumerate() {
        let dv = node.burn.delta_v;
        println!(
            "{:>3}  {:<24} {:<24} {:>10.2} {:>10.2} {:>10.2} {:>12}",
            i + 1,
            format_ut(node.burn.ut),
            format_duration(node.time_to(now)),
            dv.radial,
            dv.normal,
            dv.prograde,
            format_number(node.burn.magnitude()),
        );
    }
    let total: f64 = nodes.iter().map(|node| node.burn.magnitude()).sum();
    println!("Total dv: {}m/s", format_number(total));
}

pub fn display_path(path: &Path) -> String {
    if path == Path::new("-") {
        "stdout".to_owned()
    } else {
        path.display().to_string()
    }
}
