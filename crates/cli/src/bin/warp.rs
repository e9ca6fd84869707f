use clap::{ArgGroup, Parser, ValueEnum};
use karto_cli::CommonArgs;
use kartographer::common::ids::VesselId;
use kartographer::common::time::{format_duration, format_ut};
use kartographer::maneuver::ManeuverLead;
use kartographer::orbits::Ephemeris;
use kartographer::session::FlightSession;
use kartographer::warp::{OrbitEvent, WatchdogOutcome, available_events};

#[derive(Parser)]
#[command(author, version, about = "Warp a scenario vessel to an instant and watch for overshoot")]
#[command(group(ArgGroup::new("goal").required(true).args(["to", "by", "event", "maneuver", "list_events"])))]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Absolute target UT (s)
    #[arg(long)]
    to: Option<f64>,

    /// Target relative to the scenario clock (s)
    #[arg(long)]
    by: Option<f64>,

    /// Orbit event to warp to
    #[arg(long, value_enum)]
    event: Option<EventArg>,

    /// Which SOI change to use with `--event soi` (0 = next)
    #[arg(long, default_value_t = 0)]
    soi_index: usize,

    /// Target vessel for node events (defaults to the vessel's own target)
    #[arg(long)]
    target: Option<String>,

    /// Stop this far ahead of the first maneuver node
    #[arg(long, value_enum)]
    maneuver: Option<LeadArg>,

    /// List the events currently available and exit
    #[arg(long, default_value_t = false)]
    list_events: bool,

    /// Make the simulated host overshoot its warp target
    #[arg(long, default_value_t = false)]
    stall: bool,

    /// Real seconds per physics tick
    #[arg(long, default_value_t = 0.02)]
    dt: f64,

    /// Give up after this many ticks
    #[arg(long, default_value_t = 1_000_000)]
    max_ticks: u64,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum EventArg {
    Ap,
    Pe,
    AtmoEntry,
    AtmoExit,
    Soi,
    Transition,
    An,
    Dn,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum LeadArg {
    #[value(name = "1m")]
    OneMinute,
    #[value(name = "10m")]
    TenMinutes,
    #[value(name = "1h")]
    OneHour,
    #[value(name = "1d")]
    OneDay,
}

impl EventArg {
    fn event(self, soi_index: usize) -> OrbitEvent {
        match self {
            Self::Ap => OrbitEvent::Apoapsis,
            Self::Pe => OrbitEvent::Periapsis,
            Self::AtmoEntry => OrbitEvent::AtmosphereEntry,
            Self::AtmoExit => OrbitEvent::AtmosphereExit,
            Self::Soi => OrbitEvent::SoiTransition(soi_index),
            Self::Transition => OrbitEvent::PatchEnd,
            Self::An => OrbitEvent::AscendingNode,
            Self::Dn => OrbitEvent::DescendingNode,
        }
    }
}

impl From<LeadArg> for ManeuverLead {
    fn from(value: LeadArg) -> Self {
        match value {
            LeadArg::OneMinute => ManeuverLead::OneMinute,
            LeadArg::TenMinutes => ManeuverLead::TenMinutes,
            LeadArg::OneHour => ManeuverLead::OneHour,
            LeadArg::OneDay => ManeuverLead::OneDay,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let loaded = cli.common.load()?;
    let mut host = loaded.host;
    let vessel = loaded.vessel;
    host.set_stall_warp(cli.stall);

    let target = cli
        .target
        .clone()
        .map(VesselId::new)
        .or_else(|| host.target_of(&vessel).cloned());

    if cli.list_events {
        for event in available_events(&host, &vessel, target.as_ref()) {
            println!("{event}");
        }
        return Ok(());
    }

    let mut session = FlightSession::new(loaded.settings);
    let start = host.current_ut();
    session.on_scene_enter(vessel.clone(), start, true);

    let request = if let Some(ut) = cli.to {
        let editor = session.editor_mut();
        editor.set_from_now(start, ut - start);
        session.engage_editor(&mut host)
    } else if let Some(seconds) = cli.by {
        session.warp_by(&mut host, seconds)
    } else if let Some(event) = cli.event {
        session.warp_to_event(&mut host, event.event(cli.soi_index), target.as_ref())?
    } else if let Some(lead) = cli.maneuver {
        session.warp_to_first_maneuver(&mut host, lead.into())?
    } else {
        anyhow::bail!("nothing to warp to");
    };

    println!("Start:  {}", format_ut(start));
    println!("Target: {}", format_ut(request.ut));

    let mut forced = 0;
    let mut ticks = 0;
    while session.warp().is_armed() && ticks < cli.max_ticks {
        host.tick(cli.dt);
        if session.on_physics_tick(&mut host) == WatchdogOutcome::Forced {
            forced += 1;
        }
        ticks += 1;
    }
    if session.warp().is_armed() {
        anyhow::bail!("warp still running after {ticks} ticks");
    }

    let end = host.current_ut();
    println!("Stopped: {}", format_ut(end));
    println!("Overshoot: {}", format_duration(end - request.ut));
    println!("Forced stops: {forced}");
    Ok(())
}
