use clap::Parser;
use karto_cli::{CommonArgs, print_nodes};
use kartographer::maneuver::{Axis, Increment, ManeuverActuator, PlanState, Sign};
use kartographer::orbits::Ephemeris;
use kartographer::session::FlightSession;

#[derive(Parser)]
#[command(author, version, about = "Edit a vessel's maneuver nodes in a scenario and print the plan")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Remove every node before applying other edits
    #[arg(long, default_value_t = false)]
    delete_all: bool,

    /// Number of nodes to add at the configured lead from now
    #[arg(long, default_value_t = 0)]
    add: u32,

    /// Simulate a tracking station that cannot plan maneuvers
    #[arg(long, default_value_t = false)]
    locked: bool,

    /// Node to edit, 1-based
    #[arg(long)]
    select: Option<usize>,

    /// Delta-v ladder rung 0-5 (0.01 to 1000 m/s)
    #[arg(long)]
    increment: Option<usize>,

    /// Nudge the selected node, e.g. `prograde+`, `normal-`, `radial+` (repeatable)
    #[arg(long, value_parser = parse_nudge)]
    nudge: Vec<(Axis, Sign)>,

    /// Zero one axis of the selected node
    #[arg(long, value_parser = parse_axis)]
    zero: Vec<Axis>,

    /// Move the selected node by whole orbits
    #[arg(long, allow_hyphen_values = true)]
    shift_orbits: Option<i32>,

    /// Re-time the selected node to this many seconds from now
    #[arg(long)]
    retime: Option<f64>,
}

fn parse_axis(s: &str) -> Result<Axis, String> {
    match s.to_ascii_lowercase().as_str() {
        "prograde" | "p" => Ok(Axis::Prograde),
        "normal" | "n" => Ok(Axis::Normal),
        "radial" | "r" => Ok(Axis::Radial),
        other => Err(format!("unknown axis '{other}'")),
    }
}

fn parse_nudge(s: &str) -> Result<(Axis, Sign), String> {
    let (axis, sign) = match s.strip_suffix('+') {
        Some(axis) => (axis, Sign::Plus),
        None => match s.strip_suffix('-') {
            Some(axis) => (axis, Sign::Minus),
            None => return Err(format!("nudge '{s}' must end in + or -")),
        },
    };
    Ok((parse_axis(axis)?, sign))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let loaded = cli.common.load()?;
    let mut host = loaded.host;
    let vessel = loaded.vessel;

    let mut session = FlightSession::new(loaded.settings);
    session.on_scene_enter(vessel.clone(), host.current_ut(), !cli.locked);

    if let Some(index) = cli.increment {
        session.planner_mut().set_increment(Increment::from_index(index));
    }
    if cli.delete_all {
        let removed = session.planner_mut().delete_all(&mut host, &vessel)?;
        println!("Removed {removed} node(s).");
    }
    for _ in 0..cli.add {
        session.add_node(&mut host)?;
    }

    let editing = !cli.nudge.is_empty()
        || !cli.zero.is_empty()
        || cli.shift_orbits.is_some()
        || cli.retime.is_some();
    if cli.select.is_some() || editing {
        let planner = session.planner_mut();
        if let Some(select) = cli.select {
            if let PlanState::HasPlan { count, .. } = planner.sync(&host, &vessel) {
                // Walk forward from the first node.
                planner.reset();
                for _ in 1..select.clamp(1, count) {
                    planner.next(&host, &vessel)?;
                }
            }
        }
        for &(axis, sign) in &cli.nudge {
            planner.adjust_axis(&mut host, &vessel, axis, sign)?;
        }
        for &axis in &cli.zero {
            planner.zero_axis(&mut host, &vessel, axis)?;
        }
        if let Some(count) = cli.shift_orbits {
            planner.shift_by_orbits(&mut host, &vessel, count)?;
        }
        if let Some(seconds) = cli.retime {
            planner.retime_from_now(&mut host, &vessel, seconds)?;
        }
        if let PlanState::HasPlan { index, count } = planner.sync(&host, &vessel) {
            println!("Editing node {} of {count}", index + 1);
        }
    }

    println!("Vessel: {vessel}");
    print_nodes(&host.list_nodes(&vessel), host.current_ut());
    Ok(())
}
