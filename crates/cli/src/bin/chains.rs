use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use karto_cli::{CommonArgs, display_path, print_nodes};
use kartographer::common::time::{format_duration, format_number};
use kartographer::export::chains::{ChainFile, load_chains, save_chains};
use kartographer::export::table::write_table;
use kartographer::export::writer_for_path;
use kartographer::maneuver::ManeuverActuator;
use kartographer::orbits::Ephemeris;
use kartographer::session::FlightSession;

#[derive(Parser)]
#[command(author, version, about = "Store, list, export and restore maneuver chains")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Existing chain library to start from
    #[arg(long)]
    input: Option<PathBuf>,

    /// Store the vessel's live plan into the library
    #[arg(long, default_value_t = false)]
    store: bool,

    /// Replace the live plan with the stored chain at this index (0-based)
    #[arg(long)]
    restore: Option<usize>,

    /// Where to write the library (`-` for stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Format {
    Json,
    Csv,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let loaded = cli.common.load()?;
    let mut host = loaded.host;
    let vessel = loaded.vessel;
    let now = host.current_ut();

    let mut session = FlightSession::new(loaded.settings);
    session.on_scene_enter(vessel.clone(), now, true);

    if let Some(path) = &cli.input {
        let file = load_chains(path).with_context(|| format!("reading {}", path.display()))?;
        *session.stored_mut() = file.chains;
    }
    if cli.store {
        let index = session.store_plan(&host)?;
        eprintln!("Stored live plan as chain {index}.");
    }
    if let Some(index) = cli.restore {
        let restored = session.restore_plan(&mut host, index)?;
        eprintln!("Restored {restored} burn(s) from chain {index}.");
    }

    match &cli.output {
        Some(path) => {
            let stored = session.stored();
            match cli.format {
                Format::Json => {
                    let file = ChainFile::new(vessel.as_str(), now, stored.clone());
                    save_chains(path, &file)?;
                }
                Format::Csv => {
                    let mut writer = writer_for_path(path)?;
                    write_table(writer.as_mut(), stored)?;
                }
            }
            eprintln!("Wrote {} chain(s) to {}", stored.len(), display_path(path));
        }
        None => {
            for (index, chain) in session.stored().iter().enumerate() {
                let until = chain
                    .time_until_first(now)
                    .map(format_duration)
                    .unwrap_or_default();
                println!(
                    "chain {index}: {} burn(s), {}m/s, first burn in {until}",
                    chain.len(),
                    format_number(chain.total_delta_v()),
                );
            }
            println!("Vessel: {vessel}");
            print_nodes(&host.list_nodes(&vessel), now);
        }
    }
    Ok(())
}
