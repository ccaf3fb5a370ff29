//! Headless scenario generator
//!
//! Builds a rectangular plot from the command line (or loads one from a JSON
//! file), runs the three-variant scenario batch, and prints a report.

use std::path::PathBuf;

use clap::Parser;

use siteplan::core::config::EngineConfig;
use siteplan::core::error::Result;
use siteplan::core::types::{ParkingKind, Typology, UtilityKind};
use siteplan::pipeline::GenerationParams;
use siteplan::plot::model::Plot;
use siteplan::plot::persist::plot_from_json;
use siteplan::scenario::ScenarioEngine;

#[derive(Parser, Debug)]
#[command(name = "generate")]
#[command(about = "Generate site-layout scenarios for a plot")]
struct Args {
    /// Plot JSON file; when omitted a rectangular plot is built from
    /// --width/--depth
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Plot width in metres
    #[arg(long, default_value_t = 100.0)]
    width: f64,

    /// Plot depth in metres
    #[arg(long, default_value_t = 80.0)]
    depth: f64,

    /// Setback distance in metres
    #[arg(long, default_value_t = 4.0)]
    setback: f64,

    /// Typologies to place (point, slab, l, t, u, h, perimeter)
    #[arg(long, value_delimiter = ',', default_value = "point,slab")]
    typologies: Vec<String>,

    /// Utilities to attach (hvac, electrical, stp, wtp, water, fire, gas, roads)
    #[arg(long, value_delimiter = ',')]
    utilities: Vec<String>,

    /// Parking kinds (surface, underground, stilt)
    #[arg(long, value_delimiter = ',')]
    parking: Vec<String>,

    /// Enable vastu sector bias
    #[arg(long)]
    vastu: bool,

    /// Structural seed for deterministic runs
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Optional TOML config overriding the built-in constants
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("siteplan=debug")
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_toml(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };

    let plot = match &args.plot {
        Some(path) => plot_from_json(&std::fs::read_to_string(path)?)?,
        None => Plot::rectangular("cli-plot", args.width, args.depth, args.setback),
    };

    let params = GenerationParams {
        typologies: args.typologies.iter().filter_map(|s| parse_typology(s)).collect(),
        utilities: args.utilities.iter().filter_map(|s| parse_utility(s)).collect(),
        parking: args.parking.iter().filter_map(|s| parse_parking(s)).collect(),
        vastu: args.vastu,
        seed: args.seed,
        ..Default::default()
    };

    let mut engine = ScenarioEngine::new(config);
    engine.generate_scenarios_with(&plot, &params, |scenario| {
        println!("== {} ==", scenario.name);
        println!("  buildings: {}", scenario.plot.buildings.len());
        for building in &scenario.plot.buildings {
            println!(
                "    {:?}  {:.0} m2  {} floors  {:.1} m",
                building.typology,
                building.footprint_area(),
                building.counted_floors(),
                building.height()
            );
        }
        let green: f64 = scenario.plot.green_areas.iter().map(|g| g.area).sum();
        println!("  green area: {green:.0} m2");
        println!("  parking areas: {}", scenario.plot.parking_areas.len());
        println!("  utility zones: {}", scenario.plot.utility_areas.len());
        for notice in &scenario.notices {
            println!("  notice: {notice}");
        }
    })?;

    Ok(())
}

fn parse_typology(s: &str) -> Option<Typology> {
    match s.trim().to_ascii_lowercase().as_str() {
        "point" => Some(Typology::Point),
        "slab" => Some(Typology::Slab),
        "l" | "lshaped" => Some(Typology::LShaped),
        "t" | "tshaped" => Some(Typology::TShaped),
        "u" | "ushaped" => Some(Typology::UShaped),
        "h" | "hshaped" => Some(Typology::HShaped),
        "perimeter" => Some(Typology::Perimeter),
        other => {
            eprintln!("unknown typology: {other}");
            None
        }
    }
}

fn parse_utility(s: &str) -> Option<UtilityKind> {
    match s.trim().to_ascii_lowercase().as_str() {
        "hvac" => Some(UtilityKind::Hvac),
        "electrical" => Some(UtilityKind::Electrical),
        "stp" => Some(UtilityKind::Stp),
        "wtp" => Some(UtilityKind::Wtp),
        "water" => Some(UtilityKind::WaterTank),
        "fire" => Some(UtilityKind::FireTank),
        "gas" => Some(UtilityKind::Gas),
        "roads" => Some(UtilityKind::Roads),
        other => {
            eprintln!("unknown utility: {other}");
            None
        }
    }
}

fn parse_parking(s: &str) -> Option<ParkingKind> {
    match s.trim().to_ascii_lowercase().as_str() {
        "surface" => Some(ParkingKind::Surface),
        "underground" => Some(ParkingKind::Underground),
        "stilt" => Some(ParkingKind::Stilt),
        other => {
            eprintln!("unknown parking kind: {other}");
            None
        }
    }
}
