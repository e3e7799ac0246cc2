use gravtoy::{run_2d, Scenario, ScenarioConfig};

use clap::Parser;
use anyhow::Result;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under scenarios/; the built-in demo scene runs when
    /// omitted
    #[arg(short)]
    file_name: Option<String>,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(file_name);
    let file = File::open(&config_path)?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let scenario = match args.file_name {
        Some(name) => {
            let cfg = load_scenario_from_yaml(&name)?;
            log::info!("loaded scenario {name} with {} planets", cfg.planets.len());
            Scenario::build_scenario(cfg)
        }
        None => {
            log::info!("no scenario given, starting the demo scene");
            Scenario::demo(1000.0)
        }
    };

    run_2d(scenario);

    Ok(())
}
