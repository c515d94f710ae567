//! Scenario command - write default or random setups to JSON

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use leaders_core::Scenario;

use crate::Level;

#[derive(Args)]
pub struct ScenarioArgs {
    /// Output JSON file
    #[arg(long, value_name = "FILE")]
    pub output: PathBuf,

    /// Escort units per side for a random setup (default setup when omitted)
    #[arg(long)]
    pub random: Option<usize>,

    /// Scenario name
    #[arg(long)]
    pub name: Option<String>,

    /// Difficulty stored for the computer-controlled seat
    #[arg(long, value_enum)]
    pub ai: Option<Level>,
}

pub fn run(args: ScenarioArgs, seed: Option<u64>) -> Result<()> {
    let mut scenario = build_scenario(&args, seed);
    scenario.ai_difficulty = args.ai.map(Into::into);

    scenario
        .to_game_state(leaders_core::GameId(0))
        .context("Generated scenario is not playable")?;
    scenario.save(&args.output)?;

    tracing::info!("Wrote scenario '{}' to {}", scenario.name, args.output.display());
    Ok(())
}

fn build_scenario(args: &ScenarioArgs, seed: Option<u64>) -> Scenario {
    match args.random {
        Some(units) => {
            let mut rng = match seed {
                Some(s) => ChaCha8Rng::seed_from_u64(s),
                None => ChaCha8Rng::from_entropy(),
            };
            let name = args.name.clone().unwrap_or_else(|| "random".to_string());
            Scenario::random_symmetric(&mut rng, &name, units)
        }
        None => {
            let mut scenario = Scenario::default();
            if let Some(name) = &args.name {
                scenario.name = name.clone();
            }
            scenario
        }
    }
}

/// Load a scenario file, or the built-in default
pub fn load_scenario(path: Option<&Path>) -> Result<Scenario> {
    match path {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("Failed to load scenario: {}", path.display())),
        None => Ok(Scenario::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(random: Option<usize>, name: Option<&str>) -> ScenarioArgs {
        ScenarioArgs {
            output: PathBuf::from("unused.json"),
            random,
            name: name.map(String::from),
            ai: None,
        }
    }

    #[test]
    fn test_default_scenario_renamed() {
        let scenario = build_scenario(&args(None, Some("opening")), None);
        assert_eq!(scenario.name, "opening");
        assert_eq!(scenario.first.len(), Scenario::default().first.len());
    }

    #[test]
    fn test_random_scenario_seeded() {
        let a = build_scenario(&args(Some(3), None), Some(5));
        let b = build_scenario(&args(Some(3), None), Some(5));
        assert_eq!(a, b);
        assert_eq!(a.first.len(), 4);
        assert_eq!(a.name, "random");
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(load_scenario(Some(Path::new("/nonexistent/scenario.json"))).is_err());
        assert!(load_scenario(None).is_ok());
    }
}
