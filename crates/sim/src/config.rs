//! Simulation settings read from the environment.
use std::env;
use std::path::PathBuf;

/// Settings for one headless run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub data_dir: PathBuf,
    pub scenario: String,
    /// Overrides the scenario's own seed.
    pub seed: Option<u64>,
    /// Overrides the scenario's own duration, in seconds.
    pub seconds: Option<f32>,
    /// Wall time fed to the engine per loop iteration.
    pub frame_dt: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../game/content/data")),
            scenario: "arena".to_owned(),
            seed: None,
            seconds: None,
            frame_dt: 1.0 / 60.0,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_DATA_DIR` - Content directory (default: the bundled data)
    /// - `COMBAT_SCENARIO` - Scenario name under `scenarios/` (default: arena)
    /// - `COMBAT_SEED` - RNG seed (default: the scenario's)
    /// - `COMBAT_SECONDS` - Simulated seconds (default: the scenario's)
    /// - `COMBAT_FRAME_DT` - Frame time in seconds (default: 1/60)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("COMBAT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(scenario) = env::var("COMBAT_SCENARIO") {
            config.scenario = scenario;
        }
        config.seed = read_env::<u64>("COMBAT_SEED");
        config.seconds = read_env::<f32>("COMBAT_SECONDS").filter(|s| s.is_finite() && *s > 0.0);
        let frame_dt = read_env::<f32>("COMBAT_FRAME_DT").filter(|dt| dt.is_finite() && *dt > 0.0);
        if let Some(dt) = frame_dt {
            config.frame_dt = dt;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
