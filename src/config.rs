use crate::error::{DartsError, DartsResult};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    #[command(flatten)]
    pub feedback: FeedbackParams,
    #[command(flatten)]
    pub simulation: SimulationParams,
    #[command(flatten)]
    pub match_params: MatchParams,
}

impl EngineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> DartsResult<Self> {
        let content = fs::read_to_string(&path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DartsResult<()> {
        if !(1..=9).contains(&self.match_params.legs_to_set) {
            return Err(DartsError::Config(format!(
                "legs_to_set must be within 1..=9, got {}",
                self.match_params.legs_to_set
            )));
        }
        if !(1..=9).contains(&self.match_params.sets_to_match) {
            return Err(DartsError::Config(format!(
                "sets_to_match must be within 1..=9, got {}",
                self.match_params.sets_to_match
            )));
        }
        if self.simulation.default_h_dev < 0.0 || self.simulation.default_v_dev < 0.0 {
            return Err(DartsError::Config(
                "aiming deviations must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackParams {
    /// Hold the game in BLOCKING until the announcement finished.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub blocking: bool,
    /// Extra pause after each announcement (ms).
    #[arg(long, default_value_t = 0)]
    pub announce_delay_ms: u64,
}

impl Default for FeedbackParams {
    fn default() -> Self {
        Self {
            blocking: true,
            announce_delay_ms: 0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
    #[arg(long, default_value_t = 35.0)]
    pub default_h_dev: f64,
    #[arg(long, default_value_t = 45.0)]
    pub default_v_dev: f64,
    /// Safety cap for fully simulated matches.
    #[arg(long, default_value_t = 3000)]
    pub max_darts: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            seed: None,
            default_h_dev: 35.0,
            default_v_dev: 45.0,
            max_darts: 3000,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchParams {
    #[arg(long, default_value_t = 3)]
    pub legs_to_set: u32,
    #[arg(long, default_value_t = 1)]
    pub sets_to_match: u32,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            legs_to_set: 3,
            sets_to_match: 1,
        }
    }
}
