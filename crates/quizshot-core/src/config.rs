//! Configuration module
//!
//! Env-var driven configuration for the pipeline and the backend client.
//! Every knob has a compiled-in default matching the production contest
//! setup; `from_env` only fails on values that cannot be defaulted away.

use std::env;
use std::path::PathBuf;

// Compiled-in defaults
const DEFAULT_API_BASE_URL: &str = "https://api.eenadu.net/EenaduQuizApi/api";
const BYTE_BUDGET_KB: usize = 1024;
const QUALITY_START: u8 = 85;
const QUALITY_STEP: u8 = 10;
const QUALITY_FLOOR: u8 = 30;
const MAX_WIDTH: u32 = 1280;
const MAX_HEIGHT: u32 = 1700;
const TARGET_ASPECT: f64 = 0.75;
const STATE_DIR: &str = ".quizshot";

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the contest backend (endpoint paths are appended).
    pub api_base_url: String,
    /// Byte budget the compressor aims for (best-effort, not a hard cap).
    pub byte_budget: usize,
    /// Quality back-off parameters for the compressor.
    pub quality_start: u8,
    pub quality_step: u8,
    pub quality_floor: u8,
    /// Raster bounds applied on every encode pass.
    pub max_width: u32,
    pub max_height: u32,
    /// Target width/height ratio for the crop stage.
    pub target_aspect: f64,
    /// Directory holding the persisted device identity.
    pub state_dir: PathBuf,
    /// Explicit device identity, bypassing the state file.
    pub device_id_override: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let byte_budget_kb = env::var("QUIZSHOT_BYTE_BUDGET_KB")
            .unwrap_or_else(|_| BYTE_BUDGET_KB.to_string())
            .parse::<usize>()
            .unwrap_or(BYTE_BUDGET_KB);

        let config = Config {
            api_base_url: env::var("QUIZSHOT_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            byte_budget: byte_budget_kb * 1024,
            quality_start: env::var("QUIZSHOT_QUALITY_START")
                .unwrap_or_else(|_| QUALITY_START.to_string())
                .parse()
                .unwrap_or(QUALITY_START),
            quality_step: env::var("QUIZSHOT_QUALITY_STEP")
                .unwrap_or_else(|_| QUALITY_STEP.to_string())
                .parse()
                .unwrap_or(QUALITY_STEP),
            quality_floor: env::var("QUIZSHOT_QUALITY_FLOOR")
                .unwrap_or_else(|_| QUALITY_FLOOR.to_string())
                .parse()
                .unwrap_or(QUALITY_FLOOR),
            max_width: env::var("QUIZSHOT_MAX_WIDTH")
                .unwrap_or_else(|_| MAX_WIDTH.to_string())
                .parse()
                .unwrap_or(MAX_WIDTH),
            max_height: env::var("QUIZSHOT_MAX_HEIGHT")
                .unwrap_or_else(|_| MAX_HEIGHT.to_string())
                .parse()
                .unwrap_or(MAX_HEIGHT),
            target_aspect: env::var("QUIZSHOT_TARGET_ASPECT")
                .unwrap_or_else(|_| TARGET_ASPECT.to_string())
                .parse()
                .unwrap_or(TARGET_ASPECT),
            state_dir: env::var("QUIZSHOT_STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(STATE_DIR)),
            device_id_override: env::var("QUIZSHOT_DEVICE_ID")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.byte_budget == 0 {
            return Err(anyhow::anyhow!("QUIZSHOT_BYTE_BUDGET_KB must be positive"));
        }
        if self.quality_step == 0 {
            return Err(anyhow::anyhow!("QUIZSHOT_QUALITY_STEP must be positive"));
        }
        if self.quality_floor > self.quality_start {
            return Err(anyhow::anyhow!(
                "QUIZSHOT_QUALITY_FLOOR ({}) cannot exceed QUIZSHOT_QUALITY_START ({})",
                self.quality_floor,
                self.quality_start
            ));
        }
        if self.quality_start > 100 {
            return Err(anyhow::anyhow!("QUIZSHOT_QUALITY_START cannot exceed 100"));
        }
        if self.max_width == 0 || self.max_height == 0 {
            return Err(anyhow::anyhow!(
                "QUIZSHOT_MAX_WIDTH and QUIZSHOT_MAX_HEIGHT must be positive"
            ));
        }
        if self.target_aspect <= 0.0 || !self.target_aspect.is_finite() {
            return Err(anyhow::anyhow!(
                "QUIZSHOT_TARGET_ASPECT must be a positive ratio"
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            byte_budget: BYTE_BUDGET_KB * 1024,
            quality_start: QUALITY_START,
            quality_step: QUALITY_STEP,
            quality_floor: QUALITY_FLOOR,
            max_width: MAX_WIDTH,
            max_height: MAX_HEIGHT,
            target_aspect: TARGET_ASPECT,
            state_dir: PathBuf::from(STATE_DIR),
            device_id_override: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.byte_budget, 1024 * 1024);
        assert_eq!(config.quality_start, 85);
        assert_eq!(config.quality_floor, 30);
    }

    #[test]
    fn validate_rejects_floor_above_start() {
        let config = Config {
            quality_floor: 90,
            quality_start: 85,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_step() {
        let config = Config {
            quality_step: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_aspect() {
        let config = Config {
            target_aspect: 0.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            target_aspect: -1.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
