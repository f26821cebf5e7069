use log::warn;
use std::path::PathBuf;

use crate::eligibility::{FormFactorPolicy, MinimumRequirements};
use crate::score::{CompositeStrategy, ScoringConfig};

// iteration budgets and sizes are fixed per version so scores stay
// comparable between machines
pub const SUM_OF_SQUARES_ITERATIONS: u64 = 15_000_000;
pub const FACTORIAL_ITERATIONS: u64 = 10_000;
pub const MEMORY_BUFFER_ELEMENTS: usize = 100_000_000; // ~800 MB of f64
pub const DISK_PAYLOAD_BYTES: usize = 200 * 1024 * 1024; // 200 MiB

const DEF_REPORT_DIR: &str = "./reports";

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub sum_of_squares_iterations: u64,
    pub factorial_iterations: u64,
    pub memory_buffer_elements: usize,
    pub disk_payload_bytes: usize,
    pub scoring: ScoringConfig,
    pub requirements: MinimumRequirements,
    pub form_factor: Option<FormFactorPolicy>,
    pub report_dir: PathBuf,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sum_of_squares_iterations: SUM_OF_SQUARES_ITERATIONS,
            factorial_iterations: FACTORIAL_ITERATIONS,
            memory_buffer_elements: MEMORY_BUFFER_ELEMENTS,
            disk_payload_bytes: DISK_PAYLOAD_BYTES,
            scoring: ScoringConfig::default(),
            requirements: MinimumRequirements::default(),
            form_factor: None,
            report_dir: PathBuf::from(DEF_REPORT_DIR),
        }
    }
}

impl BenchConfig {
    /// Defaults plus the handful of environment overrides. There is no
    /// command-line surface, the program is meant to just be run.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(strategy) = dotenv::var("SYSGRADE_COMPOSITE") {
            match strategy.as_str() {
                "weighted" => config.scoring.composite_strategy = CompositeStrategy::Weighted,
                "mean" => config.scoring.composite_strategy = CompositeStrategy::UnweightedMean,
                other => warn!(
                    "unknown SYSGRADE_COMPOSITE value {:?}, keeping weighted",
                    other
                ),
            }
        }

        if let Ok(dir) = dotenv::var("SYSGRADE_REPORT_DIR") {
            config.report_dir = PathBuf::from(dir);
        }

        if let Ok(required) = dotenv::var("SYSGRADE_REQUIRE_FORM_FACTOR") {
            config.form_factor = Some(FormFactorPolicy { required });
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_internally_consistent() {
        let config = BenchConfig::default();
        config.scoring.validate().unwrap();
        assert_eq!(config.sum_of_squares_iterations, 15_000_000);
        assert_eq!(config.factorial_iterations, 10_000);
        assert_eq!(config.disk_payload_bytes, 200 * 1024 * 1024);
        assert!(config.form_factor.is_none());
    }
}
