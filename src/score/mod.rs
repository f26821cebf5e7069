//! Converts raw workload timings plus static capacity facts into bounded
//! 0–10 suitability scores.
//!
//! Measured times are normalized against fixed reference times via
//! inverse-square-root scaling: `10 * sqrt(reference / elapsed)`, clamped
//! into `[0, 10]`. Nothing in here rounds: presentation rounding happens
//! in the report layer only.

use serde::{Deserialize, Serialize};

use crate::bench::{BenchmarkResults, DiskTiming, DiskTimings};
use crate::error::SysgradeError;
use crate::inventory::MemoryFacts;

pub const MAX_SCORE: f64 = 10.0;

/// The two composite formulas observed in the field. Neither is more
/// authoritative than the other, so the choice is configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeStrategy {
    /// cpu 0.6, ram 0.35, disk 0.05
    Weighted,
    /// plain average of the three sub-scores
    UnweightedMean,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Baseline seconds for the sum-of-squares batch (default: 1.0).
    pub cpu_ref_seconds: f64,
    /// Baseline seconds for the factorial batch (default: 0.05).
    pub factorial_ref_seconds: f64,
    /// Baseline seconds for write+read of one disk probe (default: 1.0).
    pub disk_ref_seconds: f64,
    /// Baseline seconds for the memory allocation pass (default: 0.5).
    pub ram_ref_seconds: f64,
    /// Weight of the sum-of-squares component inside the cpu score (default: 0.7).
    pub cpu_sum_weight: f64,
    /// Weight of the factorial component inside the cpu score (default: 0.3).
    pub cpu_factorial_weight: f64,
    /// Weight of installed capacity inside the ram score (default: 0.5).
    pub ram_capacity_weight: f64,
    /// Weight of allocation speed inside the ram score (default: 0.5).
    pub ram_speed_weight: f64,
    /// Composite weights, only used by the weighted strategy (defaults: 0.6/0.35/0.05).
    pub composite_cpu_weight: f64,
    pub composite_ram_weight: f64,
    pub composite_disk_weight: f64,
    pub composite_strategy: CompositeStrategy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            cpu_ref_seconds: 1.0,
            factorial_ref_seconds: 0.05,
            disk_ref_seconds: 1.0,
            ram_ref_seconds: 0.5,
            cpu_sum_weight: 0.7,
            cpu_factorial_weight: 0.3,
            ram_capacity_weight: 0.5,
            ram_speed_weight: 0.5,
            composite_cpu_weight: 0.6,
            composite_ram_weight: 0.35,
            composite_disk_weight: 0.05,
            composite_strategy: CompositeStrategy::Weighted,
        }
    }
}

impl ScoringConfig {
    /// Every weight group must sum to 1.0 and every reference time must be
    /// positive, otherwise the formulas stop being comparable across runs.
    pub fn validate(&self) -> Result<(), SysgradeError> {
        let groups = [
            ("cpu", self.cpu_sum_weight + self.cpu_factorial_weight),
            ("ram", self.ram_capacity_weight + self.ram_speed_weight),
            (
                "composite",
                self.composite_cpu_weight + self.composite_ram_weight + self.composite_disk_weight,
            ),
        ];
        for (name, sum) in groups {
            if (sum - 1.0).abs() > 0.001 {
                return Err(SysgradeError::Config(format!(
                    "{} weights must sum to 1.0, got {}",
                    name, sum
                )));
            }
        }

        let refs = [
            self.cpu_ref_seconds,
            self.factorial_ref_seconds,
            self.disk_ref_seconds,
            self.ram_ref_seconds,
        ];
        if refs.iter().any(|r| *r <= 0.0) {
            return Err(SysgradeError::Config(
                "reference times must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Derived once per run, never mutated afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreSet {
    pub cpu: f64,
    pub ram: f64,
    pub disk: f64,
    pub composite: f64,
}

// an elapsed of zero means the workload beat the clock resolution: cap at
// the max score instead of dividing by zero; an infinite elapsed (failed
// allocation) falls out of the formula as zero
fn inverse_sqrt_score(ref_seconds: f64, elapsed: f64) -> f64 {
    if elapsed <= 0.0 {
        return MAX_SCORE;
    }
    (MAX_SCORE * (ref_seconds / elapsed).sqrt()).clamp(0.0, MAX_SCORE)
}

#[derive(Debug, Clone)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new() -> Self {
        Self {
            config: ScoringConfig::default(),
        }
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Pure mapping {capacity facts, raw timings} -> ScoreSet.
    pub fn score(&self, memory: &MemoryFacts, results: &BenchmarkResults) -> ScoreSet {
        let cpu = self.cpu_score(
            results.cpu.sum_of_squares_seconds,
            results.cpu.factorial_seconds,
        );
        let ram = self.ram_score(memory.total_gb, results.memory_seconds);
        let disk = self.disk_score(&results.disks);
        let composite = self.composite(cpu, ram, disk);

        ScoreSet {
            cpu,
            ram,
            disk,
            composite,
        }
    }

    fn cpu_score(&self, sum_elapsed: f64, factorial_elapsed: f64) -> f64 {
        let sum_component = inverse_sqrt_score(self.config.cpu_ref_seconds, sum_elapsed);
        let factorial_component =
            inverse_sqrt_score(self.config.factorial_ref_seconds, factorial_elapsed);

        (self.config.cpu_sum_weight * sum_component
            + self.config.cpu_factorial_weight * factorial_component)
            .clamp(0.0, MAX_SCORE)
    }

    fn ram_score(&self, total_gb: f64, ram_elapsed: Option<f64>) -> f64 {
        let capacity = ((total_gb / 8.0) * MAX_SCORE).clamp(0.0, MAX_SCORE);
        // no timing taken means speed is not held against the machine
        let speed = match ram_elapsed {
            None => MAX_SCORE,
            Some(elapsed) => inverse_sqrt_score(self.config.ram_ref_seconds, elapsed),
        };

        (self.config.ram_capacity_weight * capacity + self.config.ram_speed_weight * speed)
            .clamp(0.0, MAX_SCORE)
    }

    fn single_disk_score(&self, timing: &DiskTiming) -> f64 {
        // a failed probe scores zero, it is not excluded from the average
        if timing.is_failed() {
            return 0.0;
        }
        inverse_sqrt_score(
            self.config.disk_ref_seconds,
            timing.write_seconds + timing.read_seconds,
        )
    }

    fn disk_score(&self, timings: &DiskTimings) -> f64 {
        if timings.is_empty() {
            return 0.0;
        }
        let sum: f64 = timings
            .values()
            .map(|timing| self.single_disk_score(timing))
            .sum();
        sum / timings.len() as f64
    }

    fn composite(&self, cpu: f64, ram: f64, disk: f64) -> f64 {
        let raw = match self.config.composite_strategy {
            CompositeStrategy::Weighted => {
                self.config.composite_cpu_weight * cpu
                    + self.config.composite_ram_weight * ram
                    + self.config.composite_disk_weight * disk
            }
            CompositeStrategy::UnweightedMean => (cpu + ram + disk) / 3.0,
        };
        raw.clamp(0.0, MAX_SCORE)
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new()
    }
}
