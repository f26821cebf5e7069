use log::{error, info};
use serde::{Deserialize, Serialize};

pub use self::cpu::{run_factorial, run_sum_of_squares};
pub mod cpu;
pub use self::disk::{probe_disk, probe_disks, DiskTiming, DiskTimings, FAILED_TIMING};
pub mod disk;
pub use self::memory::run_memory_allocation;
pub mod memory;

use crate::config::BenchConfig;
use crate::inventory::{DiskFacts, HardwareFacts};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuTimings {
    pub sum_of_squares_seconds: f64,
    pub factorial_seconds: f64,
}

/// Raw measurements of one run. These feed the scorer and are included
/// verbatim in the report so a degraded score stays traceable to the
/// sentinel that caused it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResults {
    pub cpu: CpuTimings,
    /// None when the allocation workload was skipped, infinite when it
    /// could not allocate.
    pub memory_seconds: Option<f64>,
    pub disks: DiskTimings,
}

fn worker_count(hardware: &HardwareFacts) -> usize {
    if hardware.logical_threads > 0 {
        hardware.logical_threads as usize
    } else {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

/// Run every workload in sequence and collect the raw timings.
/// Nothing in here aborts the run: each workload degrades to its own
/// sentinel on failure.
pub async fn run_benchmarks(
    config: &BenchConfig,
    hardware: &HardwareFacts,
    disks: &[DiskFacts],
) -> BenchmarkResults {
    let workers = worker_count(hardware);

    info!("running cpu workloads across {} workers", workers);
    let sum_of_squares_seconds =
        cpu::run_sum_of_squares(config.sum_of_squares_iterations, workers).await;
    let factorial_seconds = cpu::run_factorial(config.factorial_iterations, workers).await;

    info!("running memory allocation workload");
    let memory_seconds = memory::run_memory_allocation(config.memory_buffer_elements).await;

    info!("probing {} disks", disks.len());
    // TODO: add a per-probe timeout, one stalled volume currently blocks the whole run
    let facts = disks.to_vec();
    let payload_bytes = config.disk_payload_bytes;
    let disk_timings =
        match tokio::task::spawn_blocking(move || disk::probe_disks(&facts, payload_bytes)).await {
            Ok(timings) => timings,
            Err(e) => {
                error!("disk probe worker died: {}", e);
                DiskTimings::new()
            }
        };

    BenchmarkResults {
        cpu: CpuTimings {
            sum_of_squares_seconds,
            factorial_seconds,
        },
        memory_seconds: Some(memory_seconds),
        disks: disk_timings,
    }
}
