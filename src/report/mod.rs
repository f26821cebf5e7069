use chrono::Local;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::bench::BenchmarkResults;
use crate::eligibility::EligibilityReport;
use crate::error::SysgradeError;
use crate::inventory::InventorySnapshot;
use crate::score::ScoreSet;

const SECTION_RULE: &str = "========================================";

/// Everything one run produced, in the shape both renderers consume.
/// Raw timings ride along with the scores so a degraded score can be
/// traced back to the sentinel that caused it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub timestamp: String,
    pub inventory: InventorySnapshot,
    pub results: BenchmarkResults,
    pub scores: ScoreSet,
    pub violations: EligibilityReport,
}

impl RunReport {
    pub fn assemble(
        inventory: InventorySnapshot,
        results: BenchmarkResults,
        scores: ScoreSet,
        violations: EligibilityReport,
    ) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            inventory,
            results,
            scores,
            violations,
        }
    }
}

// sentinels and infinities stay visible instead of pretending to be numbers
fn format_timing(seconds: f64) -> String {
    if seconds < 0.0 {
        "failed".to_string()
    } else if seconds.is_infinite() {
        "allocation failed".to_string()
    } else {
        format!("{:.2}s", seconds)
    }
}

fn format_uptime(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}h {}m {}s", hours, minutes, seconds)
}

/// Render the sectioned text report. All rounding to 2 decimals happens
/// here, never inside the scorer.
pub fn render_text(report: &RunReport) -> String {
    let mut txt = String::new();

    let _ = writeln!(txt, "===== SYSGRADE BENCHMARK REPORT =====");
    let _ = writeln!(txt, "Date: {}", report.timestamp);
    let _ = writeln!(txt);

    let os = &report.inventory.os;
    let _ = writeln!(txt, "[Operating System]");
    let _ = writeln!(txt, "System: {}", os.system);
    let _ = writeln!(txt, "Version: {}", os.os_version);
    let _ = writeln!(txt, "Kernel: {}", os.kernel_release);
    let _ = writeln!(txt, "Architecture: {}", os.architecture);
    let _ = writeln!(txt, "Uptime: {}", format_uptime(os.uptime_seconds));
    if let Some(machine_type) = &os.machine_type {
        let _ = writeln!(txt, "Machine type: {}", machine_type);
    }
    let _ = writeln!(txt, "{}", SECTION_RULE);
    let _ = writeln!(txt);

    let hardware = &report.inventory.hardware;
    let _ = writeln!(txt, "[CPU]");
    let _ = writeln!(txt, "Name: {}", hardware.cpu_name);
    let _ = writeln!(
        txt,
        "Cores: {} physical | {} logical",
        hardware.physical_cores, hardware.logical_threads
    );
    let _ = writeln!(txt, "Max frequency: {:.0} MHz", hardware.max_clock_mhz);
    let _ = writeln!(
        txt,
        "Sum-of-squares time: {}",
        format_timing(report.results.cpu.sum_of_squares_seconds)
    );
    let _ = writeln!(
        txt,
        "Factorial time: {}",
        format_timing(report.results.cpu.factorial_seconds)
    );
    let _ = writeln!(txt, "CPU score: {:.2}/10", report.scores.cpu);
    let _ = writeln!(txt, "{}", SECTION_RULE);
    let _ = writeln!(txt);

    let memory = &report.inventory.memory;
    let _ = writeln!(txt, "[Memory]");
    let _ = writeln!(
        txt,
        "Total: {:.2} GB | Used: {:.2} GB | Available: {:.2} GB | Use: {:.0}%",
        memory.total_gb, memory.used_gb, memory.available_gb, memory.used_percent
    );
    match report.results.memory_seconds {
        Some(seconds) => {
            let _ = writeln!(txt, "Allocation time: {}", format_timing(seconds));
        }
        None => {
            let _ = writeln!(txt, "Allocation time: not measured");
        }
    }
    let _ = writeln!(txt, "RAM score: {:.2}/10", report.scores.ram);
    let _ = writeln!(txt, "{}", SECTION_RULE);
    let _ = writeln!(txt);

    let _ = writeln!(txt, "[Disks]");
    for disk in &report.inventory.disks {
        let _ = writeln!(
            txt,
            "Disk: {} ({}) mounted at {}",
            disk.device_id, disk.filesystem_type, disk.mount_point
        );
        let _ = writeln!(
            txt,
            "  Total: {:.2} GB | Free: {:.2} GB | Use: {:.0}%",
            disk.total_gb, disk.free_gb, disk.used_percent
        );
        if let Some(timing) = report.results.disks.get(&disk.device_id) {
            let _ = writeln!(
                txt,
                "  Write time: {} | Read time: {}",
                format_timing(timing.write_seconds),
                format_timing(timing.read_seconds)
            );
        }
    }
    let _ = writeln!(txt, "Disk score: {:.2}/10", report.scores.disk);
    let _ = writeln!(txt, "{}", SECTION_RULE);
    let _ = writeln!(txt);

    let _ = writeln!(txt, "[Scores]");
    let _ = writeln!(txt, "CPU: {:.2}/10", report.scores.cpu);
    let _ = writeln!(txt, "RAM: {:.2}/10", report.scores.ram);
    let _ = writeln!(txt, "Disk: {:.2}/10", report.scores.disk);
    let _ = writeln!(txt, "Composite: {:.2}/10", report.scores.composite);
    let _ = writeln!(txt, "{}", SECTION_RULE);
    let _ = writeln!(txt);

    if report.violations.is_empty() {
        let _ = writeln!(txt, "VERDICT: ELIGIBLE");
    } else {
        let _ = writeln!(txt, "VERDICT: NOT ELIGIBLE");
        let _ = writeln!(txt, "Problems found:");
        for violation in &report.violations {
            let _ = writeln!(txt, "- {}", violation);
        }
    }

    txt
}

/// Write the text and JSON reports under `dir` with a shared timestamped
/// file name, returning both paths.
pub fn write_reports(report: &RunReport, dir: &Path) -> Result<(PathBuf, PathBuf), SysgradeError> {
    fs::create_dir_all(dir)?;

    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let txt_path = dir.join(format!("benchmark_report_{}.txt", stamp));
    let json_path = dir.join(format!("benchmark_report_{}.json", stamp));

    fs::write(&txt_path, render_text(report))?;
    fs::write(&json_path, serde_json::to_string_pretty(report)?)?;

    info!(
        "reports saved to {} and {}",
        txt_path.display(),
        json_path.display()
    );

    Ok((txt_path, json_path))
}
