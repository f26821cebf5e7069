use log::{error, info};

mod bench;
mod config;
mod eligibility;
mod error;
mod inventory;
mod logger;
mod report;
mod score;

use crate::eligibility::{check_eligibility, EligibilityPolicy};
use crate::error::SysgradeError;
use crate::inventory::{SysinfoInventory, SystemInventory};
use crate::score::Scorer;

#[tokio::main]
async fn main() {
    logger::init_logger();

    if let Err(e) = run().await {
        error!("benchmark run failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), SysgradeError> {
    let config = config::BenchConfig::from_env();
    config.scoring.validate()?;

    info!("collecting system inventory");
    let mut inventory = SysinfoInventory::new();
    let snapshot = inventory.snapshot()?;
    info!(
        "{} | {} physical cores | {:.1} GB ram | {} disks",
        snapshot.hardware.cpu_name,
        snapshot.hardware.physical_cores,
        snapshot.memory.total_gb,
        snapshot.disks.len()
    );

    let results = bench::run_benchmarks(&config, &snapshot.hardware, &snapshot.disks).await;

    let scorer = Scorer::with_config(config.scoring.clone());
    let scores = scorer.score(&snapshot.memory, &results);
    info!(
        "scores: cpu {:.2} | ram {:.2} | disk {:.2} | composite {:.2}",
        scores.cpu, scores.ram, scores.disk, scores.composite
    );

    let mut policies: Vec<&dyn EligibilityPolicy> = vec![&config.requirements];
    if let Some(form_factor) = &config.form_factor {
        policies.push(form_factor);
    }
    let violations = check_eligibility(
        &policies,
        &snapshot.hardware,
        &snapshot.memory,
        &snapshot.disks,
        &snapshot.os,
    );

    let run_report = report::RunReport::assemble(snapshot, results, scores, violations);

    println!("{}", report::render_text(&run_report));

    let (txt_path, json_path) = report::write_reports(&run_report, &config.report_dir)?;
    println!(
        "Reports saved to:\n{}\n{}",
        txt_path.display(),
        json_path.display()
    );

    Ok(())
}
