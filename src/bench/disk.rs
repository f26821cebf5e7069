use log::{debug, warn};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Instant;

use crate::inventory::DiskFacts;

/// Sentinel timing for a probe that could not be taken.
pub const FAILED_TIMING: f64 = -1.0;

const PROBE_DIR_NAME: &str = "sysgrade_probe_tmp";
const PROBE_FILE_NAME: &str = "probe_payload.bin";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiskTiming {
    pub write_seconds: f64,
    pub read_seconds: f64,
}

impl DiskTiming {
    pub fn failed() -> Self {
        Self {
            write_seconds: FAILED_TIMING,
            read_seconds: FAILED_TIMING,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.write_seconds < 0.0 || self.read_seconds < 0.0
    }
}

/// One entry per probed disk, keyed by device id.
pub type DiskTimings = BTreeMap<String, DiskTiming>;

/// Probe every disk in turn. Failures stay contained per disk: a volume
/// that cannot be written still gets its sentinel entry and the remaining
/// volumes are probed as usual.
pub fn probe_disks(disks: &[DiskFacts], payload_bytes: usize) -> DiskTimings {
    let mut timings = DiskTimings::new();
    for disk in disks {
        let timing = probe_disk(Path::new(&disk.mount_point), payload_bytes);
        if timing.is_failed() {
            warn!(
                "disk probe failed for {} ({}), scoring it as unusable",
                disk.device_id, disk.mount_point
            );
        }
        timings.insert(disk.device_id.clone(), timing);
    }
    timings
}

/// Write-then-read timing against a temp directory on the probed volume
/// itself, never the OS temp dir. Any error in the sequence converts to
/// the sentinel pair, the probe does not raise past this boundary.
pub fn probe_disk(mount_point: &Path, payload_bytes: usize) -> DiskTiming {
    let probe_dir = mount_point.join(PROBE_DIR_NAME);

    let result = timed_write_read(&probe_dir, payload_bytes);
    cleanup(&probe_dir);

    match result {
        Ok(timing) => {
            debug!(
                "probe under {:?}: write {:.3}s read {:.3}s",
                mount_point, timing.write_seconds, timing.read_seconds
            );
            timing
        }
        Err(e) => {
            debug!("probe under {:?} failed: {}", mount_point, e);
            DiskTiming::failed()
        }
    }
}

fn timed_write_read(probe_dir: &Path, payload_bytes: usize) -> std::io::Result<DiskTiming> {
    fs::create_dir_all(probe_dir)?;

    let probe_file = probe_dir.join(PROBE_FILE_NAME);
    // a stale file from a crashed run would let the page cache skew the write
    if probe_file.exists() {
        fs::remove_file(&probe_file)?;
    }

    let mut payload = vec![0u8; payload_bytes];
    rand::rng().fill_bytes(&mut payload);

    let write_start = Instant::now();
    let mut file = File::create(&probe_file)?;
    file.write_all(&payload)?;
    // the read below must hit the volume, not a pending write buffer
    file.sync_all()?;
    drop(file);
    let write_seconds = write_start.elapsed().as_secs_f64();

    drop(payload);

    let read_start = Instant::now();
    let mut file = File::open(&probe_file)?;
    let mut readback = Vec::with_capacity(payload_bytes);
    file.read_to_end(&mut readback)?;
    let read_seconds = read_start.elapsed().as_secs_f64();
    std::hint::black_box(&readback);

    Ok(DiskTiming {
        write_seconds,
        read_seconds,
    })
}

// best effort on every exit path, a leftover probe dir must never fail the run
fn cleanup(probe_dir: &Path) {
    let _ = fs::remove_file(probe_dir.join(PROBE_FILE_NAME));
    let _ = fs::remove_dir(probe_dir);
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PAYLOAD: usize = 1024 * 1024;

    #[test]
    fn probe_on_writable_dir_succeeds_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();

        let timing = probe_disk(dir.path(), TEST_PAYLOAD);

        assert!(!timing.is_failed());
        assert!(timing.write_seconds >= 0.0);
        assert!(timing.read_seconds >= 0.0);
        // nothing left behind on the probed volume
        assert!(!dir.path().join(PROBE_DIR_NAME).exists());
    }

    #[test]
    fn probe_on_missing_mount_point_reports_sentinel() {
        let timing = probe_disk(Path::new("/definitely/not/a/mount/point"), TEST_PAYLOAD);

        assert!(timing.is_failed());
        assert_eq!(timing.write_seconds, FAILED_TIMING);
        assert_eq!(timing.read_seconds, FAILED_TIMING);
    }

    #[test]
    fn one_failed_disk_does_not_abort_the_others() {
        let dir = tempfile::tempdir().unwrap();
        let disks = vec![
            DiskFacts {
                device_id: "bad".to_string(),
                mount_point: "/definitely/not/a/mount/point".to_string(),
                filesystem_type: "ext4".to_string(),
                total_gb: 10.0,
                free_gb: 5.0,
                used_percent: 50.0,
            },
            DiskFacts {
                device_id: "good".to_string(),
                mount_point: dir.path().to_string_lossy().to_string(),
                filesystem_type: "ext4".to_string(),
                total_gb: 10.0,
                free_gb: 5.0,
                used_percent: 50.0,
            },
        ];

        let timings = probe_disks(&disks, TEST_PAYLOAD);

        assert_eq!(timings.len(), 2);
        assert!(timings["bad"].is_failed());
        assert!(!timings["good"].is_failed());
    }
}
