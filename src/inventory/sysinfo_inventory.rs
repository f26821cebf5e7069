use log::debug;
use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, RefreshKind, System};

use super::facts::{bytes_to_gb, DiskFacts, HardwareFacts, MemoryFacts, OsFacts};
use super::{InventorySnapshot, SystemInventory};
use crate::error::SysgradeError;

pub struct SysinfoInventory {
    system: System,
}

impl SysinfoInventory {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SysinfoInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemInventory for SysinfoInventory {
    fn snapshot(&mut self) -> Result<InventorySnapshot, SysgradeError> {
        let start = std::time::Instant::now();

        // refresh all system info WARN: this takes too much time
        // self.system = System::new_all();
        self.system.refresh_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );

        let cpus = self.system.cpus();
        if cpus.is_empty() {
            return Err(SysgradeError::Inventory("no cpus reported".to_string()));
        }

        // sysinfo reports per-core frequency, the fastest core stands in for the max clock
        let max_clock_mhz = cpus.iter().map(|cpu| cpu.frequency()).max().unwrap_or(0) as f64;
        let hardware = HardwareFacts {
            cpu_name: cpus[0].brand().trim().to_string(),
            physical_cores: self.system.physical_core_count().unwrap_or(0) as u32,
            logical_threads: cpus.len() as u32,
            max_clock_mhz,
        };

        let total = self.system.total_memory();
        let used = self.system.used_memory();
        let memory = MemoryFacts {
            total_gb: bytes_to_gb(total),
            used_gb: bytes_to_gb(used),
            available_gb: bytes_to_gb(self.system.available_memory()),
            used_percent: if total == 0 {
                0.0
            } else {
                used as f64 / total as f64 * 100.0
            },
        };

        let mut disk_facts: Vec<DiskFacts> = vec![];
        for disk in Disks::new_with_refreshed_list().list() {
            let total_space = disk.total_space();
            // pseudo filesystems report zero capacity, they are not measurable volumes
            if total_space == 0 {
                continue;
            }
            let available = disk.available_space();
            disk_facts.push(DiskFacts {
                device_id: disk.name().to_string_lossy().to_string(),
                mount_point: disk.mount_point().to_string_lossy().to_string(),
                filesystem_type: disk.file_system().to_string_lossy().to_string(),
                total_gb: bytes_to_gb(total_space),
                free_gb: bytes_to_gb(available),
                used_percent: (total_space.saturating_sub(available)) as f64
                    / total_space as f64
                    * 100.0,
            });
        }

        let os = OsFacts {
            system: System::name().unwrap_or("Unknown".to_string()),
            os_version: System::long_os_version().unwrap_or("Unknown".to_string()),
            kernel_release: System::kernel_version().unwrap_or("Unknown".to_string()),
            architecture: System::cpu_arch().unwrap_or("Unknown".to_string()),
            uptime_seconds: System::uptime(),
            machine_type: None,
        };

        debug!("time to refresh: {:?}", start.elapsed());

        Ok(InventorySnapshot {
            hardware,
            memory,
            disks: disk_facts,
            os,
        })
    }
}
