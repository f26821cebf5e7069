use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareFacts {
    pub cpu_name: String,
    pub physical_cores: u32,
    pub logical_threads: u32,
    pub max_clock_mhz: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryFacts {
    pub total_gb: f64,
    pub used_gb: f64,
    pub available_gb: f64,
    pub used_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskFacts {
    pub device_id: String,
    pub mount_point: String,
    pub filesystem_type: String,
    pub total_gb: f64,
    pub free_gb: f64,
    pub used_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsFacts {
    pub system: String,
    pub os_version: String,
    pub kernel_release: String,
    pub architecture: String,
    pub uptime_seconds: u64,
    // chassis detection is platform specific, unknown stays None
    pub machine_type: Option<String>,
}

pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0 * 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_to_gb_converts_whole_gigabytes() {
        assert_eq!(bytes_to_gb(8 * 1024 * 1024 * 1024), 8.0);
        assert_eq!(bytes_to_gb(0), 0.0);
    }
}
