use serde::{Deserialize, Serialize};

use crate::inventory::{DiskFacts, HardwareFacts, MemoryFacts, OsFacts};

/// Human-readable violation messages, empty means the host passes.
pub type EligibilityReport = Vec<String>;

/// One requirement policy. Policies are composed in a list so criteria can
/// be added or removed without touching the scorer.
pub trait EligibilityPolicy {
    fn violations(
        &self,
        hardware: &HardwareFacts,
        memory: &MemoryFacts,
        disks: &[DiskFacts],
        os: &OsFacts,
    ) -> Vec<String>;
}

/// The baseline minimum-requirement set. Every check reports its measured
/// value next to the threshold, and no check short-circuits the others, so
/// the report can list every failed criterion at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimumRequirements {
    pub min_clock_mhz: f64,
    pub min_physical_cores: u32,
    pub min_total_ram_gb: f64,
    pub min_disk_free_gb: f64,
}

impl Default for MinimumRequirements {
    fn default() -> Self {
        Self {
            min_clock_mhz: 1800.0,
            min_physical_cores: 2,
            min_total_ram_gb: 4.0,
            min_disk_free_gb: 1.0,
        }
    }
}

impl EligibilityPolicy for MinimumRequirements {
    fn violations(
        &self,
        hardware: &HardwareFacts,
        memory: &MemoryFacts,
        disks: &[DiskFacts],
        _os: &OsFacts,
    ) -> Vec<String> {
        let mut violations = vec![];

        // clock and core count are one combined criterion
        if hardware.max_clock_mhz < self.min_clock_mhz
            || hardware.physical_cores < self.min_physical_cores
        {
            violations.push(format!(
                "CPU below minimum: {:.0} MHz and {} cores (minimum {:.0} MHz and {} cores)",
                hardware.max_clock_mhz,
                hardware.physical_cores,
                self.min_clock_mhz,
                self.min_physical_cores
            ));
        }

        if memory.total_gb < self.min_total_ram_gb {
            violations.push(format!(
                "Insufficient RAM: {:.2} GB (minimum {:.0} GB)",
                memory.total_gb, self.min_total_ram_gb
            ));
        }

        // one message per violating disk, not an aggregate
        for disk in disks {
            if disk.free_gb < self.min_disk_free_gb {
                violations.push(format!(
                    "Low free space on disk {} ({}): {:.2} GB (minimum {:.0} GB)",
                    disk.device_id, disk.mount_point, disk.free_gb, self.min_disk_free_gb
                ));
            }
        }

        violations
    }
}

/// Optional stricter layer: require a specific machine form factor.
/// Only applies when the inventory could detect one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormFactorPolicy {
    pub required: String,
}

impl EligibilityPolicy for FormFactorPolicy {
    fn violations(
        &self,
        _hardware: &HardwareFacts,
        _memory: &MemoryFacts,
        _disks: &[DiskFacts],
        os: &OsFacts,
    ) -> Vec<String> {
        match &os.machine_type {
            Some(detected) if detected != &self.required => vec![format!(
                "Recommended form factor is {}, detected: {}",
                self.required, detected
            )],
            _ => vec![],
        }
    }
}

pub fn check_eligibility(
    policies: &[&dyn EligibilityPolicy],
    hardware: &HardwareFacts,
    memory: &MemoryFacts,
    disks: &[DiskFacts],
    os: &OsFacts,
) -> EligibilityReport {
    policies
        .iter()
        .flat_map(|policy| policy.violations(hardware, memory, disks, os))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passing_hardware() -> HardwareFacts {
        HardwareFacts {
            cpu_name: "Test CPU".to_string(),
            physical_cores: 4,
            logical_threads: 8,
            max_clock_mhz: 2400.0,
        }
    }

    fn passing_memory() -> MemoryFacts {
        MemoryFacts {
            total_gb: 16.0,
            used_gb: 8.0,
            available_gb: 8.0,
            used_percent: 50.0,
        }
    }

    fn disk(device_id: &str, free_gb: f64) -> DiskFacts {
        DiskFacts {
            device_id: device_id.to_string(),
            mount_point: format!("/mnt/{}", device_id),
            filesystem_type: "ext4".to_string(),
            total_gb: 100.0,
            free_gb,
            used_percent: 50.0,
        }
    }

    fn os_facts(machine_type: Option<&str>) -> OsFacts {
        OsFacts {
            system: "Linux".to_string(),
            os_version: "Test 1.0".to_string(),
            kernel_release: "6.1".to_string(),
            architecture: "x86_64".to_string(),
            uptime_seconds: 3600,
            machine_type: machine_type.map(|t| t.to_string()),
        }
    }

    #[test]
    fn passing_host_reports_no_violations() {
        let requirements = MinimumRequirements::default();
        let violations = requirements.violations(
            &passing_hardware(),
            &passing_memory(),
            &[disk("sda1", 50.0)],
            &os_facts(None),
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn slow_clock_and_few_cores_is_one_combined_message() {
        let requirements = MinimumRequirements::default();
        let hardware = HardwareFacts {
            max_clock_mhz: 1500.0,
            physical_cores: 1,
            ..passing_hardware()
        };
        let violations =
            requirements.violations(&hardware, &passing_memory(), &[], &os_facts(None));
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("1500 MHz"));
        assert!(violations[0].contains("minimum 1800 MHz"));
    }

    #[test]
    fn low_ram_is_flagged_with_threshold() {
        let requirements = MinimumRequirements::default();
        let memory = MemoryFacts {
            total_gb: 2.0,
            ..passing_memory()
        };
        let violations =
            requirements.violations(&passing_hardware(), &memory, &[], &os_facts(None));
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("2.00 GB"));
        assert!(violations[0].contains("minimum 4 GB"));
    }

    #[test]
    fn each_violating_disk_gets_its_own_message() {
        let requirements = MinimumRequirements::default();
        let disks = vec![disk("sda1", 0.5), disk("sdb1", 20.0), disk("sdc1", 0.1)];
        let violations =
            requirements.violations(&passing_hardware(), &passing_memory(), &disks, &os_facts(None));
        assert_eq!(violations.len(), 2);
        assert!(violations[0].contains("sda1"));
        assert!(violations[1].contains("sdc1"));
    }

    #[test]
    fn all_failing_criteria_are_listed_together() {
        let requirements = MinimumRequirements::default();
        let hardware = HardwareFacts {
            max_clock_mhz: 1000.0,
            ..passing_hardware()
        };
        let memory = MemoryFacts {
            total_gb: 1.0,
            ..passing_memory()
        };
        let disks = vec![disk("sda1", 0.0)];
        let violations = requirements.violations(&hardware, &memory, &disks, &os_facts(None));
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn form_factor_policy_only_fires_on_known_mismatch() {
        let policy = FormFactorPolicy {
            required: "Desktop".to_string(),
        };

        let none = policy.violations(
            &passing_hardware(),
            &passing_memory(),
            &[],
            &os_facts(None),
        );
        assert!(none.is_empty());

        let matching = policy.violations(
            &passing_hardware(),
            &passing_memory(),
            &[],
            &os_facts(Some("Desktop")),
        );
        assert!(matching.is_empty());

        let mismatch = policy.violations(
            &passing_hardware(),
            &passing_memory(),
            &[],
            &os_facts(Some("Notebook")),
        );
        assert_eq!(mismatch.len(), 1);
        assert!(mismatch[0].contains("Notebook"));
    }

    #[test]
    fn policies_compose_without_touching_each_other() {
        let requirements = MinimumRequirements::default();
        let form_factor = FormFactorPolicy {
            required: "Desktop".to_string(),
        };
        let policies: Vec<&dyn EligibilityPolicy> = vec![&requirements, &form_factor];

        let memory = MemoryFacts {
            total_gb: 2.0,
            ..passing_memory()
        };
        let report = check_eligibility(
            &policies,
            &passing_hardware(),
            &memory,
            &[],
            &os_facts(Some("Notebook")),
        );
        assert_eq!(report.len(), 2);
    }
}
