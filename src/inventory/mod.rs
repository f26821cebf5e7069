use serde::{Deserialize, Serialize};

pub use self::facts::{bytes_to_gb, DiskFacts, HardwareFacts, MemoryFacts, OsFacts};
pub mod facts;
pub use self::sysinfo_inventory::SysinfoInventory;
mod sysinfo_inventory;

use crate::error::SysgradeError;

/// Point-in-time facts about the host, taken once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub hardware: HardwareFacts,
    pub memory: MemoryFacts,
    pub disks: Vec<DiskFacts>,
    pub os: OsFacts,
}

/// Capability boundary for the platform-specific inventory queries.
/// The scoring side only ever sees the resulting fact structs.
pub trait SystemInventory {
    fn snapshot(&mut self) -> Result<InventorySnapshot, SysgradeError>;
}
