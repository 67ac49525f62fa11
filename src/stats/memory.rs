use sysinfo::System;

/// Total physical memory of this machine in bytes.
pub fn physical_ram() -> u64 {
    let mut system = System::new();
    system.refresh_memory();
    system.total_memory()
}
