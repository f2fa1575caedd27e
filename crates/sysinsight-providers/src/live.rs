use sysinfo::System;

use crate::error::ProbeError;
use crate::probe::{HostProbe, RawConnection, RawCpu, RawDisk, RawIdentity, RawMemory, RawProcess};
use crate::{cpu, disk, memory, network, processes, system};

/// Reads the machine this process runs on.
///
/// A fresh probe is built per collection. Construction primes the CPU and
/// per-process counters so that [`HostProbe::cpu`] measures one window and the
/// process list reflects that same window.
pub struct LiveProbe {
    sys: System,
}

impl LiveProbe {
    pub fn new() -> Result<Self, ProbeError> {
        // Setup check only; identity reads the clock again when it is collected.
        system::now_secs()?;

        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        processes::refresh(&mut sys);

        Ok(Self { sys })
    }
}

impl HostProbe for LiveProbe {
    fn identity(&mut self) -> Result<RawIdentity, ProbeError> {
        system::read_identity()
    }

    fn cpu(&mut self) -> Result<RawCpu, ProbeError> {
        let sample = cpu::sample(&mut self.sys);
        processes::refresh(&mut self.sys);
        sample
    }

    fn memory(&mut self) -> Result<RawMemory, ProbeError> {
        memory::read(&mut self.sys)
    }

    fn disk(&mut self) -> Result<RawDisk, ProbeError> {
        disk::read_root()
    }

    fn processes(&mut self) -> Result<Vec<RawProcess>, ProbeError> {
        processes::read(&self.sys)
    }

    fn connections(&mut self) -> Result<Vec<RawConnection>, ProbeError> {
        network::read_connections()
    }
}
