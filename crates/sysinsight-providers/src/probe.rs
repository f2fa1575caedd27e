use std::net::SocketAddr;

use crate::error::ProbeError;

/// Raw, unnormalized readings from the host, one method per domain.
///
/// Implementations only read live state; they keep nothing between
/// collections. `Option` marks values the OS may legitimately not report.
pub trait HostProbe {
    fn identity(&mut self) -> Result<RawIdentity, ProbeError>;
    /// Blocks for the CPU sampling window.
    fn cpu(&mut self) -> Result<RawCpu, ProbeError>;
    fn memory(&mut self) -> Result<RawMemory, ProbeError>;
    fn disk(&mut self) -> Result<RawDisk, ProbeError>;
    fn processes(&mut self) -> Result<Vec<RawProcess>, ProbeError>;
    fn connections(&mut self) -> Result<Vec<RawConnection>, ProbeError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawIdentity {
    pub platform: String,
    pub release: String,
    pub version: String,
    pub hostname: String,
    pub boot_secs: u64,
    pub now_secs: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawCpu {
    pub percent: Option<f32>,
    pub physical_cores: Option<usize>,
    pub logical_cores: Option<usize>,
    pub frequency_mhz: Option<u64>,
    pub model: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawMemory {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawDisk {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawProcess {
    pub pid: Option<u32>,
    pub name: Option<String>,
    pub cpu_percent: Option<f32>,
    pub memory_percent: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawConnection {
    pub local: SocketAddr,
    /// `None` for sockets with no peer (listening or unconnected).
    pub remote: Option<SocketAddr>,
    pub status: String,
    pub pid: Option<u32>,
}
