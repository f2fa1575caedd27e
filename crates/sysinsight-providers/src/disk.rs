use sysinsight_types::{DiskMetrics, Domain, DomainFailure};
use tracing::{debug, warn};

use crate::error::ProbeError;
use crate::normalize::{gib, percent_of};
use crate::probe::{HostProbe, RawDisk};

pub const ROOT_MOUNT: &str = "/";

pub fn collect(probe: &mut impl HostProbe) -> Domain<DiskMetrics> {
    match probe.disk() {
        Ok(raw) => {
            let metrics = from_raw(&raw);
            debug!("disk metrics collected for {ROOT_MOUNT}: {}%", metrics.percent);
            Domain::Reported(metrics)
        }
        Err(e) => {
            warn!("disk metrics unavailable: {e}");
            Domain::Failed(DomainFailure::gauge(e.to_string()))
        }
    }
}

/// Percent is taken against what an unprivileged user can reach
/// (`used + free`), so reserved blocks do not count as headroom.
pub fn from_raw(raw: &RawDisk) -> DiskMetrics {
    DiskMetrics {
        percent: percent_of(raw.used_bytes, raw.used_bytes + raw.free_bytes),
        total: gib(raw.total_bytes),
        used: gib(raw.used_bytes),
        free: gib(raw.free_bytes),
    }
}

pub(crate) fn read_root() -> Result<RawDisk, ProbeError> {
    let stat = nix::sys::statvfs::statvfs(ROOT_MOUNT).map_err(|e| ProbeError::os("statvfs", e))?;

    let blockSize = stat.fragment_size() as u64;
    let totalBytes = stat.blocks() as u64 * blockSize;
    let freeBytes = stat.blocks_available() as u64 * blockSize;
    let usedBytes = totalBytes.saturating_sub(stat.blocks_free() as u64 * blockSize);

    Ok(RawDisk {
        total_bytes: totalBytes,
        used_bytes: usedBytes,
        free_bytes: freeBytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn reserved_blocks_are_excluded_from_percent() {
        // 100 GiB volume, 5 GiB reserved for root
        let metrics = from_raw(&RawDisk {
            total_bytes: 100 * GIB,
            used_bytes: 40 * GIB,
            free_bytes: 55 * GIB,
        });
        assert_eq!(metrics.total, 100.0);
        assert_eq!(metrics.used, 40.0);
        assert_eq!(metrics.free, 55.0);
        assert_eq!(metrics.percent, 42.1);
    }

    #[test]
    fn empty_volume_reports_zero_percent() {
        assert_eq!(from_raw(&RawDisk::default()).percent, 0.0);
    }
}
