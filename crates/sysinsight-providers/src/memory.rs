use sysinfo::System;
use sysinsight_types::{Domain, DomainFailure, MemoryMetrics};
use tracing::{debug, warn};

use crate::error::ProbeError;
use crate::normalize::{gib, percent_of};
use crate::probe::{HostProbe, RawMemory};

pub fn collect(probe: &mut impl HostProbe) -> Domain<MemoryMetrics> {
    match probe.memory() {
        Ok(raw) => {
            let metrics = from_raw(&raw);
            debug!("memory metrics collected: {}%", metrics.percent);
            Domain::Reported(metrics)
        }
        Err(e) => {
            warn!("memory metrics unavailable: {e}");
            Domain::Failed(DomainFailure::gauge(e.to_string()))
        }
    }
}

pub fn from_raw(raw: &RawMemory) -> MemoryMetrics {
    let inUse = raw.total_bytes.saturating_sub(raw.available_bytes);
    MemoryMetrics {
        percent: percent_of(inUse, raw.total_bytes),
        total: gib(raw.total_bytes),
        used: gib(raw.used_bytes),
        available: gib(raw.available_bytes),
    }
}

pub(crate) fn read(sys: &mut System) -> Result<RawMemory, ProbeError> {
    sys.refresh_memory();

    let totalBytes = sys.total_memory();
    if totalBytes == 0 {
        return Err(ProbeError::Unavailable("total memory reported as 0".into()));
    }

    Ok(RawMemory {
        total_bytes: totalBytes,
        used_bytes: sys.used_memory(),
        available_bytes: sys.available_memory(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn sizes_are_gib_with_two_decimals() {
        let metrics = from_raw(&RawMemory {
            total_bytes: 2 * GIB,
            used_bytes: GIB / 2,
            available_bytes: 3 * GIB / 2,
        });
        assert_eq!(metrics.total, 2.0);
        assert_eq!(metrics.used, 0.5);
        assert_eq!(metrics.available, 1.5);
        assert_eq!(metrics.percent, 25.0);
    }

    #[test]
    fn zero_total_does_not_divide_by_zero() {
        let metrics = from_raw(&RawMemory::default());
        assert_eq!(metrics.percent, 0.0);
        assert_eq!(metrics.total, 0.0);
    }
}
