use std::time::Duration;

use sysinfo::System;
use sysinsight_types::{CpuMetrics, Domain, DomainFailure};
use tracing::{debug, warn};

use crate::error::ProbeError;
use crate::normalize::{number, or_zero, round1};
use crate::probe::{HostProbe, RawCpu};

/// No vendor lookup is performed.
pub const UNKNOWN_VENDOR: &str = "Unknown";

/// How long the utilization sample spans. The request stalls for this long.
pub fn sample_window() -> Duration {
    sysinfo::MINIMUM_CPU_UPDATE_INTERVAL.max(Duration::from_secs(1))
}

pub fn collect(probe: &mut impl HostProbe) -> Domain<CpuMetrics> {
    match probe.cpu() {
        Ok(raw) => {
            let metrics = from_raw(raw);
            debug!("cpu metrics collected: {:.1}%", metrics.percent);
            Domain::Reported(metrics)
        }
        Err(e) => {
            warn!("cpu metrics unavailable: {e}");
            Domain::Failed(DomainFailure::gauge(e.to_string()))
        }
    }
}

pub fn from_raw(raw: RawCpu) -> CpuMetrics {
    CpuMetrics {
        percent: round1(number(raw.percent)),
        cores: or_zero(raw.physical_cores) as u64,
        logical_cores: or_zero(raw.logical_cores) as u64,
        frequency: or_zero(raw.frequency_mhz) as f64,
        vendor: UNKNOWN_VENDOR.into(),
        model: or_zero(raw.model),
    }
}

/// Assumes `sys` already holds a CPU baseline; sleeps for the sample window
/// and refreshes against it.
pub(crate) fn sample(sys: &mut System) -> Result<RawCpu, ProbeError> {
    std::thread::sleep(sample_window());
    sys.refresh_cpu_all();

    let cpus = sys.cpus();
    if cpus.is_empty() {
        return Err(ProbeError::Unavailable("no CPU information reported".into()));
    }

    let first = &cpus[0];
    let frequencyMhz = first.frequency();
    let brand = first.brand().trim();

    Ok(RawCpu {
        percent: Some(sys.global_cpu_usage()),
        physical_cores: System::physical_core_count(),
        logical_cores: Some(cpus.len()),
        frequency_mhz: (frequencyMhz > 0).then_some(frequencyMhz),
        model: (!brand.is_empty()).then(|| brand.to_string()),
    })
}
